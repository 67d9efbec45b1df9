pub mod health;
pub mod logger;

pub use health::{HealthReport, HealthState};
pub use logger::init_logging;
