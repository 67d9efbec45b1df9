pub mod article;
pub mod models;
pub mod sections;
pub mod style_guide;

pub use article::{LengthReport, LengthTarget, PredictionArticle, PredictionWriter, TemplateVersion};
pub use models::{HistoricalData, Insight, MatchInfo, OddsInfo, TeamInfo};
