pub mod store;

pub use store::{
    ApiCostRecord, ExpertRecord, ExpertStats, NewPrediction, PredictionFilter, PredictionRecord,
    PredictionStatus, StatsPeriod, Store,
};
