/// Use cases module containing application orchestration
mod analyze_forest;

pub use analyze_forest::{AnalyzeForestUseCase, CollectedForest, ForestCollector};
