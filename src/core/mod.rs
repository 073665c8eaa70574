pub mod engine;
pub mod gatherer;
pub mod interpreter;
pub mod prompt;
pub mod scoring;

pub use crate::domain::model::{
    CompetitorEntry, DemandSignal, DemandTier, EvaluationRequest, EvaluationResult, MarketSignals,
    MarketSize,
};
pub use crate::domain::ports::{ChatMessage, CompletionClient, CompletionRequest, LocationLookup};
pub use crate::utils::error::Result;
