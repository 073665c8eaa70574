pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{NominatimLookup, OpenAiClient};
pub use app::session::OutputFormat;
pub use app::{build_engine, build_engine_with_client};
pub use config::AppConfig;
pub use crate::core::engine::{CheckEngine, Evaluation, EvaluationState, Outcome};
pub use domain::model::{EvaluationRequest, EvaluationResult};
pub use utils::error::{CheckError, Result};
