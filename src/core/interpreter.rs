use crate::domain::model::EvaluationResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseMode {
    #[default]
    Structured,
    FreeText,
}

impl std::str::FromStr for ResponseMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "structured" | "json" => Ok(ResponseMode::Structured),
            "free-text" | "free_text" | "text" => Ok(ResponseMode::FreeText),
            other => Err(format!("unknown response mode '{}'", other)),
        }
    }
}

/// Shown instead of the reply whenever a structured parse fails.
pub const PARSE_FAILED_MESSAGE: &str = "Could not parse the assessment returned by the model.";

#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    Parsed(EvaluationResult),
    Narrative(String),
    ParseFailed { reason: String },
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseInterpreter {
    mode: ResponseMode,
}

impl ResponseInterpreter {
    pub fn new(mode: ResponseMode) -> Self {
        Self { mode }
    }

    pub fn interpret(&self, reply: &str) -> Interpretation {
        match self.mode {
            ResponseMode::FreeText => Interpretation::Narrative(reply.trim().to_string()),
            ResponseMode::Structured => parse_structured(reply),
        }
    }
}

/// Strict parse: the reply must be exactly one JSON object. Nothing is repaired.
pub fn parse_structured(reply: &str) -> Interpretation {
    let trimmed = reply.trim();

    let value: serde_json::Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => {
            return Interpretation::ParseFailed {
                reason: format!("reply is not valid JSON: {}", e),
            }
        }
    };

    if !value.is_object() {
        return Interpretation::ParseFailed {
            reason: "reply is not a JSON object".to_string(),
        };
    }

    match serde_json::from_value::<EvaluationResult>(value) {
        Ok(result) => Interpretation::Parsed(result),
        Err(e) => Interpretation::ParseFailed {
            reason: format!("reply does not match the assessment shape: {}", e),
        },
    }
}
