use crate::core::interpreter::ResponseMode;
use crate::domain::model::{CompetitorEntry, EvaluationRequest, MarketSignals};
use crate::domain::ports::{ChatMessage, CompletionRequest};

pub const SYSTEM_INSTRUCTION: &str = "You are a local market analyst. \
Respond only with information derived from the supplied signals.";

const STRUCTURED_DIRECTIVE: &str = r#"Respond with a single JSON object and nothing else, using exactly these keys:
{
  "success_probability": "<percentage, e.g. \"60%\">",
  "market_size": "<small | medium | large>",
  "competitors": <integer>,
  "location": "<the location above>",
  "local_demand": {
    "search_volume": "<Low | Medium | High>",
    "population_growth": "<Low | Medium | High>",
    "competitor_density": "<Low | Medium | High>"
  },
  "nearby_competitors": [{"name": "<text>", "distance": "<e.g. 0.6 miles>", "rating": "<e.g. 4.2>"}],
  "key_insights": ["<text>"],
  "risks": ["<text>"]
}"#;

const FREE_TEXT_DIRECTIVE: &str =
    "Given these, predict whether the idea will succeed locally, and why.";

#[derive(Debug, Clone)]
pub struct PromptComposer {
    model: String,
    max_tokens: u32,
    temperature: f32,
    mode: ResponseMode,
}

impl PromptComposer {
    pub fn new(model: impl Into<String>, max_tokens: u32, temperature: f32, mode: ResponseMode) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            temperature,
            mode,
        }
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    pub fn compose(&self, request: &EvaluationRequest, signals: &MarketSignals) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(self.user_instruction(request, signals)),
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    fn user_instruction(&self, request: &EvaluationRequest, signals: &MarketSignals) -> String {
        let location = if request.location.trim().is_empty() {
            "unspecified"
        } else {
            request.location.trim()
        };

        let directive = match self.mode {
            ResponseMode::Structured => STRUCTURED_DIRECTIVE,
            ResponseMode::FreeText => FREE_TEXT_DIRECTIVE,
        };

        format!(
            "Idea: {}\nLocation: {}\nCompetitors nearby: {}\nDemand signal: {}\n\n{}",
            request.idea.trim(),
            location,
            describe_competitors(&signals.competitors),
            signals.demand,
            directive
        )
    }
}

fn describe_competitors(competitors: &[CompetitorEntry]) -> String {
    if competitors.is_empty() {
        return "None found".to_string();
    }

    competitors
        .iter()
        .map(|c| format!("{} ({}, rated {})", c.name, c.distance, c.rating))
        .collect::<Vec<_>>()
        .join(", ")
}
