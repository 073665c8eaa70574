use crate::core::gatherer::SignalGatherer;
use crate::core::interpreter::{Interpretation, ResponseInterpreter, PARSE_FAILED_MESSAGE};
use crate::core::prompt::PromptComposer;
use crate::core::scoring::{heuristic_score, HeuristicScore};
use crate::domain::model::{EvaluationRequest, EvaluationResult, MarketSignals};
use crate::domain::ports::CompletionClient;
use crate::utils::error::Result;
use crate::utils::validation;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EvaluationState {
    Idle,
    Gathering,
    Composing,
    AwaitingModel,
    Parsed,
    ParseFailed,
    TransportFailed,
    Rendered,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Assessed { result: EvaluationResult },
    Narrative { text: String },
    /// `reason` stays in the logs; output only carries the fixed message.
    ParseFailed {
        #[serde(rename = "message", serialize_with = "parse_failed_message")]
        reason: String,
    },
    TransportFailed {
        message: String,
        fallback: Option<HeuristicScore>,
    },
}

/// Everything produced for one submission, ready for the report layer.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub request: EvaluationRequest,
    pub signals: MarketSignals,
    pub outcome: Outcome,
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip)]
    pub transitions: Vec<EvaluationState>,
}

impl Evaluation {
    pub fn state(&self) -> EvaluationState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(EvaluationState::Idle)
    }

    /// Called by the report layer once the outcome has been shown.
    pub fn mark_rendered(&mut self) {
        advance(&mut self.transitions, EvaluationState::Rendered);
    }
}

pub struct CheckEngine<C: CompletionClient> {
    client: C,
    gatherer: SignalGatherer,
    composer: PromptComposer,
    interpreter: ResponseInterpreter,
    competitor_limit: usize,
    fallback_scoring: bool,
}

impl<C: CompletionClient> CheckEngine<C> {
    pub fn new(
        client: C,
        gatherer: SignalGatherer,
        composer: PromptComposer,
        competitor_limit: usize,
    ) -> Self {
        let interpreter = ResponseInterpreter::new(composer.mode());
        Self {
            client,
            gatherer,
            composer,
            interpreter,
            competitor_limit,
            fallback_scoring: true,
        }
    }

    pub fn with_fallback_scoring(mut self, enabled: bool) -> Self {
        self.fallback_scoring = enabled;
        self
    }

    /// Runs one submission from `Idle` to a terminal state.
    ///
    /// Only input validation returns `Err`; transport and parse failures are
    /// part of the returned [`Outcome`] so the caller can keep going.
    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation> {
        validation::validate_submission(&request.idea, &request.location)?;

        let mut transitions = vec![EvaluationState::Idle];

        advance(&mut transitions, EvaluationState::Gathering);
        let signals = self.gatherer.gather(request, self.competitor_limit).await;
        tracing::info!(
            "🔎 Gathered {} competitors for '{}' near '{}'",
            signals.competitors.len(),
            request.idea,
            request.location
        );

        advance(&mut transitions, EvaluationState::Composing);
        let completion = self.composer.compose(request, &signals);

        advance(&mut transitions, EvaluationState::AwaitingModel);
        let outcome = match self.client.complete(&completion).await {
            Ok(reply) => match self.interpreter.interpret(&reply) {
                Interpretation::Parsed(result) => {
                    advance(&mut transitions, EvaluationState::Parsed);
                    Outcome::Assessed { result }
                }
                Interpretation::Narrative(text) => {
                    advance(&mut transitions, EvaluationState::Parsed);
                    Outcome::Narrative { text }
                }
                Interpretation::ParseFailed { reason } => {
                    tracing::warn!("⚠️ Could not parse model reply: {}", reason);
                    advance(&mut transitions, EvaluationState::ParseFailed);
                    Outcome::ParseFailed { reason }
                }
            },
            Err(e) => {
                tracing::error!("❌ Model request failed: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                advance(&mut transitions, EvaluationState::TransportFailed);
                let fallback = self
                    .fallback_scoring
                    .then(|| heuristic_score(signals.competitors.len(), &signals.demand));
                Outcome::TransportFailed {
                    message: e.user_friendly_message(),
                    fallback,
                }
            }
        };

        Ok(Evaluation {
            request: request.clone(),
            signals,
            outcome,
            evaluated_at: chrono::Utc::now(),
            transitions,
        })
    }
}

fn parse_failed_message<S: serde::Serializer>(
    _reason: &str,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(PARSE_FAILED_MESSAGE)
}

fn advance(transitions: &mut Vec<EvaluationState>, next: EvaluationState) {
    tracing::debug!("State -> {:?}", next);
    transitions.push(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gatherer::DemandMode;
    use crate::core::interpreter::ResponseMode;
    use crate::domain::model::MarketSize;
    use crate::domain::ports::CompletionRequest;
    use crate::utils::error::CheckError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct FakeClient {
        reply: std::result::Result<String, u16>,
        seen: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl FakeClient {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.seen.lock().await.push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(CheckError::ModelError {
                    status: *status,
                    message: "service unavailable".to_string(),
                }),
            }
        }
    }

    fn engine(client: FakeClient, mode: ResponseMode) -> CheckEngine<FakeClient> {
        CheckEngine::new(
            client,
            SignalGatherer::new(DemandMode::Metrics, "US"),
            PromptComposer::new("test-model", 400, 0.7, mode),
            5,
        )
    }

    #[tokio::test]
    async fn test_empty_idea_never_calls_model() {
        let client = FakeClient::replying("{}");
        let engine = engine(client.clone(), ResponseMode::Structured);

        let result = engine.evaluate(&EvaluationRequest::new("   ", "Springfield")).await;

        assert!(matches!(result, Err(CheckError::ValidationError { .. })));
        assert!(client.seen.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_parsed_reply_walks_happy_path() {
        let client = FakeClient::replying(r#"{"success_probability":"60%","market_size":"medium"}"#);
        let engine = engine(client.clone(), ResponseMode::Structured);

        let mut evaluation = engine
            .evaluate(&EvaluationRequest::new("bakery", "Springfield"))
            .await
            .unwrap();

        let Outcome::Assessed { result } = &evaluation.outcome else {
            panic!("expected an assessment");
        };
        assert_eq!(result.market_size, MarketSize::Medium);
        assert_eq!(evaluation.signals.competitors.len(), 5);
        assert_eq!(
            evaluation.transitions,
            vec![
                EvaluationState::Idle,
                EvaluationState::Gathering,
                EvaluationState::Composing,
                EvaluationState::AwaitingModel,
                EvaluationState::Parsed,
            ]
        );

        evaluation.mark_rendered();
        assert_eq!(evaluation.state(), EvaluationState::Rendered);
        assert_eq!(client.seen.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_garbage_reply_ends_in_parse_failed() {
        let engine = engine(FakeClient::replying("{\"risks\": [\"rent\""), ResponseMode::Structured);
        let evaluation = engine
            .evaluate(&EvaluationRequest::new("bakery", "Springfield"))
            .await
            .unwrap();

        assert!(matches!(evaluation.outcome, Outcome::ParseFailed { .. }));
        assert_eq!(evaluation.state(), EvaluationState::ParseFailed);
    }

    #[tokio::test]
    async fn test_transport_failure_offers_heuristic_fallback() {
        let engine = engine(FakeClient::failing(503), ResponseMode::Structured);
        let evaluation = engine
            .evaluate(&EvaluationRequest::new("bakery", "Springfield"))
            .await
            .unwrap();

        assert_eq!(evaluation.state(), EvaluationState::TransportFailed);
        match evaluation.outcome {
            Outcome::TransportFailed { message, fallback } => {
                assert!(message.contains("unavailable"));
                // 50 - 5*5, Medium/Medium/High => -10
                assert_eq!(fallback.map(|s| s.percent), Some(15));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fallback_can_be_disabled() {
        let engine = engine(FakeClient::failing(500), ResponseMode::Structured).with_fallback_scoring(false);
        let evaluation = engine
            .evaluate(&EvaluationRequest::new("bakery", ""))
            .await
            .unwrap();

        assert!(matches!(
            evaluation.outcome,
            Outcome::TransportFailed { fallback: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_free_text_mode_returns_narrative() {
        let engine = engine(FakeClient::replying("  It should work.  "), ResponseMode::FreeText);
        let evaluation = engine
            .evaluate(&EvaluationRequest::new("bakery", "Springfield"))
            .await
            .unwrap();

        assert_eq!(
            evaluation.outcome,
            Outcome::Narrative {
                text: "It should work.".to_string()
            }
        );
    }
}
