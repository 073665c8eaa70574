use httpmock::prelude::*;
use reality_check::{build_engine, AppConfig, EvaluationRequest, Outcome};
use std::time::Duration;

fn config_for(model: &MockServer, lookup: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.model.base_url = model.url("/v1");
    config.model.api_key = Some("test-key".to_string());
    config.lookup.enabled = true;
    config.lookup.endpoint = lookup.url("/search");
    config.lookup.user_agent = "reality-check-test".to_string();
    config.signals.competitor_limit = 3;
    config
}

fn model_mock(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"success_probability\": \"55%\"}"}}]
        }));
    })
}

#[tokio::test]
async fn test_resolved_location_lists_synthetic_competitors() {
    let model = MockServer::start();
    let lookup = MockServer::start();
    let lookup_mock = lookup.mock(|when, then| {
        when.method(GET).path("/search").query_param("q", "Austin");
        then.status(200).json_body(serde_json::json!([
            {"lat": "30.2711", "lon": "-97.7437", "display_name": "Austin, Texas"}
        ]));
    });
    let api_mock = model_mock(&model);

    let engine = build_engine(&config_for(&model, &lookup)).unwrap();
    let evaluation = engine
        .evaluate(&EvaluationRequest::new("Coffee Shop", "Austin"))
        .await
        .unwrap();

    lookup_mock.assert();
    api_mock.assert();
    let names: Vec<&str> = evaluation
        .signals
        .competitors
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Coffee Shop Shop 1", "Coffee Shop Shop 2", "Coffee Shop Shop 3"]
    );
    assert!(matches!(evaluation.outcome, Outcome::Assessed { .. }));
}

#[tokio::test]
async fn test_unknown_location_means_no_competitors() {
    let model = MockServer::start();
    let lookup = MockServer::start();
    lookup.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(serde_json::json!([]));
    });
    let api_mock = model.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains("Competitors nearby: None found");
        then.status(200).json_body(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "{}"}}]
        }));
    });

    let engine = build_engine(&config_for(&model, &lookup)).unwrap();
    let evaluation = engine
        .evaluate(&EvaluationRequest::new("bakery", "Nowhere Town"))
        .await
        .unwrap();

    api_mock.assert();
    assert!(evaluation.signals.competitors.is_empty());
}

#[tokio::test]
async fn test_lookup_timeout_is_recovered() {
    let model = MockServer::start();
    let lookup = MockServer::start();
    lookup.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(serde_json::json!([{"lat": "1.0", "lon": "2.0"}]));
    });
    let api_mock = model_mock(&model);

    let mut config = config_for(&model, &lookup);
    config.lookup.timeout_seconds = 1;

    let engine = build_engine(&config).unwrap();
    let evaluation = engine
        .evaluate(&EvaluationRequest::new("bakery", "Springfield"))
        .await
        .unwrap();

    api_mock.assert();
    assert!(evaluation.signals.competitors.is_empty());
    assert!(matches!(evaluation.outcome, Outcome::Assessed { .. }));
}
