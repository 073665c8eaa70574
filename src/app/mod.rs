pub mod report;
pub mod session;

use crate::adapters::{NominatimLookup, OpenAiClient};
use crate::config::AppConfig;
use crate::core::engine::CheckEngine;
use crate::core::gatherer::SignalGatherer;
use crate::core::prompt::PromptComposer;
use crate::domain::ports::CompletionClient;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::sync::Arc;

/// 依設定組出引擎，缺少 API key 時直接失敗
pub fn build_engine(config: &AppConfig) -> Result<CheckEngine<OpenAiClient>> {
    config.validate()?;

    let api_key = config.resolve_api_key()?;
    let client = OpenAiClient::with_timeout(api_key, &config.model.base_url, config.model_timeout())?;
    tracing::info!(
        "🤖 Using model {} at {}",
        config.model.name,
        config.model.base_url
    );

    build_engine_with_client(config, client)
}

pub fn build_engine_with_client<C: CompletionClient>(
    config: &AppConfig,
    client: C,
) -> Result<CheckEngine<C>> {
    let mut gatherer = SignalGatherer::new(config.signals.demand, &config.signals.region);
    if config.lookup.enabled {
        let lookup = NominatimLookup::new(
            &config.lookup.endpoint,
            &config.lookup.user_agent,
            config.lookup_timeout(),
        )?;
        gatherer = gatherer.with_lookup(Arc::new(lookup));
        tracing::info!("🗺️ Location lookup enabled via {}", config.lookup.endpoint);
    }

    let composer = PromptComposer::new(
        &config.model.name,
        config.model.max_tokens,
        config.model.temperature,
        config.model.response_mode,
    );

    Ok(CheckEngine::new(client, gatherer, composer, config.signals.competitor_limit)
        .with_fallback_scoring(config.scoring.fallback_on_transport_failure))
}
