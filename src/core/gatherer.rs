use crate::domain::model::{CompetitorEntry, DemandSignal, DemandTier, EvaluationRequest, MarketSignals};
use crate::domain::ports::LocationLookup;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandMode {
    /// A fixed descriptive sentence.
    Placeholder,
    /// Static dummy tiers.
    #[default]
    Metrics,
}

pub struct SignalGatherer {
    lookup: Option<Arc<dyn LocationLookup>>,
    demand_mode: DemandMode,
    region: String,
}

impl SignalGatherer {
    pub fn new(demand_mode: DemandMode, region: impl Into<String>) -> Self {
        Self {
            lookup: None,
            demand_mode,
            region: region.into(),
        }
    }

    pub fn with_lookup(mut self, lookup: Arc<dyn LocationLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub async fn gather(&self, request: &EvaluationRequest, limit: usize) -> MarketSignals {
        let competitors = self
            .find_competitors(&request.idea, &request.location, limit)
            .await;
        let demand = self.demand_signal(&request.idea, &request.location, &competitors);
        MarketSignals {
            competitors,
            demand,
        }
    }

    /// Never fails: an unreachable or empty lookup just means no competitors.
    pub async fn find_competitors(
        &self,
        idea: &str,
        location: &str,
        limit: usize,
    ) -> Vec<CompetitorEntry> {
        if let Some(lookup) = &self.lookup {
            if location.trim().is_empty() {
                tracing::warn!("⚠️ No location given, skipping competitor lookup");
                return Vec::new();
            }

            match lookup.locate(location).await {
                Ok(Some(found)) => {
                    tracing::debug!(
                        "Location '{}' resolved to {} ({:.4}, {:.4})",
                        location,
                        found.display_name,
                        found.latitude,
                        found.longitude
                    );
                }
                Ok(None) => {
                    tracing::warn!("⚠️ Location '{}' not found, no competitors listed", location);
                    return Vec::new();
                }
                Err(e) => {
                    tracing::warn!("⚠️ Location lookup failed, no competitors listed: {}", e);
                    return Vec::new();
                }
            }
        }

        synthetic_competitors(idea, limit)
    }

    pub fn demand_signal(
        &self,
        idea: &str,
        location: &str,
        competitors: &[CompetitorEntry],
    ) -> DemandSignal {
        match self.demand_mode {
            DemandMode::Placeholder => {
                tracing::debug!("Using placeholder demand for '{}' near '{}'", idea, location);
                DemandSignal::Descriptive(format!(
                    "No search trend data for '{}' in region {}",
                    idea, self.region
                ))
            }
            DemandMode::Metrics => DemandSignal::Metrics {
                search_volume: DemandTier::Medium,
                population_growth: DemandTier::Medium,
                competitor_density: density_for(competitors.len()),
            },
        }
    }
}

pub fn synthetic_competitors(idea: &str, limit: usize) -> Vec<CompetitorEntry> {
    (0..limit)
        .map(|i| {
            let step = i as f64;
            CompetitorEntry {
                name: format!("{} Shop {}", idea, i + 1),
                distance: format!("{:.1} miles", 0.4 + 0.6 * step),
                rating: format!("{:.1}", 3.5 + 0.2 * step),
            }
        })
        .collect()
}

fn density_for(count: usize) -> DemandTier {
    match count {
        0 => DemandTier::Low,
        1..=3 => DemandTier::Medium,
        _ => DemandTier::High,
    }
}
