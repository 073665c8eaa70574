use crate::domain::model::{DemandSignal, DemandTier};
use serde::Serialize;

const BASE_SCORE: i32 = 50;
const PER_COMPETITOR_PENALTY: i32 = 5;

/// A rule-of-thumb success score, used only when the model is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeuristicScore {
    pub percent: u8,
}

impl std::fmt::Display for HeuristicScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent)
    }
}

pub fn heuristic_score(competitor_count: usize, demand: &DemandSignal) -> HeuristicScore {
    let penalty = i32::try_from(competitor_count)
        .unwrap_or(i32::MAX)
        .saturating_mul(PER_COMPETITOR_PENALTY);
    let score = BASE_SCORE
        .saturating_sub(penalty)
        .saturating_add(tier_adjustment(demand));

    HeuristicScore {
        percent: score.clamp(0, 100) as u8,
    }
}

fn tier_adjustment(demand: &DemandSignal) -> i32 {
    match demand {
        DemandSignal::Descriptive(_) => 0,
        DemandSignal::Metrics {
            search_volume,
            population_growth,
            competitor_density,
        } => {
            let volume = match search_volume {
                DemandTier::High => 10,
                DemandTier::Medium => 0,
                DemandTier::Low => -10,
            };
            let growth = match population_growth {
                DemandTier::High => 5,
                DemandTier::Medium => 0,
                DemandTier::Low => -5,
            };
            // 競爭密度越高越不利
            let density = match competitor_density {
                DemandTier::High => -10,
                DemandTier::Medium => 0,
                DemandTier::Low => 5,
            };
            volume + growth + density
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(volume: DemandTier, growth: DemandTier, density: DemandTier) -> DemandSignal {
        DemandSignal::Metrics {
            search_volume: volume,
            population_growth: growth,
            competitor_density: density,
        }
    }

    #[test]
    fn test_base_score_without_signals() {
        let score = heuristic_score(0, &DemandSignal::Descriptive("N/A".to_string()));
        assert_eq!(score.percent, 50);
        assert_eq!(score.to_string(), "50%");
    }

    #[test]
    fn test_competitors_and_tiers_adjust_score() {
        let demand = metrics(DemandTier::High, DemandTier::Medium, DemandTier::Low);
        // 50 - 10 + 10 + 0 + 5
        assert_eq!(heuristic_score(2, &demand).percent, 55);
    }

    #[test]
    fn test_score_is_clamped() {
        let bleak = metrics(DemandTier::Low, DemandTier::Low, DemandTier::High);
        assert_eq!(heuristic_score(40, &bleak).percent, 0);
        assert_eq!(heuristic_score(usize::MAX, &bleak).percent, 0);

        let bright = metrics(DemandTier::High, DemandTier::High, DemandTier::Low);
        assert_eq!(heuristic_score(0, &bright).percent, 70);
    }
}
