use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NOT_AVAILABLE: &str = "N/A";

/// 一次使用者提交的內容，處理完即丟棄
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationRequest {
    pub idea: String,
    pub location: String,
}

impl EvaluationRequest {
    pub fn new(idea: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            idea: idea.into(),
            location: location.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCompetitorEntry")]
pub struct CompetitorEntry {
    pub name: String,
    pub distance: String,
    pub rating: String,
}

// 缺少或為 null 的欄位一律視為 "N/A"
#[derive(Deserialize)]
struct RawCompetitorEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    distance: Option<String>,
    #[serde(default, deserialize_with = "optional_text_or_number")]
    rating: Option<String>,
}

impl From<RawCompetitorEntry> for CompetitorEntry {
    fn from(raw: RawCompetitorEntry) -> Self {
        Self {
            name: raw.name.unwrap_or_else(not_available),
            distance: raw.distance.unwrap_or_else(not_available),
            rating: raw.rating.unwrap_or_else(not_available),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DemandTier {
    Low,
    Medium,
    High,
}

impl DemandTier {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(DemandTier::Low),
            "medium" => Some(DemandTier::Medium),
            "high" => Some(DemandTier::High),
            _ => None,
        }
    }
}

impl fmt::Display for DemandTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DemandTier::Low => "Low",
            DemandTier::Medium => "Medium",
            DemandTier::High => "High",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for DemandTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DemandTier::parse(&raw).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Str(&raw), &"one of Low, Medium, High")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DemandSignal {
    Descriptive(String),
    Metrics {
        search_volume: DemandTier,
        population_growth: DemandTier,
        competitor_density: DemandTier,
    },
}

impl Default for DemandSignal {
    fn default() -> Self {
        DemandSignal::Descriptive(NOT_AVAILABLE.to_string())
    }
}

impl fmt::Display for DemandSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandSignal::Descriptive(text) => f.write_str(text),
            DemandSignal::Metrics {
                search_volume,
                population_growth,
                competitor_density,
            } => write!(
                f,
                "search volume {}, population growth {}, competitor density {}",
                search_volume, population_growth, competitor_density
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MarketSize {
    Small,
    Medium,
    Large,
    #[default]
    Unknown,
}

impl fmt::Display for MarketSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MarketSize::Small => "Small",
            MarketSize::Medium => "Medium",
            MarketSize::Large => "Large",
            MarketSize::Unknown => NOT_AVAILABLE,
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for MarketSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(MarketSize::Small),
            "medium" => Ok(MarketSize::Medium),
            "large" => Ok(MarketSize::Large),
            _ => Err(de::Error::invalid_value(
                de::Unexpected::Str(&raw),
                &"one of small, medium, large",
            )),
        }
    }
}

/// The structured assessment returned by the model.
///
/// Every field is always present after a successful parse; absent or `null`
/// keys take their defaults. A key that is present with the wrong type fails
/// the parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEvaluationResult")]
pub struct EvaluationResult {
    pub success_probability: String,
    pub market_size: MarketSize,
    pub competitor_count: u32,
    pub location: String,
    pub local_demand: DemandSignal,
    pub nearby_competitors: Vec<CompetitorEntry>,
    pub key_insights: Vec<String>,
    pub risks: Vec<String>,
}

#[derive(Deserialize)]
struct RawEvaluationResult {
    #[serde(default, deserialize_with = "optional_text_or_number")]
    success_probability: Option<String>,
    #[serde(default)]
    market_size: Option<MarketSize>,
    #[serde(default)]
    competitor_count: Option<u32>,
    // 舊版提示詞使用的鍵名
    #[serde(default)]
    competitors: Option<u32>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    local_demand: Option<DemandSignal>,
    #[serde(default)]
    nearby_competitors: Option<Vec<CompetitorEntry>>,
    #[serde(default)]
    key_insights: Option<Vec<String>>,
    #[serde(default)]
    risks: Option<Vec<String>>,
}

impl From<RawEvaluationResult> for EvaluationResult {
    fn from(raw: RawEvaluationResult) -> Self {
        Self {
            success_probability: raw.success_probability.unwrap_or_else(not_available),
            market_size: raw.market_size.unwrap_or_default(),
            // competitor_count wins when both keys are sent
            competitor_count: raw.competitor_count.or(raw.competitors).unwrap_or(0),
            location: raw.location.unwrap_or_else(not_available),
            local_demand: raw.local_demand.unwrap_or_default(),
            nearby_competitors: raw.nearby_competitors.unwrap_or_default(),
            key_insights: raw.key_insights.unwrap_or_default(),
            risks: raw.risks.unwrap_or_default(),
        }
    }
}

/// 蒐集到的市場訊號
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSignals {
    pub competitors: Vec<CompetitorEntry>,
    pub demand: DemandSignal,
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

// 模型有時會把數值寫成數字而不是字串，統一保留為文字
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn optional_text_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        }),
    )
}
