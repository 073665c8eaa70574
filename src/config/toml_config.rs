use crate::adapters::{nominatim, openai};
use crate::core::gatherer::DemandMode;
use crate::core::interpreter::ResponseMode;
use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub signals: SignalsConfig,
    pub lookup: LookupConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub name: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: Option<u64>,
    pub response_mode: ResponseMode,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: openai::DEFAULT_BASE_URL.to_string(),
            name: "gpt-4o-mini".to_string(),
            api_key: None,
            max_tokens: 600,
            temperature: 0.7,
            timeout_seconds: None,
            response_mode: ResponseMode::Structured,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalsConfig {
    pub competitor_limit: usize,
    pub demand: DemandMode,
    pub region: String,
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            competitor_limit: 5,
            demand: DemandMode::Metrics,
            region: "US".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: nominatim::DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: nominatim::DEFAULT_TIMEOUT_SECS,
            user_agent: "reality-check".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub fallback_on_transport_failure: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            fallback_on_transport_failure: true,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CheckError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| CheckError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// API key from the file, falling back to `OPENAI_API_KEY`.
    ///
    /// An unresolved `${VAR}` placeholder counts as missing.
    pub fn resolve_api_key(&self) -> Result<String> {
        let from_file = self
            .model
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
            .map(str::to_string);

        let key = from_file.or_else(|| {
            std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty())
        });

        validation::validate_required_field("model.api_key", &key).cloned()
    }

    pub fn model_timeout(&self) -> Option<std::time::Duration> {
        self.model.timeout_seconds.map(std::time::Duration::from_secs)
    }

    pub fn lookup_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.lookup.timeout_seconds)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("model.base_url", &self.model.base_url)?;
        validation::validate_non_empty_string("model.name", &self.model.name)?;
        validation::validate_positive_number("model.max_tokens", self.model.max_tokens as usize, 1)?;
        validation::validate_range("model.temperature", self.model.temperature, 0.0, 2.0)?;
        validation::validate_range("signals.competitor_limit", self.signals.competitor_limit, 1, 50)?;
        validation::validate_non_empty_string("signals.region", &self.signals.region)?;

        if self.lookup.enabled {
            validation::validate_url("lookup.endpoint", &self.lookup.endpoint)?;
            validation::validate_non_empty_string("lookup.user_agent", &self.lookup.user_agent)?;
            validation::validate_positive_number(
                "lookup.timeout_seconds",
                self.lookup.timeout_seconds as usize,
                1,
            )?;
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
