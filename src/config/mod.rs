pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use crate::core::interpreter::ResponseMode;
#[cfg(feature = "cli")]
use crate::app::session::OutputFormat;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "reality-check")]
#[command(about = "Local idea validator: checks a business idea against its neighbourhood")]
pub struct CliConfig {
    /// Your business idea
    #[arg(long)]
    pub idea: Option<String>,

    /// Your city or neighbourhood
    #[arg(long, default_value = "")]
    pub location: String,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the model name from config
    #[arg(long)]
    pub model: Option<String>,

    /// Override the competitor limit from config
    #[arg(long)]
    pub limit: Option<usize>,

    /// Override the response mode (structured | free-text)
    #[arg(long)]
    pub mode: Option<ResponseMode>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Keep prompting for ideas until end of input
    #[arg(short, long)]
    pub interactive: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔 (若有) 並套用命令列覆蓋
    pub fn load_app_config(&self) -> crate::utils::error::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                AppConfig::from_file(path)?
            }
            None => AppConfig::default(),
        };

        if let Some(model) = &self.model {
            config.model.name = model.clone();
        }
        if let Some(limit) = self.limit {
            config.signals.competitor_limit = limit;
        }
        if let Some(mode) = self.mode {
            config.model.response_mode = mode;
        }

        Ok(config)
    }
}
