use crate::config::{ingestion_config::IngestionConfig, log_config::LoggingConfig};
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize, PartialEq, Clone, Serialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub ingestion: IngestionConfig,
}

pub struct AppConfigBuilder {
    logging: LoggingConfig,
    ingestion: IngestionConfig,
}

impl From<AppConfig> for AppConfigBuilder {
    fn from(config: AppConfig) -> Self {
        Self {
            logging: config.logging,
            ingestion: config.ingestion,
        }
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfig::default().into()
    }

    pub fn with_log_level(mut self, log_level: String) -> Self {
        self.logging.log_level = log_level;
        self
    }

    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.ingestion.num_threads = Some(num_threads);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.ingestion.parallel = parallel;
        self
    }

    pub fn build(self) -> AppConfig {
        AppConfig {
            logging: self.logging,
            ingestion: self.ingestion,
        }
    }
}

/// Layer a config file (any format the `config` crate recognises by extension) over
/// `app_config`, or over the defaults when no config is given. Keys missing from the file keep
/// their base value.
pub fn load_config(
    app_config: Option<AppConfig>,
    config_path: Option<PathBuf>,
) -> Result<AppConfig, ConfigError> {
    let app_config = app_config.unwrap_or_default();
    let json = serde_json::to_string(&app_config).map_err(|e| ConfigError::Foreign(Box::new(e)))?;
    let mut builder = Config::builder().add_source(File::from_str(&json, FileFormat::Json));
    if let Some(config_path) = config_path {
        builder = builder.add_source(File::from(config_path));
    }
    builder.build()?.try_deserialize::<AppConfig>()
}
