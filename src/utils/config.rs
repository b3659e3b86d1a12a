use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use config::{builder::DefaultState, Config as ConfigLib, ConfigBuilder, ConfigError, Environment, File};
use crate::utils::error::{Result, ClientError};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub verification: VerificationConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: u64,
    pub connect_timeout: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    pub max_image_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub recent_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<String>,
}

impl Config {
    /// Defaults, then `config/default` and `config/local` if present, then
    /// `FINGUARD_*` environment variables (e.g. `FINGUARD_API__BASE_URL`).
    pub fn new() -> Result<Self> {
        Self::load(None)
    }

    /// Like [`Config::new`] with an extra file layered above the `config/` files.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::load(Some(path))
    }

    /// Defaults only, with the backend pointed at `base_url`. Ignores files and
    /// environment.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let config = Self::defaults()?
            .set_override("api.base_url", base_url)?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn defaults() -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
        ConfigLib::builder()
            .set_default("api.base_url", "http://127.0.0.1:5000/api")?
            .set_default("api.request_timeout", 60)?
            .set_default("api.connect_timeout", 10)?
            .set_default("verification.max_image_bytes", 16_777_216i64)?  // 16MB, backend cap
            .set_default("dashboard.recent_limit", 10)?
            .set_default("logging.level", "info")
    }

    fn load(extra: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("FINGUARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ClientError::Config("api.base_url must be set".into()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "api.base_url must be an http(s) URL, got {}",
                base_url
            )));
        }
        if self.api.request_timeout == 0 || self.api.connect_timeout == 0 {
            return Err(ClientError::Config("API timeouts must be greater than 0".into()));
        }

        if self.verification.max_image_bytes == 0 {
            return Err(ClientError::Config("max_image_bytes must be greater than 0".into()));
        }

        if self.dashboard.recent_limit == 0 {
            return Err(ClientError::Config("recent_limit must be greater than 0".into()));
        }

        Ok(())
    }

    pub fn get_request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout)
    }

    pub fn get_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.api.connect_timeout)
    }
}

impl From<ConfigError> for ClientError {
    fn from(error: ConfigError) -> Self {
        ClientError::Config(error.to_string())
    }
}
