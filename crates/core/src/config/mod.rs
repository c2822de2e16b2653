//! Application configuration with layered loading.
//!
//! Loading precedence (highest wins):
//! 1. Environment variables (PDFSCOUT_*)
//! 2. TOML config file (if PDFSCOUT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the adapter store JSON file.
    ///
    /// Set via PDFSCOUT_STORE_PATH environment variable.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via PDFSCOUT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via PDFSCOUT_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via PDFSCOUT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Headless-browser navigation timeout in milliseconds.
    ///
    /// Set via PDFSCOUT_RENDER_TIMEOUT_MS environment variable.
    #[serde(default = "default_render_timeout_ms")]
    pub render_timeout_ms: u64,

    /// Delay after navigation settles, for deferred script rendering,
    /// in milliseconds.
    ///
    /// Set via PDFSCOUT_SETTLE_DELAY_MS environment variable.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Whether the browser runs headless.
    ///
    /// Set via PDFSCOUT_HEADLESS environment variable.
    #[serde(default = "default_true")]
    pub headless: bool,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./adapters.json")
}

fn default_user_agent() -> String {
    "pdfscout/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_render_timeout_ms() -> u64 {
    30_000
}

fn default_settle_delay_ms() -> u64 {
    2_000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            render_timeout_ms: default_render_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            headless: true,
        }
    }
}

impl AppConfig {
    /// Fetch timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Render timeout as Duration.
    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    /// Settle delay as Duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PDFSCOUT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PDFSCOUT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store_path, PathBuf::from("./adapters.json"));
        assert_eq!(config.user_agent, "pdfscout/0.1");
        assert_eq!(config.max_bytes, 5_242_880);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.render_timeout_ms, 30_000);
        assert_eq!(config.settle_delay_ms, 2_000);
        assert!(config.headless);
    }

    #[test]
    fn test_timeout_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.render_timeout(), Duration::from_millis(30_000));
        assert_eq!(config.settle_delay(), Duration::from_millis(2_000));
    }
}
