//! Application configuration.
//!
//! Everything non-secret lives in a TOML file; credentials come from the
//! environment so the config file can be committed.

use crate::error::{AppError, AppResult};
use basis_engine::AlertThresholds;
use basis_feed::QuoteEndpoint;
use serde::Deserialize;
use std::path::Path;

/// Quote source endpoints plus the night-session retry policy.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotesConfig {
    /// Spot (cash index) endpoint.
    pub spot: QuoteEndpoint,
    /// Futures endpoint.
    pub future: QuoteEndpoint,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Retry policy for the futures leg when the cash market is closed.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Additional fetch attempts. Default: 3.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause between attempts, in seconds. Default: 10.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay_secs() -> u64 {
    10
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_delay_secs(),
        }
    }
}

/// Document store location for the persisted watcher state.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    /// Document id within the store. Default: `taifex-basis`.
    #[serde(default = "default_doc_id")]
    pub doc_id: String,
}

fn default_doc_id() -> String {
    "taifex-basis".to_string()
}

/// Alert delivery targets.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Telegram chat ids to deliver to.
    pub chat_ids: Vec<i64>,
    /// Override the Telegram API host (tests, proxies).
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub quotes: QuotesConfig,
    #[serde(default)]
    pub engine: AlertThresholds,
    pub store: StoreConfig,
    pub notify: NotifyConfig,
    /// Comma-separated `YYYY-MM-DD` market holidays.
    #[serde(default)]
    pub special_dates: String,
}

impl AppConfig {
    /// Load configuration, preferring `BASIS_CONFIG` over the default path.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("BASIS_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            Err(AppError::Config(format!("Config file not found: {config_path}")))
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        for (name, endpoint) in [("quotes.spot", &self.quotes.spot), ("quotes.future", &self.quotes.future)] {
            if endpoint.url.is_empty() {
                return Err(AppError::Config(format!("{name}.url must be set")));
            }
            if !endpoint.locator.starts_with('/') {
                return Err(AppError::Config(format!(
                    "{name}.locator must be a JSON pointer starting with '/'"
                )));
            }
        }
        if self.store.base_url.is_empty() {
            return Err(AppError::Config("store.base_url must be set".to_string()));
        }
        if self.notify.chat_ids.is_empty() {
            return Err(AppError::Config("notify.chat_ids must not be empty".to_string()));
        }
        if self.quotes.retry.max_attempts == 0 {
            return Err(AppError::Config("quotes.retry.max_attempts must be at least 1".to_string()));
        }
        if self.engine.threshold <= 0.0 || self.engine.threshold_changed <= 0.0 {
            return Err(AppError::Config("engine thresholds must be positive".to_string()));
        }
        Ok(())
    }
}

/// Secrets pulled from the environment at startup.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub telegram_token: String,
    pub store_token: Option<String>,
}

impl Credentials {
    /// `BASIS_TELEGRAM_TOKEN` is required; `BASIS_STORE_TOKEN` is optional
    /// for stores without auth.
    pub fn from_env() -> AppResult<Self> {
        let telegram_token = std::env::var("BASIS_TELEGRAM_TOKEN")
            .map_err(|_| AppError::Config("BASIS_TELEGRAM_TOKEN not set".to_string()))?;
        if telegram_token.is_empty() {
            return Err(AppError::Config("BASIS_TELEGRAM_TOKEN is empty".to_string()));
        }
        Ok(Self {
            telegram_token,
            store_token: std::env::var("BASIS_STORE_TOKEN").ok(),
        })
    }
}
