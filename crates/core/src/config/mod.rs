//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MILESFARE_*)
//! 2. TOML config file (if MILESFARE_CONFIG_FILE set)
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

/// Default upstream flight search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api-air-flightsearch-blue.smiles.com.br/v1/airlines/search";

/// Default front-end page that deep links point at.
pub const DEFAULT_DEEPLINK_BASE_URL: &str = "https://www.smiles.com.br/mfe/emissao-passagem/";

/// User agent of the mobile web front end.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 \
                                      (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";

/// São Paulo wall clock (UTC-03:00).
pub const DEFAULT_DEEPLINK_UTC_OFFSET_MINUTES: i32 = -180;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MILESFARE_*)
/// 2. TOML config file (if MILESFARE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key sent as `x-api-key` on every upstream request.
    ///
    /// Set via MILESFARE_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Anti-bot telemetry token sent as `Akamai-BM-Telemetry`.
    ///
    /// Set via MILESFARE_AKAMAI_TELEMETRY environment variable.
    #[serde(default)]
    pub akamai_telemetry: Option<String>,

    /// Upstream search endpoint.
    ///
    /// Set via MILESFARE_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    ///
    /// Set via MILESFARE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for upstream requests.
    ///
    /// Set via MILESFARE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Front-end page used for booking deep links.
    ///
    /// Set via MILESFARE_DEEPLINK_BASE_URL environment variable.
    #[serde(default = "default_deeplink_base_url")]
    pub deeplink_base_url: String,

    /// Offset from UTC, in minutes, of the wall clock the front end uses
    /// when it encodes departure dates.
    ///
    /// Set via MILESFARE_DEEPLINK_UTC_OFFSET_MINUTES environment variable.
    #[serde(default = "default_deeplink_utc_offset_minutes")]
    pub deeplink_utc_offset_minutes: i32,

    /// CSV file with airport reference data.
    ///
    /// Set via MILESFARE_AIRPORTS_PATH environment variable.
    /// When unset, airport codes are only checked for shape.
    #[serde(default)]
    pub airports_path: Option<PathBuf>,

    /// Largest flexibility window accepted from callers.
    ///
    /// Set via MILESFARE_MAX_FLEXIBILITY_DAYS environment variable.
    #[serde(default = "default_max_flexibility_days")]
    pub max_flexibility_days: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_deeplink_base_url() -> String {
    DEFAULT_DEEPLINK_BASE_URL.into()
}

fn default_deeplink_utc_offset_minutes() -> i32 {
    DEFAULT_DEEPLINK_UTC_OFFSET_MINUTES
}

fn default_max_flexibility_days() -> u32 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            akamai_telemetry: None,
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            deeplink_base_url: default_deeplink_base_url(),
            deeplink_utc_offset_minutes: default_deeplink_utc_offset_minutes(),
            airports_path: None,
            max_flexibility_days: default_max_flexibility_days(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MILESFARE_`
    /// 2. TOML file from `MILESFARE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MILESFARE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MILESFARE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the API key is not set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "api_key".into(),
            hint: "Set MILESFARE_API_KEY environment variable".into(),
        })
    }

    /// Check if the telemetry token is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the telemetry token is not set.
    pub fn require_telemetry(&self) -> Result<&str, ConfigError> {
        self.akamai_telemetry
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "akamai_telemetry".into(),
                hint: "Set MILESFARE_AKAMAI_TELEMETRY environment variable".into(),
            })
    }
}
