//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

/// Largest UTC offset any real time zone uses (UTC+14:00).
const MAX_UTC_OFFSET_MINUTES: u32 = 14 * 60;

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `base_url` or `deeplink_base_url` is not an http(s) URL
    /// - `user_agent` is empty
    /// - `deeplink_utc_offset_minutes` is outside ±14h
    /// - `max_flexibility_days` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        for (field, value) in [("base_url", &self.base_url), ("deeplink_base_url", &self.deeplink_base_url)] {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be an http(s) URL".into() });
            }
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.deeplink_utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::Invalid {
                field: "deeplink_utc_offset_minutes".into(),
                reason: "must be within -840..=840".into(),
            });
        }

        if self.max_flexibility_days == 0 {
            return Err(ConfigError::Invalid {
                field: "max_flexibility_days".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.api_key.is_none() || self.akamai_telemetry.is_none() {
            tracing::warn!(
                api_key_set = self.api_key.is_some(),
                telemetry_set = self.akamai_telemetry.is_some(),
                "upstream credentials incomplete; searches will fail until both are set"
            );
        }

        Ok(())
    }
}
