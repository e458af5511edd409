// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation.
//!
//! Figment guarantees types; this module checks values: bound ranges for the
//! inactivity timeout, model id shape, and non-empty secrets when present.

use thiserror::Error;

use crate::model::RoostConfig;

/// Inactivity timeout bounds in hours: 0 disables, otherwise [0.1, 720].
pub const TIMEOUT_MIN_HOURS: f64 = 0.1;
pub const TIMEOUT_MAX_HOURS: f64 = 720.0;

/// A single configuration validation failure.
#[derive(Debug, Error)]
#[error("{field}: {message}")]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Returns whether an inactivity timeout value is acceptable.
pub fn timeout_in_bounds(hours: f64) -> bool {
    hours == 0.0 || (TIMEOUT_MIN_HOURS..=TIMEOUT_MAX_HOURS).contains(&hours)
}

/// Validate a loaded configuration, collecting every failure.
pub fn validate_config(config: &RoostConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !config.agent.default_model.contains(':') {
        errors.push(ConfigError::new(
            "agent.default_model",
            "must be of the form <prefix>:<native_name>",
        ));
    }

    if config.agent.request_timeout_secs == 0 {
        errors.push(ConfigError::new(
            "agent.request_timeout_secs",
            "must be at least 1",
        ));
    }

    if !timeout_in_bounds(config.reaper.inactivity_timeout_hours) {
        errors.push(ConfigError::new(
            "reaper.inactivity_timeout_hours",
            format!("must be 0 (disabled) or between {TIMEOUT_MIN_HOURS} and {TIMEOUT_MAX_HOURS}"),
        ));
    }

    if config.reaper.sweep_interval_secs == 0 {
        errors.push(ConfigError::new(
            "reaper.sweep_interval_secs",
            "must be at least 1",
        ));
    }

    if let Some(token) = &config.discord.token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::new("discord.token", "must not be blank"));
    }

    if config.openrouter.model.trim().is_empty() {
        errors.push(ConfigError::new("openrouter.model", "must not be blank"));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoostConfig;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&RoostConfig::default()).is_ok());
    }

    #[test]
    fn timeout_bounds() {
        assert!(timeout_in_bounds(0.0));
        assert!(timeout_in_bounds(0.1));
        assert!(timeout_in_bounds(720.0));
        assert!(!timeout_in_bounds(0.05));
        assert!(!timeout_in_bounds(-1.0));
        assert!(!timeout_in_bounds(721.0));
    }

    #[test]
    fn out_of_range_timeout_is_reported() {
        let mut config = RoostConfig::default();
        config.reaper.inactivity_timeout_hours = 1000.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "reaper.inactivity_timeout_hours"));
    }

    #[test]
    fn unprefixed_default_model_is_reported() {
        let mut config = RoostConfig::default();
        config.agent.default_model = "gemini-1.5-flash-latest".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "agent.default_model"));
    }

    #[test]
    fn blank_token_is_reported() {
        let mut config = RoostConfig::default();
        config.discord.token = Some("  ".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "discord.token"));
    }
}
