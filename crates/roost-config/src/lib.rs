// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Roost gateway.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and `ROOST_*`
//! environment variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! let config = roost_config::load_and_validate().expect("config errors");
//! println!("default model: {}", config.agent.default_model);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_str};
pub use model::RoostConfig;
pub use validation::{timeout_in_bounds, ConfigError, TIMEOUT_MAX_HOURS, TIMEOUT_MIN_HOURS};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Figment errors (unknown keys, type mismatches) and validation errors
/// (out-of-range values) are both reported through [`ConfigError`].
pub fn load_and_validate() -> Result<RoostConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError {
            field: "<config>".to_string(),
            message: err.to_string(),
        }]),
    }
}

/// Load configuration from a TOML string and validate it. For tests.
pub fn load_and_validate_str(toml_content: &str) -> Result<RoostConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError {
            field: "<config>".to_string(),
            message: err.to_string(),
        }]),
    }
}
