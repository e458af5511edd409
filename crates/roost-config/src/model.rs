// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Roost configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with `ROOST_*`
/// environment variable overrides. Every section defaults to sensible
/// values; the secrets (tokens, API keys) have no defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoostConfig {
    /// Gateway identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Discord client settings.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Gemini provider settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// OpenRouter provider settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Inactivity reaper settings.
    #[serde(default)]
    pub reaper: ReaperConfig,
}

/// Gateway identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Default model id bound to newly provisioned channels,
    /// `<prefix>:<native_name>`.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Per-request provider timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_model: default_model(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model() -> String {
    "gemini:gemini-1.5-flash-latest".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

/// Discord client configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    /// Bot token. `None` makes `serve` refuse to start.
    #[serde(default)]
    pub token: Option<String>,

    /// Initial entry-channel id. Overridden by the persisted value once an
    /// admin has run `setentrychannel`.
    #[serde(default)]
    pub entry_channel_id: Option<u64>,
}

/// Gemini provider configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` disables the gemini provider.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// OpenRouter provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenRouterConfig {
    /// OpenRouter API key. `None` disables the openrouter provider.
    #[serde(default)]
    pub api_key: Option<String>,

    /// The single native model name this deployment allows.
    #[serde(default = "default_openrouter_model")]
    pub model: String,

    /// Optional `HTTP-Referer` header value.
    #[serde(default)]
    pub referer: Option<String>,

    /// Optional `X-Title` header value.
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openrouter_model(),
            referer: None,
            title: None,
        }
    }
}

fn default_openrouter_model() -> String {
    "deepseek/deepseek-chat".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "roost.db".to_string()
}

/// Inactivity reaper configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReaperConfig {
    /// Initial inactivity timeout in hours; 0 disables the reaper.
    /// Overridden by the persisted value once an admin has run `settimeout`.
    #[serde(default = "default_timeout_hours")]
    pub inactivity_timeout_hours: f64,

    /// Sweep interval in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_hours: default_timeout_hours(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_timeout_hours() -> f64 {
    6.0
}

fn default_sweep_interval() -> u64 {
    300
}
