// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider client registry.
//!
//! Either provider may be absent (no API key configured); binding a model
//! whose provider is absent is a configuration error, not a crash.

use roost_core::GatewayError;
use roost_gemini::GeminiClient;
use roost_models::{ModelId, ProviderKind};
use roost_openrouter::OpenRouterClient;
use roost_session::ProviderState;

/// The configured provider clients.
#[derive(Debug, Clone)]
pub struct Providers {
    gemini: Option<GeminiClient>,
    openrouter: Option<OpenRouterClient>,
}

impl Providers {
    pub fn new(gemini: Option<GeminiClient>, openrouter: Option<OpenRouterClient>) -> Self {
        Self { gemini, openrouter }
    }

    /// Whether `model`'s provider has a configured client.
    pub fn is_available(&self, model: &ModelId) -> bool {
        match model.kind() {
            ProviderKind::Gemini => self.gemini.is_some(),
            ProviderKind::OpenRouter => self.openrouter.is_some(),
        }
    }

    /// Starts a fresh conversation against `model`'s provider.
    pub fn start(&self, model: &ModelId) -> Result<ProviderState, GatewayError> {
        match model.kind() {
            ProviderKind::Gemini => self
                .gemini
                .as_ref()
                .map(|c| ProviderState::Gemini(c.start_chat(model)))
                .ok_or_else(|| {
                    GatewayError::InternalConfig("gemini API key not configured".into())
                }),
            ProviderKind::OpenRouter => self
                .openrouter
                .as_ref()
                .map(|c| ProviderState::OpenRouter(c.start_chat(model)))
                .ok_or_else(|| {
                    GatewayError::InternalConfig("openrouter API key not configured".into())
                }),
        }
    }
}
