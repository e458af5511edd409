// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation ephemeral state.
//!
//! The two provider history models (provider-owned vs caller-owned) live
//! behind the [`ProviderState`] tagged union; everything outside this module
//! only ever calls `send` and never inspects the variant.

use chrono::{DateTime, Utc};

use roost_core::{ConversationId, GatewayError, Turn};
use roost_gemini::GeminiChat;
use roost_models::{ModelId, ProviderKind};
use roost_openrouter::OpenRouterChat;

/// Provider-side state of one conversation.
#[derive(Debug)]
pub enum ProviderState {
    Gemini(GeminiChat),
    OpenRouter(OpenRouterChat),
}

impl ProviderState {
    /// Sends one prompt on whichever protocol this conversation speaks.
    pub async fn send(&mut self, prompt: &str) -> Result<Turn, GatewayError> {
        match self {
            ProviderState::Gemini(chat) => chat.send(prompt).await,
            ProviderState::OpenRouter(chat) => chat.send(prompt).await,
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderState::Gemini(_) => ProviderKind::Gemini,
            ProviderState::OpenRouter(_) => ProviderKind::OpenRouter,
        }
    }
}

/// Ephemeral record pairing a conversation with its provider state.
///
/// Lazily created on the first turn, reconstructible from the durable
/// binding plus one turn of interaction. Must never outlive the
/// corresponding temp channel.
#[derive(Debug)]
pub struct ConversationState {
    pub conversation_id: ConversationId,
    pub model: ModelId,
    pub provider: ProviderState,
    pub last_active: DateTime<Utc>,
    pub warned_inactive: bool,
}

impl ConversationState {
    pub fn new(conversation_id: ConversationId, model: ModelId, provider: ProviderState) -> Self {
        Self {
            conversation_id,
            model,
            provider,
            last_active: Utc::now(),
            warned_inactive: false,
        }
    }

    /// Records activity: bumps the timestamp and clears any pending
    /// inactivity warning.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_active = at;
        self.warned_inactive = false;
    }
}
