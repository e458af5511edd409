// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session with caller-managed history.
//!
//! The session owns an ordered message list. `send` appends the user entry,
//! posts the whole list, and appends the assistant reply on success. Any
//! transport or structural failure rolls the user append back so the next
//! retry starts clean; a content filter rolls back before the assistant
//! entry is ever added, leaving neither side of the exchange in history.

use roost_core::{FinishReason, GatewayError, Turn};
use tracing::debug;

use crate::client::OpenRouterClient;
use crate::types::ChatMessage;

/// A live OpenRouter conversation.
#[derive(Debug)]
pub struct OpenRouterChat {
    client: OpenRouterClient,
    model_native: String,
    messages: Vec<ChatMessage>,
}

impl OpenRouterChat {
    pub(crate) fn new(client: OpenRouterClient, model_native: String) -> Self {
        Self {
            client,
            model_native,
            messages: Vec::new(),
        }
    }

    /// Number of history entries. A successful turn adds exactly two.
    pub fn history_len(&self) -> usize {
        self.messages.len()
    }

    /// Sends one prompt and returns the provider's turn.
    pub async fn send(&mut self, prompt: &str) -> Result<Turn, GatewayError> {
        self.messages.push(ChatMessage::user(prompt));

        let response = match self.client.complete(&self.model_native, &self.messages).await {
            Ok(r) => r,
            Err(e) => {
                self.messages.pop();
                return Err(e);
            }
        };

        let Some(choice) = response.choices.first() else {
            self.messages.pop();
            return Ok(Turn {
                text: None,
                finish: FinishReason::Other,
            });
        };

        match choice.finish_reason.as_deref() {
            Some("content_filter") => {
                debug!("openrouter filtered the reply");
                self.messages.pop();
                Ok(Turn {
                    text: None,
                    finish: FinishReason::Safety,
                })
            }
            finish => {
                let text = choice.message.content.clone().unwrap_or_default();
                self.messages.push(ChatMessage::assistant(&text));
                Ok(Turn {
                    text: Some(text),
                    finish: match finish {
                        Some("length") => FinishReason::Length,
                        _ => FinishReason::Normal,
                    },
                })
            }
        }
    }
}
