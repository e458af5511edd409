// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session over `generateContent`.
//!
//! Gemini's REST endpoint is stateless, so the session holds the `contents`
//! history and posts it whole on every turn, exactly what the vendor SDK's
//! chat object does under the hood. A failed or blocked turn rolls the user
//! entry back so a retry starts from clean history.

use roost_core::{FinishReason, GatewayError, Turn};
use tracing::debug;

use crate::client::GeminiClient;
use crate::types::Content;

/// A live Gemini conversation with provider-side history semantics.
#[derive(Debug)]
pub struct GeminiChat {
    client: GeminiClient,
    model_native: String,
    contents: Vec<Content>,
}

impl GeminiChat {
    pub(crate) fn new(client: GeminiClient, model_native: String) -> Self {
        Self {
            client,
            model_native,
            contents: Vec::new(),
        }
    }

    /// Number of history entries (user and model turns).
    pub fn history_len(&self) -> usize {
        self.contents.len()
    }

    /// Sends one prompt and returns the provider's turn.
    ///
    /// Blocked turns (`SAFETY`, `RECITATION`, prompt-level block) come back
    /// as `Ok` with `text: None` and the reason in `finish`; transport and
    /// HTTP failures come back as `Err`. In every non-normal case the user
    /// entry is removed from history again.
    pub async fn send(&mut self, prompt: &str) -> Result<Turn, GatewayError> {
        self.contents.push(Content::user(prompt));

        let response = match self.client.generate(&self.model_native, &self.contents).await {
            Ok(r) => r,
            Err(e) => {
                self.contents.pop();
                return Err(e);
            }
        };

        // Prompt-level block: no candidates at all.
        if let Some(feedback) = &response.prompt_feedback
            && let Some(reason) = &feedback.block_reason
        {
            debug!(reason = %reason, "gemini blocked the prompt");
            self.contents.pop();
            return Ok(Turn {
                text: None,
                finish: block_reason_to_finish(reason),
            });
        }

        let Some(candidate) = response.candidates.first() else {
            self.contents.pop();
            return Ok(Turn {
                text: None,
                finish: FinishReason::Other,
            });
        };

        let finish = finish_reason(candidate.finish_reason.as_deref());
        match finish {
            FinishReason::Normal | FinishReason::Length => {
                let text = candidate
                    .content
                    .as_ref()
                    .map(Content::text)
                    .unwrap_or_default();
                self.contents.push(Content::model(&text));
                Ok(Turn {
                    text: Some(text),
                    finish,
                })
            }
            // Candidate-level block: discard the text, reflect the reason.
            FinishReason::Safety | FinishReason::Recitation | FinishReason::Other => {
                self.contents.pop();
                Ok(Turn { text: None, finish })
            }
        }
    }
}

fn finish_reason(raw: Option<&str>) -> FinishReason {
    match raw {
        Some("STOP") | None => FinishReason::Normal,
        Some("MAX_TOKENS") => FinishReason::Length,
        Some("SAFETY") => FinishReason::Safety,
        Some("RECITATION") => FinishReason::Recitation,
        Some(_) => FinishReason::Other,
    }
}

fn block_reason_to_finish(raw: &str) -> FinishReason {
    match raw {
        "SAFETY" => FinishReason::Safety,
        _ => FinishReason::Other,
    }
}
