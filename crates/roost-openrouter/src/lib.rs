// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter provider adapter.
//!
//! Stateless HTTP completions with a caller-managed history list and
//! rollback-on-failure semantics.

pub mod chat;
pub mod client;
pub mod types;

pub use chat::OpenRouterChat;
pub use client::OpenRouterClient;
pub use types::ChatMessage;
