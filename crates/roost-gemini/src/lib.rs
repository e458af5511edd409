// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter.
//!
//! Wraps the `generateContent` REST endpoint behind a chat-session object
//! with provider-managed history semantics.

pub mod chat;
pub mod client;
pub mod types;

pub use chat::GeminiChat;
pub use client::GeminiClient;
