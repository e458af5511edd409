// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Roost conversation gateway.
//!
//! This crate provides the shared id newtypes, the provider turn types, the
//! error taxonomy, and the [`ChatPlatform`] trait that decouples the session
//! manager from the concrete chat-platform client.

pub mod error;
pub mod platform;
pub mod types;

pub use error::GatewayError;
pub use platform::ChatPlatform;
pub use types::{
    ChannelId, ConversationId, Embed, FinishReason, GuildId, Inbound, MessageId, Turn, UserId,
};
