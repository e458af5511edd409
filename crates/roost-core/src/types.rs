// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the gateway crates.

use serde::{Deserialize, Serialize};

/// Discord guild (server) snowflake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuildId(pub u64);

/// Discord text-channel snowflake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

/// Discord user snowflake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Discord message snowflake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl std::fmt::Display for GuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key for one live conversation.
///
/// Guild conversations are keyed by their temp channel; direct-message
/// conversations are keyed by the user, since the DM channel is stable
/// per user anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationId {
    Channel(ChannelId),
    Direct(UserId),
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationId::Channel(c) => write!(f, "channel:{c}"),
            ConversationId::Direct(u) => write!(f, "dm:{u}"),
        }
    }
}

/// Provider-declared reason a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Generation completed normally.
    Normal,
    /// Generation was cut off at the token limit; the partial text is usable.
    Length,
    /// Blocked by a safety filter.
    Safety,
    /// Blocked for recitation of training data.
    Recitation,
    /// Anything else, including structurally malformed responses.
    Other,
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinishReason::Normal => write!(f, "normal"),
            FinishReason::Length => write!(f, "length"),
            FinishReason::Safety => write!(f, "safety"),
            FinishReason::Recitation => write!(f, "recitation"),
            FinishReason::Other => write!(f, "other"),
        }
    }
}

/// One completed provider exchange.
///
/// `text` is `None` when the provider blocked the reply; `finish` then
/// carries the reason.
#[derive(Debug, Clone)]
pub struct Turn {
    pub text: Option<String>,
    pub finish: FinishReason,
}

/// An inbound platform message, flattened to what the router needs.
#[derive(Debug, Clone)]
pub struct Inbound {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    /// `None` for direct messages.
    pub guild_id: Option<GuildId>,
    pub author_id: UserId,
    pub author_is_bot: bool,
    /// Display name used for temp-channel naming.
    pub author_name: String,
    pub content: String,
}

impl Inbound {
    /// Returns true when the message arrived outside any guild.
    pub fn is_dm(&self) -> bool {
        self.guild_id.is_none()
    }
}

/// A platform-agnostic rich embed (title, body, key/value fields).
#[derive(Debug, Clone, Default)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub fields: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_integers() {
        let id = ChannelId(123456789012345678);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "123456789012345678");
        let back: ChannelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn inbound_dm_detection() {
        let msg = Inbound {
            message_id: MessageId(1),
            channel_id: ChannelId(2),
            guild_id: None,
            author_id: UserId(3),
            author_is_bot: false,
            author_name: "someone".into(),
            content: "hi".into(),
        };
        assert!(msg.is_dm());
    }

    #[test]
    fn conversation_id_display() {
        assert_eq!(ConversationId::Channel(ChannelId(9)).to_string(), "channel:9");
        assert_eq!(ConversationId::Direct(UserId(9)).to_string(), "dm:9");
    }
}
