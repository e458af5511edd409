// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chat-platform seam.
//!
//! Everything the session manager needs from Discord goes through
//! [`ChatPlatform`], so the router, allocator, and reaper are testable
//! against an in-memory fake. The serenity-backed implementation lives in
//! `roost-discord`.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::types::{ChannelId, Embed, GuildId, MessageId, UserId};

/// Operations the gateway performs against the chat platform.
///
/// All methods map platform refusals to [`GatewayError::PermissionDenied`]
/// and vanished objects to [`GatewayError::NotFound`].
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Creates a private text channel visible only to `owner` and the bot.
    ///
    /// Permission overwrites: deny @everyone view; allow the owner
    /// view/send/read-history; allow the bot view/send/read-history/
    /// manage-messages/attach-files.
    async fn create_private_channel(
        &self,
        guild: GuildId,
        name: &str,
        owner: UserId,
    ) -> Result<ChannelId, GatewayError>;

    /// Deletes a channel. Missing channels surface as `NotFound`.
    async fn delete_channel(&self, channel: ChannelId) -> Result<(), GatewayError>;

    /// Returns whether the channel still exists on the platform.
    async fn channel_exists(&self, channel: ChannelId) -> bool;

    /// Names of all text channels in the guild, for collision resolution.
    async fn guild_channel_names(&self, guild: GuildId) -> Result<Vec<String>, GatewayError>;

    /// Sends a plain text message (caller guarantees it fits the platform limit).
    async fn send_message(&self, channel: ChannelId, text: &str)
        -> Result<MessageId, GatewayError>;

    /// Sends a rich embed.
    async fn send_embed(&self, channel: ChannelId, embed: &Embed)
        -> Result<MessageId, GatewayError>;

    /// Sends a short notice that the platform deletes after `delete_after`.
    /// Best-effort: the deletion is scheduled, not awaited.
    async fn send_notice(
        &self,
        channel: ChannelId,
        text: &str,
        delete_after: Duration,
    ) -> Result<(), GatewayError>;

    /// Deletes a message immediately.
    async fn delete_message(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> Result<(), GatewayError>;

    /// Schedules a message deletion after `delay`. Best-effort.
    async fn delete_message_after(&self, channel: ChannelId, message: MessageId, delay: Duration);

    /// Whether the user may run admin commands in this guild
    /// (manage-guild permission).
    async fn member_is_admin(&self, guild: GuildId, user: UserId) -> Result<bool, GatewayError>;
}
