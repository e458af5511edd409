// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`ChatPlatform`] over serenity's HTTP client.
//!
//! Scheduled deletions (notices, trigger cleanup) run on spawned tasks and
//! are best-effort: a failure is a debug line, never an error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{
    ChannelType, CreateChannel, CreateEmbed, CreateMessage, PermissionOverwrite,
    PermissionOverwriteType, Permissions, RoleId,
};
use serenity::http::{Http, HttpError};
use tracing::debug;

use roost_core::{ChannelId, ChatPlatform, Embed, GatewayError, GuildId, MessageId, UserId};

/// Serenity-backed platform implementation.
pub struct SerenityPlatform {
    http: Arc<Http>,
    bot_user: serenity::all::UserId,
}

impl SerenityPlatform {
    /// `bot_user` is the gateway's own user id, needed for the permission
    /// overwrites on created channels.
    pub fn new(http: Arc<Http>, bot_user: serenity::all::UserId) -> Self {
        Self { http, bot_user }
    }

    /// Resolves the bot's own user id over HTTP and builds the platform.
    pub async fn connect(http: Arc<Http>) -> Result<Self, GatewayError> {
        let user = http.get_current_user().await.map_err(map_err)?;
        Ok(Self::new(http, user.id))
    }
}

fn map_err(e: serenity::Error) -> GatewayError {
    if let serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) = &e {
        match resp.status_code.as_u16() {
            403 => return GatewayError::PermissionDenied(resp.error.message.clone()),
            404 => return GatewayError::NotFound(resp.error.message.clone()),
            _ => {}
        }
    }
    GatewayError::Platform {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}

fn channel(id: ChannelId) -> serenity::all::ChannelId {
    serenity::all::ChannelId::new(id.0)
}

fn guild(id: GuildId) -> serenity::all::GuildId {
    serenity::all::GuildId::new(id.0)
}

#[async_trait]
impl ChatPlatform for SerenityPlatform {
    async fn create_private_channel(
        &self,
        guild_id: GuildId,
        name: &str,
        owner: UserId,
    ) -> Result<ChannelId, GatewayError> {
        // The @everyone role shares the guild's id.
        let everyone = RoleId::new(guild_id.0);
        let member_perms = Permissions::VIEW_CHANNEL
            | Permissions::SEND_MESSAGES
            | Permissions::READ_MESSAGE_HISTORY;
        let overwrites = vec![
            PermissionOverwrite {
                allow: Permissions::empty(),
                deny: Permissions::VIEW_CHANNEL,
                kind: PermissionOverwriteType::Role(everyone),
            },
            PermissionOverwrite {
                allow: member_perms,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Member(serenity::all::UserId::new(owner.0)),
            },
            PermissionOverwrite {
                allow: member_perms | Permissions::MANAGE_MESSAGES | Permissions::ATTACH_FILES,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Member(self.bot_user),
            },
        ];
        let builder = CreateChannel::new(name)
            .kind(ChannelType::Text)
            .permissions(overwrites);
        let created = guild(guild_id)
            .create_channel(&self.http, builder)
            .await
            .map_err(map_err)?;
        Ok(ChannelId(created.id.get()))
    }

    async fn delete_channel(&self, id: ChannelId) -> Result<(), GatewayError> {
        channel(id).delete(&self.http).await.map_err(map_err)?;
        Ok(())
    }

    async fn channel_exists(&self, id: ChannelId) -> bool {
        self.http.get_channel(channel(id)).await.is_ok()
    }

    async fn guild_channel_names(&self, id: GuildId) -> Result<Vec<String>, GatewayError> {
        let channels = guild(id).channels(&self.http).await.map_err(map_err)?;
        Ok(channels.values().map(|c| c.name.clone()).collect())
    }

    async fn send_message(
        &self,
        id: ChannelId,
        text: &str,
    ) -> Result<MessageId, GatewayError> {
        let msg = channel(id).say(&self.http, text).await.map_err(map_err)?;
        Ok(MessageId(msg.id.get()))
    }

    async fn send_embed(&self, id: ChannelId, embed: &Embed) -> Result<MessageId, GatewayError> {
        let mut builder = CreateEmbed::new()
            .title(&embed.title)
            .description(&embed.description);
        for (name, value) in &embed.fields {
            builder = builder.field(name, value, false);
        }
        let msg = channel(id)
            .send_message(&self.http, CreateMessage::new().embed(builder))
            .await
            .map_err(map_err)?;
        Ok(MessageId(msg.id.get()))
    }

    async fn send_notice(
        &self,
        id: ChannelId,
        text: &str,
        delete_after: Duration,
    ) -> Result<(), GatewayError> {
        let msg = channel(id).say(&self.http, text).await.map_err(map_err)?;
        let http = Arc::clone(&self.http);
        tokio::spawn(async move {
            tokio::time::sleep(delete_after).await;
            if let Err(e) = msg.delete(&http).await {
                debug!(error = %e, "scheduled notice deletion failed");
            }
        });
        Ok(())
    }

    async fn delete_message(&self, id: ChannelId, message: MessageId) -> Result<(), GatewayError> {
        self.http
            .delete_message(
                channel(id),
                serenity::all::MessageId::new(message.0),
                None,
            )
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn delete_message_after(&self, id: ChannelId, message: MessageId, delay: Duration) {
        let http = Arc::clone(&self.http);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = http
                .delete_message(channel(id), serenity::all::MessageId::new(message.0), None)
                .await
            {
                debug!(error = %e, "scheduled message deletion failed");
            }
        });
    }

    async fn member_is_admin(&self, id: GuildId, user: UserId) -> Result<bool, GatewayError> {
        let partial = guild(id).to_partial_guild(&self.http).await.map_err(map_err)?;
        if partial.owner_id.get() == user.0 {
            return Ok(true);
        }
        let member = guild(id)
            .member(&self.http, serenity::all::UserId::new(user.0))
            .await
            .map_err(map_err)?;
        let perms = partial.member_permissions(&member);
        Ok(perms.administrator() || perms.manage_guild())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclassified_errors_map_to_platform() {
        let err = map_err(serenity::Error::Other("boom"));
        assert!(matches!(err, GatewayError::Platform { .. }));
    }
}
