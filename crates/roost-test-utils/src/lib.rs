// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`ChatPlatform`] fake shared by the router and reaper tests.
//!
//! Records every outbound call so tests can assert on the exact platform
//! traffic a scenario produced, and lets tests seed channels and admins
//! or force channel creation to fail.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use roost_core::{ChannelId, ChatPlatform, Embed, GatewayError, GuildId, MessageId, UserId};

/// One channel known to the fake platform.
#[derive(Debug, Clone)]
pub struct MockChannel {
    pub guild: GuildId,
    pub name: String,
    pub owner: Option<UserId>,
}

/// One plain message the gateway sent.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub channel: ChannelId,
    pub message_id: MessageId,
    pub text: String,
}

/// In-memory chat platform.
#[derive(Default)]
pub struct MockPlatform {
    next_channel: AtomicU64,
    next_message: AtomicU64,
    channels: Mutex<HashMap<ChannelId, MockChannel>>,
    admins: Mutex<Vec<UserId>>,
    fail_channel_create: AtomicBool,
    fail_send: AtomicBool,
    pub messages: Mutex<Vec<SentMessage>>,
    pub embeds: Mutex<Vec<(ChannelId, Embed)>>,
    pub notices: Mutex<Vec<(ChannelId, String)>>,
    pub deleted_messages: Mutex<Vec<(ChannelId, MessageId)>>,
    pub deleted_channels: Mutex<Vec<ChannelId>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            next_channel: AtomicU64::new(1000),
            next_message: AtomicU64::new(5000),
            ..Self::default()
        }
    }

    /// Seeds a pre-existing channel, e.g. the entry channel.
    pub fn seed_channel(&self, id: ChannelId, guild: GuildId, name: &str) {
        self.channels.lock().unwrap().insert(
            id,
            MockChannel {
                guild,
                name: name.to_string(),
                owner: None,
            },
        );
    }

    pub fn seed_admin(&self, user: UserId) {
        self.admins.lock().unwrap().push(user);
    }

    /// Makes every subsequent `create_private_channel` fail with
    /// `PermissionDenied`.
    pub fn fail_channel_creation(&self) {
        self.fail_channel_create.store(true, Ordering::SeqCst);
    }

    /// Makes `send_message` fail with `PermissionDenied` until called with
    /// `false` again.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_send.store(fail, Ordering::SeqCst);
    }

    /// The channels created by the gateway (seeded ones excluded).
    pub fn created_channels(&self) -> Vec<(ChannelId, MockChannel)> {
        self.channels
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, c)| c.owner.is_some())
            .map(|(id, c)| (*id, c.clone()))
            .collect()
    }

    pub fn channel_name(&self, id: ChannelId) -> Option<String> {
        self.channels.lock().unwrap().get(&id).map(|c| c.name.clone())
    }

    /// Plain messages sent to `channel`, in order.
    pub fn messages_in(&self, channel: ChannelId) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.channel == channel)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn notices_in(&self, channel: ChannelId) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, t)| t.clone())
            .collect()
    }

    pub fn was_deleted(&self, channel: ChannelId) -> bool {
        self.deleted_channels.lock().unwrap().contains(&channel)
    }
}

#[async_trait]
impl ChatPlatform for MockPlatform {
    async fn create_private_channel(
        &self,
        guild: GuildId,
        name: &str,
        owner: UserId,
    ) -> Result<ChannelId, GatewayError> {
        if self.fail_channel_create.load(Ordering::SeqCst) {
            return Err(GatewayError::PermissionDenied(
                "missing manage-channels".into(),
            ));
        }
        let id = ChannelId(self.next_channel.fetch_add(1, Ordering::SeqCst));
        self.channels.lock().unwrap().insert(
            id,
            MockChannel {
                guild,
                name: name.to_string(),
                owner: Some(owner),
            },
        );
        Ok(id)
    }

    async fn delete_channel(&self, channel: ChannelId) -> Result<(), GatewayError> {
        let removed = self.channels.lock().unwrap().remove(&channel);
        self.deleted_channels.lock().unwrap().push(channel);
        match removed {
            Some(_) => Ok(()),
            None => Err(GatewayError::NotFound(format!("channel {channel}"))),
        }
    }

    async fn channel_exists(&self, channel: ChannelId) -> bool {
        self.channels.lock().unwrap().contains_key(&channel)
    }

    async fn guild_channel_names(&self, guild: GuildId) -> Result<Vec<String>, GatewayError> {
        Ok(self
            .channels
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.guild == guild)
            .map(|c| c.name.clone())
            .collect())
    }

    async fn send_message(
        &self,
        channel: ChannelId,
        text: &str,
    ) -> Result<MessageId, GatewayError> {
        if !self.channels.lock().unwrap().contains_key(&channel) {
            return Err(GatewayError::NotFound(format!("channel {channel}")));
        }
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(GatewayError::PermissionDenied("missing send-messages".into()));
        }
        let id = MessageId(self.next_message.fetch_add(1, Ordering::SeqCst));
        self.messages.lock().unwrap().push(SentMessage {
            channel,
            message_id: id,
            text: text.to_string(),
        });
        Ok(id)
    }

    async fn send_embed(
        &self,
        channel: ChannelId,
        embed: &Embed,
    ) -> Result<MessageId, GatewayError> {
        if !self.channels.lock().unwrap().contains_key(&channel) {
            return Err(GatewayError::NotFound(format!("channel {channel}")));
        }
        let id = MessageId(self.next_message.fetch_add(1, Ordering::SeqCst));
        self.embeds.lock().unwrap().push((channel, embed.clone()));
        Ok(id)
    }

    async fn send_notice(
        &self,
        channel: ChannelId,
        text: &str,
        _delete_after: Duration,
    ) -> Result<(), GatewayError> {
        if !self.channels.lock().unwrap().contains_key(&channel) {
            return Err(GatewayError::NotFound(format!("channel {channel}")));
        }
        self.notices
            .lock()
            .unwrap()
            .push((channel, text.to_string()));
        Ok(())
    }

    async fn delete_message(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> Result<(), GatewayError> {
        self.deleted_messages.lock().unwrap().push((channel, message));
        Ok(())
    }

    async fn delete_message_after(&self, channel: ChannelId, message: MessageId, _delay: Duration) {
        self.deleted_messages.lock().unwrap().push((channel, message));
    }

    async fn member_is_admin(&self, _guild: GuildId, user: UserId) -> Result<bool, GatewayError> {
        Ok(self.admins.lock().unwrap().contains(&user))
    }
}
