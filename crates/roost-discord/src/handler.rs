// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway event handler.
//!
//! Flattens serenity events into the router's [`Inbound`] shape and keeps
//! durable state honest when channels disappear out from under us.

use std::sync::Arc;

use serenity::all::{Context, EventHandler, GatewayIntents, GuildChannel, Message, Ready};
use serenity::async_trait;
use tracing::{error, info};

use roost_core::{ChannelId, GuildId, Inbound, MessageId, UserId};
use roost_reaper::Reaper;
use roost_router::Router;

/// The gateway intents the handler needs.
pub fn gateway_intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Feeds gateway events to the router and reaper.
pub struct Handler {
    router: Arc<Router>,
    reaper: Arc<Reaper>,
}

impl Handler {
    pub fn new(router: Arc<Router>, reaper: Arc<Reaper>) -> Self {
        Self { router, reaper }
    }
}

fn to_inbound(msg: &Message) -> Inbound {
    let author_name = msg
        .author
        .global_name
        .clone()
        .unwrap_or_else(|| msg.author.name.clone());
    Inbound {
        message_id: MessageId(msg.id.get()),
        channel_id: ChannelId(msg.channel_id.get()),
        guild_id: msg.guild_id.map(|g| GuildId(g.get())),
        author_id: UserId(msg.author.id.get()),
        author_is_bot: msg.author.bot,
        author_name,
        content: msg.content.clone(),
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "connected to discord"
        );
        if let Err(e) = self.reaper.reconcile().await {
            error!(error = %e, "boot reconciliation failed");
        }
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        self.router.handle_message(to_inbound(&msg)).await;
    }

    async fn channel_delete(
        &self,
        _ctx: Context,
        channel: GuildChannel,
        _messages: Option<Vec<Message>>,
    ) {
        info!(channel = %channel.id, "channel deleted on the platform");
        self.router
            .handle_channel_removed(ChannelId(channel.id.get()))
            .await;
    }
}
