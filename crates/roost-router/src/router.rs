// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The message router.
//!
//! Owns the full lifecycle of a conversation: kickoff in the entry channel,
//! lazy provider-state creation, serialized turn relay, command dispatch,
//! and teardown. All persistence failures during routine bookkeeping are
//! logged and absorbed; in-memory state keeps the session usable until the
//! next successful write.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use roost_core::{
    ChannelId, ChatPlatform, ConversationId, Embed, FinishReason, GatewayError, GuildId, Inbound,
    UserId,
};
use roost_models::{ModelCatalog, ModelId};
use roost_session::{ConversationState, SessionStore};
use roost_storage::queries::{preferences, temp_channels};
use roost_storage::{ConfigController, Database, TempChannel};

use crate::allocator;
use crate::chunk;
use crate::classify::{self, MessageClass};
use crate::commands::{self, Command};
use crate::providers::Providers;

/// How long transient notices stay before the platform deletes them.
const NOTICE_TTL: Duration = Duration::from_secs(20);

/// Delay before a rejected kickoff trigger is cleaned out of the entry
/// channel, so its author sees what happened.
const TRIGGER_CLEANUP_DELAY: Duration = Duration::from_secs(10);

const TRUNCATION_NOTE: &str = "The reply was cut off at the provider's length limit.";
const UNUSABLE_REPLY_NOTICE: &str = "The provider returned an unusable reply. Please try again.";
const FILTERED_NOTICE: &str = "The message or reply was blocked by safety filters.";

/// Routes inbound messages to commands, kickoffs, and provider turns.
pub struct Router {
    platform: Arc<dyn ChatPlatform>,
    db: Database,
    config: Arc<ConfigController>,
    catalog: ModelCatalog,
    providers: Providers,
    store: Arc<SessionStore>,
}

impl Router {
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        db: Database,
        config: Arc<ConfigController>,
        catalog: ModelCatalog,
        providers: Providers,
        store: Arc<SessionStore>,
    ) -> Self {
        Self {
            platform,
            db,
            config,
            catalog,
            providers,
            store,
        }
    }

    /// Entry point for every platform message. Never returns an error;
    /// failures end as log lines and at most one notice.
    pub async fn handle_message(&self, msg: Inbound) {
        if msg.author_is_bot {
            return;
        }
        let entry = self.config.entry_channel().await;
        let binding = self.guild_binding(&msg, entry).await;

        match classify::classify(&msg, entry, binding.is_some()) {
            MessageClass::Ignore => {}
            MessageClass::Command(cmd) => self.handle_command(&msg, cmd).await,
            MessageClass::Kickoff => self.handle_kickoff(&msg).await,
            MessageClass::ChannelTurn => {
                if let Some(row) = binding {
                    self.run_turn(
                        ConversationId::Channel(row.channel_id),
                        row.channel_id,
                        Some(row.model),
                        &msg.content,
                    )
                    .await;
                }
            }
            MessageClass::DirectTurn => self.handle_direct_turn(&msg).await,
        }
    }

    /// Drops every trace of a channel's conversation. Called on `endchat`,
    /// on platform channel deletion, and when a channel vanishes mid-turn.
    pub async fn handle_channel_removed(&self, channel: ChannelId) {
        self.purge_conversation(ConversationId::Channel(channel))
            .await;
    }

    /// The temp-channel binding for this message's channel, when one could
    /// apply. Lookup errors degrade to "not bound".
    async fn guild_binding(
        &self,
        msg: &Inbound,
        entry: Option<ChannelId>,
    ) -> Option<TempChannel> {
        if msg.is_dm() || entry == Some(msg.channel_id) {
            return None;
        }
        match temp_channels::get(&self.db, &self.catalog, msg.channel_id).await {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, channel = %msg.channel_id, "binding lookup failed");
                None
            }
        }
    }

    // --- kickoff ---

    async fn handle_kickoff(&self, msg: &Inbound) {
        let Some(guild) = msg.guild_id else { return };
        let entry = msg.channel_id;

        if msg.content.trim().is_empty() {
            if let Err(e) = self.platform.delete_message(entry, msg.message_id).await {
                debug!(error = %e, "failed to delete empty kickoff trigger");
            }
            return;
        }

        // Claim the owner's kickoff slot before anything is awaited on the
        // platform, so a double-posted trigger cannot allocate two channels.
        if !self.store.begin_kickoff(msg.author_id).await {
            self.notify(
                entry,
                &format!("<@{}> your chat is already being set up.", msg.author_id),
            )
            .await;
            self.platform
                .delete_message_after(entry, msg.message_id, TRIGGER_CLEANUP_DELAY)
                .await;
            return;
        }

        if let Some(open) = self.open_channel_of(msg.author_id).await {
            self.store.end_kickoff(msg.author_id).await;
            self.notify(
                entry,
                &format!(
                    "<@{}> you already have an open chat in <#{open}>.",
                    msg.author_id
                ),
            )
            .await;
            self.platform
                .delete_message_after(entry, msg.message_id, TRIGGER_CLEANUP_DELAY)
                .await;
            return;
        }

        let model = self.resolve_model_for(msg.author_id).await;
        let channel = match allocator::allocate(
            self.platform.as_ref(),
            guild,
            msg.author_id,
            &msg.author_name,
        )
        .await
        {
            Ok(c) => c,
            Err(e) => {
                self.store.end_kickoff(msg.author_id).await;
                warn!(error = %e, owner = %msg.author_id, "temp channel creation failed");
                if let Some(notice) = e.user_notice() {
                    self.notify(entry, &format!("<@{}> {notice}", msg.author_id))
                        .await;
                }
                self.platform
                    .delete_message_after(entry, msg.message_id, TRIGGER_CLEANUP_DELAY)
                    .await;
                return;
            }
        };

        info!(channel = %channel, owner = %msg.author_id, model = %model, "temp channel created");
        let row = TempChannel {
            channel_id: channel,
            user_id: msg.author_id,
            last_active: Utc::now(),
            model: model.clone(),
        };
        if let Err(e) = temp_channels::upsert(&self.db, &row).await {
            warn!(error = %e, channel = %channel, "failed to persist channel binding");
        }
        // The owner map takes over the duplicate guard before the slot is
        // released.
        self.store.set_owner(msg.author_id, channel).await;
        self.store.end_kickoff(msg.author_id).await;

        if let Err(e) = self.platform.send_embed(channel, &welcome_embed(&model)).await {
            warn!(error = %e, channel = %channel, "failed to send welcome embed");
        }
        self.notify(
            entry,
            &format!("<@{}> your chat is ready: <#{channel}>", msg.author_id),
        )
        .await;
        if let Err(e) = self.platform.delete_message(entry, msg.message_id).await {
            debug!(error = %e, "failed to delete kickoff trigger");
        }

        // The trigger text is the first turn.
        self.run_turn(
            ConversationId::Channel(channel),
            channel,
            Some(model),
            &msg.content,
        )
        .await;
    }

    /// The author's currently open temp channel, if any. Memory first,
    /// then the durable store (covers restarts).
    async fn open_channel_of(&self, owner: UserId) -> Option<ChannelId> {
        if let Some(channel) = self.store.owner_channel(owner).await {
            return Some(channel);
        }
        match temp_channels::get_by_owner(&self.db, &self.catalog, owner).await {
            Ok(row) => row.map(|r| r.channel_id),
            Err(e) => {
                warn!(error = %e, owner = %owner, "owner lookup failed");
                None
            }
        }
    }

    /// Model for a new conversation: the one-shot `setmodel` choice, then
    /// the stored preference, then the deployment default.
    async fn resolve_model_for(&self, user: UserId) -> ModelId {
        if let Some(model) = self.store.take_pending_model(user).await {
            return self.catalog.canonicalize(model);
        }
        match preferences::get(&self.db, &self.catalog, user).await {
            Ok(Some(model)) => model,
            Ok(None) => self.catalog.default_model(),
            Err(e) => {
                warn!(error = %e, user = %user, "preference lookup failed");
                self.catalog.default_model()
            }
        }
    }

    // --- turns ---

    async fn handle_direct_turn(&self, msg: &Inbound) {
        self.run_turn(
            ConversationId::Direct(msg.author_id),
            msg.channel_id,
            None,
            &msg.content,
        )
        .await;
    }

    /// Relays one prompt. `bound_model` pins the model should state need
    /// creating; `None` resolves the author's preference at creation time,
    /// for direct conversations whose binding is not durable.
    async fn run_turn(
        &self,
        conv: ConversationId,
        reply_channel: ChannelId,
        bound_model: Option<ModelId>,
        prompt: &str,
    ) {
        let entry = match self.store.get(conv).await {
            Some(e) => e,
            None => {
                let model = match (bound_model, conv) {
                    (Some(model), _) => model,
                    (None, ConversationId::Direct(user)) => self.resolve_model_for(user).await,
                    (None, ConversationId::Channel(_)) => self.catalog.default_model(),
                };
                let provider = match self.providers.start(&model) {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(error = %e, conversation = %conv, "cannot start provider session");
                        if let Some(notice) = e.user_notice() {
                            self.notify(reply_channel, notice).await;
                        }
                        return;
                    }
                };
                debug!(conversation = %conv, model = %model, "conversation state created");
                // Installed under the store lock; a racing turn that got
                // there first wins and this state is discarded unused.
                self.store
                    .get_or_insert(ConversationState::new(conv, model, provider))
                    .await
            }
        };

        // Holding the entry lock across the provider call serializes turns
        // within this conversation.
        let mut state = entry.lock().await;
        match state.provider.send(prompt).await {
            Ok(turn) => match (turn.text, turn.finish) {
                (Some(text), finish @ (FinishReason::Normal | FinishReason::Length)) => {
                    if !self.deliver_reply(conv, reply_channel, &text).await {
                        return;
                    }
                    if finish == FinishReason::Length {
                        self.notify(reply_channel, TRUNCATION_NOTE).await;
                    }
                    let now = Utc::now();
                    state.touch(now);
                    if let ConversationId::Channel(channel) = conv
                        && let Err(e) = temp_channels::touch(&self.db, channel, now).await
                    {
                        warn!(error = %e, channel = %channel, "failed to persist activity");
                    }
                }
                (_, finish) => {
                    debug!(conversation = %conv, finish = %finish, "reply withheld");
                    let notice = match finish {
                        FinishReason::Safety | FinishReason::Recitation => FILTERED_NOTICE,
                        _ => UNUSABLE_REPLY_NOTICE,
                    };
                    self.notify(reply_channel, notice).await;
                }
            },
            Err(GatewayError::NotFound(what)) => {
                info!(conversation = %conv, what = %what, "object vanished mid-turn, purging");
                drop(state);
                self.purge_conversation(conv).await;
            }
            Err(e) => {
                warn!(error = %e, conversation = %conv, "turn failed");
                if let Some(notice) = e.user_notice() {
                    self.notify(reply_channel, notice).await;
                }
            }
        }
    }

    /// Sends a reply in platform-sized fragments. Returns `false` when the
    /// channel vanished and the conversation was purged.
    async fn deliver_reply(&self, conv: ConversationId, channel: ChannelId, text: &str) -> bool {
        for fragment in chunk::split_message(text) {
            match self.platform.send_message(channel, &fragment).await {
                Ok(_) => {}
                Err(GatewayError::NotFound(_)) => {
                    info!(conversation = %conv, "reply channel vanished, purging");
                    self.purge_conversation(conv).await;
                    return false;
                }
                Err(e) => {
                    warn!(error = %e, channel = %channel, "failed to deliver reply fragment");
                    return true;
                }
            }
        }
        true
    }

    // --- commands ---

    async fn handle_command(&self, msg: &Inbound, cmd: Command) {
        debug!(author = %msg.author_id, command = ?cmd, "command received");
        let result = match cmd {
            Command::Help => self.cmd_help(msg).await,
            Command::ListModels => self.cmd_list_models(msg).await,
            Command::SetModel { id } => self.cmd_set_model(msg, id).await,
            Command::EndChat => self.cmd_end_chat(msg).await,
            Command::ResetChat => self.cmd_reset_chat(msg).await,
            Command::SetEntryChannel { arg } => self.cmd_set_entry_channel(msg, arg).await,
            Command::SetTimeout { arg } => self.cmd_set_timeout(msg, arg).await,
        };
        if let Err(e) = result {
            warn!(error = %e, author = %msg.author_id, "command failed");
            if let Some(notice) = e.user_notice() {
                self.notify(msg.channel_id, notice).await;
            }
        }
    }

    async fn cmd_help(&self, msg: &Inbound) -> Result<(), GatewayError> {
        let text = "Commands:\n\
            `!endchat` - end your chat and delete the channel\n\
            `!resetchat` - clear the conversation history\n\
            `!setmodel <id>` - pick the model for your next chat\n\
            `!listmodels` - show available models\n\
            `!setentrychannel [#channel]` - admin: move the entry channel\n\
            `!settimeout <hours>` - admin: set the inactivity timeout (0 disables)";
        self.platform.send_message(msg.channel_id, text).await?;
        Ok(())
    }

    async fn cmd_list_models(&self, msg: &Inbound) -> Result<(), GatewayError> {
        let mut text = String::from("Available models:\n");
        for id in self.catalog.listed_ids() {
            text.push_str(&format!("- `{id}`\n"));
        }
        self.platform.send_message(msg.channel_id, &text).await?;
        Ok(())
    }

    async fn cmd_set_model(&self, msg: &Inbound, id: Option<String>) -> Result<(), GatewayError> {
        let Some(raw) = id else {
            self.notify(
                msg.channel_id,
                "Usage: `!setmodel <provider:model>`. See `!listmodels`.",
            )
            .await;
            return Ok(());
        };
        let Ok(model) = ModelId::parse(&raw) else {
            self.notify(
                msg.channel_id,
                "That is not a valid model id. See `!listmodels`.",
            )
            .await;
            return Ok(());
        };
        if !self.catalog.is_supported(&model) {
            // Explicit choices are rejected outright; silent coercion is
            // only for data already in the store.
            self.notify(
                msg.channel_id,
                &format!(
                    "That model is not available. The only openrouter model here is `{}`.",
                    self.catalog.openrouter_model()
                ),
            )
            .await;
            return Ok(());
        }
        if !self.providers.is_available(&model) {
            // Catch the dead-on-arrival choice here instead of at kickoff.
            self.notify(
                msg.channel_id,
                &format!("`{model}` is not usable here: its provider has no API key configured."),
            )
            .await;
            return Ok(());
        }

        self.store.set_pending_model(msg.author_id, model.clone()).await;
        if let Err(e) = preferences::set(&self.db, msg.author_id, &model).await {
            warn!(error = %e, user = %msg.author_id, "failed to persist preference");
        }

        if msg.is_dm() {
            // A DM has no kickoff, so the rebind takes effect immediately.
            self.store
                .drop_conversation(ConversationId::Direct(msg.author_id))
                .await;
            self.notify(
                msg.channel_id,
                &format!("Model set to `{model}`. Your next message starts a fresh conversation."),
            )
            .await;
        } else {
            self.notify(
                msg.channel_id,
                &format!("Model for your next chat: `{model}`. It applies when you start a new chat."),
            )
            .await;
        }
        Ok(())
    }

    async fn cmd_end_chat(&self, msg: &Inbound) -> Result<(), GatewayError> {
        if msg.is_dm() {
            self.store
                .drop_conversation(ConversationId::Direct(msg.author_id))
                .await;
            self.notify(
                msg.channel_id,
                "Conversation ended. Your next message starts a fresh one.",
            )
            .await;
            return Ok(());
        }

        let row = temp_channels::get(&self.db, &self.catalog, msg.channel_id).await?;
        let Some(row) = row else {
            self.notify(msg.channel_id, "This command only works inside a chat channel.")
                .await;
            return Ok(());
        };
        if row.user_id != msg.author_id {
            self.notify(msg.channel_id, "Only the chat owner can end this chat.")
                .await;
            return Ok(());
        }

        match self.platform.delete_channel(row.channel_id).await {
            Ok(()) | Err(GatewayError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }
        self.purge_conversation(ConversationId::Channel(row.channel_id))
            .await;
        info!(channel = %row.channel_id, owner = %row.user_id, "chat ended by owner");
        Ok(())
    }

    async fn cmd_reset_chat(&self, msg: &Inbound) -> Result<(), GatewayError> {
        let conv = if msg.is_dm() {
            ConversationId::Direct(msg.author_id)
        } else {
            let row = temp_channels::get(&self.db, &self.catalog, msg.channel_id).await?;
            if row.is_none() {
                self.notify(msg.channel_id, "This command only works inside a chat channel.")
                    .await;
                return Ok(());
            }
            ConversationId::Channel(msg.channel_id)
        };
        self.store.drop_conversation(conv).await;
        self.notify(
            msg.channel_id,
            "Conversation history cleared. The model stays the same.",
        )
        .await;
        Ok(())
    }

    async fn cmd_set_entry_channel(
        &self,
        msg: &Inbound,
        arg: Option<String>,
    ) -> Result<(), GatewayError> {
        let Some(guild) = msg.guild_id else {
            self.notify(msg.channel_id, "This command only works in a server.")
                .await;
            return Ok(());
        };
        if !self.require_admin(guild, msg).await? {
            return Ok(());
        }

        let channel = match arg {
            None => msg.channel_id,
            Some(raw) => match commands::parse_channel_arg(&raw) {
                Some(c) => c,
                None => {
                    self.notify(msg.channel_id, "Usage: `!setentrychannel [#channel]`.")
                        .await;
                    return Ok(());
                }
            },
        };
        self.config.set_entry_channel(channel).await?;
        self.notify(msg.channel_id, &format!("Entry channel is now <#{channel}>."))
            .await;
        Ok(())
    }

    async fn cmd_set_timeout(
        &self,
        msg: &Inbound,
        arg: Option<String>,
    ) -> Result<(), GatewayError> {
        let Some(guild) = msg.guild_id else {
            self.notify(msg.channel_id, "This command only works in a server.")
                .await;
            return Ok(());
        };
        if !self.require_admin(guild, msg).await? {
            return Ok(());
        }

        let Some(hours) = arg.and_then(|raw| raw.parse::<f64>().ok()) else {
            self.notify(
                msg.channel_id,
                "Usage: `!settimeout <hours>`. Use 0 to disable the timeout.",
            )
            .await;
            return Ok(());
        };
        match self.config.set_timeout_hours(hours).await {
            Ok(()) => {
                let text = if hours == 0.0 {
                    "Inactivity timeout disabled.".to_string()
                } else {
                    format!("Inactivity timeout set to {hours} hours.")
                };
                self.notify(msg.channel_id, &text).await;
                Ok(())
            }
            Err(GatewayError::BadRequest(_)) => {
                self.notify(
                    msg.channel_id,
                    "The timeout must be 0 (disabled) or between 0.1 and 720 hours.",
                )
                .await;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Checks the manage-guild permission, telling the author off when it
    /// is missing. Returns whether the command may proceed.
    async fn require_admin(&self, guild: GuildId, msg: &Inbound) -> Result<bool, GatewayError> {
        if self.platform.member_is_admin(guild, msg.author_id).await? {
            return Ok(true);
        }
        self.notify(
            msg.channel_id,
            "You need the Manage Server permission to do that.",
        )
        .await;
        Ok(false)
    }

    // --- teardown ---

    async fn purge_conversation(&self, conv: ConversationId) {
        self.store.drop_conversation(conv).await;
        if let ConversationId::Channel(channel) = conv {
            self.store.clear_owner_of(channel).await;
            if let Err(e) = temp_channels::delete(&self.db, channel).await {
                warn!(error = %e, channel = %channel, "failed to delete channel binding");
            }
        }
    }

    async fn notify(&self, channel: ChannelId, text: &str) {
        if let Err(e) = self.platform.send_notice(channel, text, NOTICE_TTL).await {
            debug!(error = %e, channel = %channel, "failed to send notice");
        }
    }
}

fn welcome_embed(model: &ModelId) -> Embed {
    Embed {
        title: "Your private chat is ready".into(),
        description: format!(
            "You are talking to `{model}`. Everything you type here goes to the model."
        ),
        fields: vec![
            ("!resetchat".into(), "Clear the conversation history.".into()),
            ("!endchat".into(), "End the chat and delete this channel.".into()),
            ("!setmodel <id>".into(), "Pick the model for your next chat.".into()),
            ("!listmodels".into(), "Show the available models.".into()),
        ],
    }
}
