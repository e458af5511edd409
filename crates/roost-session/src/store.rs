// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session store.
//!
//! Conversations are held behind per-conversation `tokio::sync::Mutex`es;
//! holding the entry lock across the provider call is what serializes turns
//! within one conversation while letting other conversations proceed. The
//! outer maps are locked only for short, await-free sections.
//!
//! The reaper observes this store through [`snapshot`](SessionStore::snapshot)
//! and [`mark_warned`](SessionStore::mark_warned), both of which use
//! `try_lock` so the reaper never blocks behind an in-flight turn.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use roost_core::{ChannelId, ConversationId, UserId};
use roost_models::ModelId;

use crate::state::ConversationState;

/// Reaper-facing view of one conversation.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub conversation_id: ConversationId,
    pub last_active: DateTime<Utc>,
    pub warned_inactive: bool,
}

/// Process-local store of live conversations and router bookkeeping.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<ConversationId, Arc<Mutex<ConversationState>>>>,
    /// owner -> live temp channel, mirrored from the durable store.
    owners: Mutex<HashMap<UserId, ChannelId>>,
    /// One-shot `setmodel` preferences, consumed by the next kickoff.
    pending_models: Mutex<HashMap<UserId, ModelId>>,
    /// Owners with a kickoff in flight, claimed before channel allocation.
    kickoffs: Mutex<HashSet<UserId>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The conversation entry, if live.
    pub async fn get(&self, id: ConversationId) -> Option<Arc<Mutex<ConversationState>>> {
        self.sessions.lock().await.get(&id).cloned()
    }

    /// Returns the live entry for the state's conversation, installing
    /// `state` only when none exists. Racing creators converge on one
    /// entry; the loser's state is discarded before any turn ran on it.
    pub async fn get_or_insert(&self, state: ConversationState) -> Arc<Mutex<ConversationState>> {
        let id = state.conversation_id;
        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(&id) {
            debug!(conversation = %id, "conversation state already live");
            return Arc::clone(existing);
        }
        let entry = Arc::new(Mutex::new(state));
        sessions.insert(id, Arc::clone(&entry));
        debug!(conversation = %id, "conversation state installed");
        entry
    }

    /// Drops a conversation. Idempotent.
    pub async fn drop_conversation(&self, id: ConversationId) {
        if self.sessions.lock().await.remove(&id).is_some() {
            debug!(conversation = %id, "conversation state dropped");
        }
    }

    /// Activity snapshot of every live conversation. Entries whose turn is
    /// in flight are skipped; they are active by definition.
    pub async fn snapshot(&self) -> Vec<SessionSnapshot> {
        let entries: Vec<(ConversationId, Arc<Mutex<ConversationState>>)> = self
            .sessions
            .lock()
            .await
            .iter()
            .map(|(id, e)| (*id, Arc::clone(e)))
            .collect();

        let mut out = Vec::with_capacity(entries.len());
        for (id, entry) in entries {
            if let Ok(state) = entry.try_lock() {
                out.push(SessionSnapshot {
                    conversation_id: id,
                    last_active: state.last_active,
                    warned_inactive: state.warned_inactive,
                });
            }
        }
        out
    }

    /// Marks a conversation as warned about inactivity. Skipped without
    /// error when a turn is in flight.
    pub async fn mark_warned(&self, id: ConversationId) {
        let entry = self.get(id).await;
        if let Some(entry) = entry
            && let Ok(mut state) = entry.try_lock()
        {
            state.warned_inactive = true;
        }
    }

    // --- owner bookkeeping ---

    pub async fn set_owner(&self, owner: UserId, channel: ChannelId) {
        self.owners.lock().await.insert(owner, channel);
    }

    /// The owner's live temp channel, if tracked in memory.
    pub async fn owner_channel(&self, owner: UserId) -> Option<ChannelId> {
        self.owners.lock().await.get(&owner).copied()
    }

    /// Clears whatever owner mapping points at `channel`. Idempotent.
    pub async fn clear_owner_of(&self, channel: ChannelId) {
        self.owners.lock().await.retain(|_, c| *c != channel);
    }

    // --- kickoff bookkeeping ---

    /// Claims the owner's kickoff slot. Returns false when another kickoff
    /// by the same owner is already in flight.
    pub async fn begin_kickoff(&self, owner: UserId) -> bool {
        self.kickoffs.lock().await.insert(owner)
    }

    /// Releases the kickoff slot. Idempotent.
    pub async fn end_kickoff(&self, owner: UserId) {
        self.kickoffs.lock().await.remove(&owner);
    }

    // --- one-shot model preferences ---

    /// Stores (replacing) the author's one-shot model preference.
    pub async fn set_pending_model(&self, user: UserId, model: ModelId) {
        self.pending_models.lock().await.insert(user, model);
    }

    /// Consumes the author's one-shot preference, if any.
    pub async fn take_pending_model(&self, user: UserId) -> Option<ModelId> {
        self.pending_models.lock().await.remove(&user)
    }
}
