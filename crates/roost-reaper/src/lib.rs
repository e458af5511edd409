// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The inactivity reaper.
//!
//! Sweeps on a fixed interval: warns conversations shortly before their
//! timeout, deletes temp channels past it, and drops idle DM state. The
//! sweep never blocks behind an in-flight turn; conversations whose lock is
//! held are active by definition and skipped.
//!
//! Also performs boot reconciliation, purging bindings whose channel was
//! deleted while the gateway was down.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use roost_core::{ChatPlatform, ConversationId, GatewayError};
use roost_models::ModelCatalog;
use roost_session::{SessionSnapshot, SessionStore};
use roost_storage::queries::temp_channels;
use roost_storage::{ConfigController, Database, TempChannel};

/// Longest lead time between the warning and the deletion.
const MAX_WARN_LEAD_SECS: f64 = 600.0;

/// Periodic inactivity sweeper over live sessions and durable bindings.
pub struct Reaper {
    platform: Arc<dyn ChatPlatform>,
    db: Database,
    config: Arc<ConfigController>,
    catalog: ModelCatalog,
    store: Arc<SessionStore>,
    sweep_interval: Duration,
    /// Channels warned while they had no live session state.
    warned: Mutex<HashSet<ConversationId>>,
}

impl Reaper {
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        db: Database,
        config: Arc<ConfigController>,
        catalog: ModelCatalog,
        store: Arc<SessionStore>,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            platform,
            db,
            config,
            catalog,
            store,
            sweep_interval,
            warned: Mutex::new(HashSet::new()),
        }
    }

    /// Sweeps until `shutdown` fires.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.sweep_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        info!(interval_secs = self.sweep_interval.as_secs(), "reaper started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("reaper stopped");
                    return;
                }
                _ = ticker.tick() => self.sweep().await,
            }
        }
    }

    /// Purges bindings whose platform channel no longer exists and rebuilds
    /// the in-memory owner map for those that do. Run once at boot.
    pub async fn reconcile(&self) -> Result<(), GatewayError> {
        let rows = temp_channels::list_all(&self.db, &self.catalog).await?;
        let mut kept = 0usize;
        let mut purged = 0usize;
        for row in rows {
            if self.platform.channel_exists(row.channel_id).await {
                self.store.set_owner(row.user_id, row.channel_id).await;
                kept += 1;
            } else {
                temp_channels::delete(&self.db, row.channel_id).await?;
                purged += 1;
            }
        }
        info!(kept, purged, "boot reconciliation complete");
        Ok(())
    }

    /// One sweep pass over every conversation the gateway knows about.
    pub async fn sweep(&self) {
        let hours = self.config.timeout_hours().await;
        if hours <= 0.0 {
            return;
        }
        let timeout_secs = hours * 3600.0;
        let warn_lead_secs = MAX_WARN_LEAD_SECS.min(timeout_secs / 10.0);
        let now = Utc::now();

        let mut live: HashMap<ConversationId, SessionSnapshot> = self
            .store
            .snapshot()
            .await
            .into_iter()
            .map(|s| (s.conversation_id, s))
            .collect();

        let rows = match temp_channels::list_all(&self.db, &self.catalog).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "sweep skipped, cannot list bindings");
                return;
            }
        };

        for row in rows {
            let conv = ConversationId::Channel(row.channel_id);
            let (last_active, warned) = match live.remove(&conv) {
                Some(snap) => (snap.last_active.max(row.last_active), snap.warned_inactive),
                None => {
                    // A live entry absent from the snapshot has a turn in
                    // flight; that conversation is active.
                    if self.store.get(conv).await.is_some() {
                        continue;
                    }
                    (row.last_active, self.warned.lock().await.contains(&conv))
                }
            };
            self.sweep_channel(&row, conv, last_active, warned, now, timeout_secs, warn_lead_secs)
                .await;
        }

        // What remains never matched a durable binding. Channel-keyed
        // leftovers are orphans and must not outlive their binding; DM
        // state is simply dropped once idle.
        for (conv, snap) in live {
            match conv {
                ConversationId::Channel(_) => {
                    info!(conversation = %conv, "binding gone, dropping orphaned state");
                    self.store.drop_conversation(conv).await;
                    self.warned.lock().await.remove(&conv);
                }
                ConversationId::Direct(_) => {
                    if idle_secs(now, snap.last_active) >= timeout_secs {
                        debug!(conversation = %conv, "dropping idle conversation state");
                        self.store.drop_conversation(conv).await;
                    }
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn sweep_channel(
        &self,
        row: &TempChannel,
        conv: ConversationId,
        last_active: DateTime<Utc>,
        warned: bool,
        now: DateTime<Utc>,
        timeout_secs: f64,
        warn_lead_secs: f64,
    ) {
        // A channel deleted behind our back is purged regardless of age.
        if !self.platform.channel_exists(row.channel_id).await {
            info!(channel = %row.channel_id, "bound channel vanished, purging");
            self.purge(conv).await;
            return;
        }

        let idle = idle_secs(now, last_active);
        if idle >= timeout_secs {
            match self.platform.delete_channel(row.channel_id).await {
                Ok(()) | Err(GatewayError::NotFound(_)) => {}
                Err(e) => {
                    warn!(error = %e, channel = %row.channel_id, "failed to delete idle channel");
                    return;
                }
            }
            info!(
                channel = %row.channel_id,
                owner = %row.user_id,
                idle_secs = idle as i64,
                "idle channel reaped"
            );
            self.purge(conv).await;
        } else if idle >= timeout_secs - warn_lead_secs {
            if warned {
                return;
            }
            let minutes = (((timeout_secs - idle) / 60.0).ceil() as i64).max(1);
            let text = format!(
                "This chat has been quiet for a while and will be deleted in about \
                 {minutes} minute(s). Send a message to keep it open."
            );
            // The warning is marked delivered even when sending fails, so a
            // broken channel cannot spam retries every sweep.
            if let Err(e) = self.platform.send_message(row.channel_id, &text).await {
                warn!(error = %e, channel = %row.channel_id, "failed to send inactivity warning");
            }
            self.store.mark_warned(conv).await;
            self.warned.lock().await.insert(conv);
        } else {
            // Fresh again; allow a future warning.
            self.warned.lock().await.remove(&conv);
        }
    }

    async fn purge(&self, conv: ConversationId) {
        self.store.drop_conversation(conv).await;
        self.warned.lock().await.remove(&conv);
        if let ConversationId::Channel(channel) = conv {
            self.store.clear_owner_of(channel).await;
            if let Err(e) = temp_channels::delete(&self.db, channel).await {
                warn!(error = %e, channel = %channel, "failed to delete channel binding");
            }
        }
    }
}

fn idle_secs(now: DateTime<Utc>, last_active: DateTime<Utc>) -> f64 {
    (now - last_active).num_milliseconds() as f64 / 1000.0
}
