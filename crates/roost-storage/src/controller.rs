// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime configuration controller.
//!
//! Holds the two admin-mutable settings (entry channel, inactivity timeout)
//! in memory and writes through to the `config` table with upsert semantics.
//! Values persisted by an earlier run win over the process configuration.

use roost_config::timeout_in_bounds;
use roost_core::{ChannelId, GatewayError};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::database::Database;
use crate::queries::config as kv;

const KEY_ENTRY_CHANNEL: &str = "entry_channel_id";
const KEY_TIMEOUT_HOURS: &str = "inactivity_timeout_hours";

#[derive(Debug, Clone, Copy)]
struct Settings {
    entry_channel: Option<ChannelId>,
    timeout_hours: f64,
}

/// Read/write access to the admin-mutable runtime settings.
pub struct ConfigController {
    db: Database,
    settings: RwLock<Settings>,
}

impl ConfigController {
    /// Loads persisted settings, falling back to the process configuration
    /// for keys never set by an admin.
    pub async fn load(
        db: Database,
        initial_entry_channel: Option<ChannelId>,
        initial_timeout_hours: f64,
    ) -> Result<Self, GatewayError> {
        let entry_channel = match kv::get(&db, KEY_ENTRY_CHANNEL).await? {
            Some(raw) => match raw.parse::<u64>() {
                Ok(id) => Some(ChannelId(id)),
                Err(_) => {
                    warn!(value = %raw, "corrupt entry_channel_id row, using process config");
                    initial_entry_channel
                }
            },
            None => initial_entry_channel,
        };

        let timeout_hours = match kv::get(&db, KEY_TIMEOUT_HOURS).await? {
            Some(raw) => match raw.parse::<f64>() {
                Ok(h) if timeout_in_bounds(h) => h,
                _ => {
                    warn!(value = %raw, "corrupt inactivity_timeout_hours row, using process config");
                    initial_timeout_hours
                }
            },
            None => initial_timeout_hours,
        };

        info!(
            entry_channel = ?entry_channel.map(|c| c.0),
            timeout_hours,
            "runtime settings loaded"
        );

        Ok(Self {
            db,
            settings: RwLock::new(Settings {
                entry_channel,
                timeout_hours,
            }),
        })
    }

    /// The configured entry channel, if any.
    pub async fn entry_channel(&self) -> Option<ChannelId> {
        self.settings.read().await.entry_channel
    }

    /// Persist a new entry channel.
    pub async fn set_entry_channel(&self, channel: ChannelId) -> Result<(), GatewayError> {
        kv::set(&self.db, KEY_ENTRY_CHANNEL, &channel.0.to_string()).await?;
        self.settings.write().await.entry_channel = Some(channel);
        info!(channel = %channel, "entry channel updated");
        Ok(())
    }

    /// The inactivity timeout in hours; 0 means the reaper is disabled.
    pub async fn timeout_hours(&self) -> f64 {
        self.settings.read().await.timeout_hours
    }

    /// Persist a new inactivity timeout. Bounds: 0 (disabled) or [0.1, 720].
    pub async fn set_timeout_hours(&self, hours: f64) -> Result<(), GatewayError> {
        if !timeout_in_bounds(hours) {
            return Err(GatewayError::BadRequest(format!(
                "timeout must be 0 or between 0.1 and 720 hours, got {hours}"
            )));
        }
        kv::set(&self.db, KEY_TIMEOUT_HOURS, &hours.to_string()).await?;
        self.settings.write().await.timeout_hours = hours;
        info!(hours, "inactivity timeout updated");
        Ok(())
    }
}
