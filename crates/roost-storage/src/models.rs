// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for storage entities.

use chrono::{DateTime, Utc};

use roost_core::{ChannelId, UserId};
use roost_models::ModelId;

/// One temp-channel binding, as read back from the store.
///
/// `model` is always a valid [`ModelId`]: corrupt or drifted `model_name`
/// values are coerced on read against the deployment catalog.
#[derive(Debug, Clone)]
pub struct TempChannel {
    pub channel_id: ChannelId,
    pub user_id: UserId,
    pub last_active: DateTime<Utc>,
    pub model: ModelId,
}
