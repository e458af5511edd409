// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRUD operations on the `temp_channels` table.
//!
//! Reads coerce `model_name` against the deployment catalog so callers never
//! see an invalid model id; a corrected value is logged and written back.

use chrono::{DateTime, Utc};
use roost_core::{ChannelId, GatewayError, UserId};
use roost_models::ModelCatalog;
use rusqlite::params;
use tracing::warn;

use crate::database::Database;
use crate::models::TempChannel;

/// Raw row as stored, before model coercion.
struct RawRow {
    channel_id: i64,
    user_id: i64,
    last_active: String,
    model_name: String,
}

fn read_raw(row: &rusqlite::Row<'_>) -> Result<RawRow, rusqlite::Error> {
    Ok(RawRow {
        channel_id: row.get(0)?,
        user_id: row.get(1)?,
        last_active: row.get(2)?,
        model_name: row.get(3)?,
    })
}

fn from_raw(raw: RawRow, catalog: &ModelCatalog) -> TempChannel {
    let (model, corrected) = catalog.coerce(&raw.model_name);
    if corrected {
        warn!(
            channel_id = raw.channel_id,
            stored = %raw.model_name,
            coerced = %model,
            "coerced stored model id"
        );
    }
    // Unparseable timestamps count as fresh rather than instantly reapable.
    let last_active = DateTime::parse_from_rfc3339(&raw.last_active)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            warn!(channel_id = raw.channel_id, "corrupt last_active timestamp");
            Utc::now()
        });
    TempChannel {
        channel_id: ChannelId(raw.channel_id as u64),
        user_id: UserId(raw.user_id as u64),
        last_active,
        model,
    }
}

/// Insert or replace a temp-channel binding.
pub async fn upsert(db: &Database, row: &TempChannel) -> Result<(), GatewayError> {
    let channel_id = row.channel_id.0 as i64;
    let user_id = row.user_id.0 as i64;
    let last_active = row.last_active.to_rfc3339();
    let model_name = row.model.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO temp_channels (channel_id, user_id, last_active, model_name)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (channel_id) DO UPDATE SET
                   user_id = excluded.user_id,
                   last_active = excluded.last_active,
                   model_name = excluded.model_name",
                params![channel_id, user_id, last_active, model_name],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a binding by channel id.
pub async fn get(
    db: &Database,
    catalog: &ModelCatalog,
    channel: ChannelId,
) -> Result<Option<TempChannel>, GatewayError> {
    let channel_id = channel.0 as i64;
    let raw = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT channel_id, user_id, last_active, model_name
                 FROM temp_channels WHERE channel_id = ?1",
            )?;
            let result = stmt.query_row(params![channel_id], read_raw);
            match result {
                Ok(raw) => Ok(Some(raw)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(raw.map(|r| from_raw(r, catalog)))
}

/// Fetch a binding by owner. At most one exists per owner (router invariant).
pub async fn get_by_owner(
    db: &Database,
    catalog: &ModelCatalog,
    owner: UserId,
) -> Result<Option<TempChannel>, GatewayError> {
    let user_id = owner.0 as i64;
    let raw = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT channel_id, user_id, last_active, model_name
                 FROM temp_channels WHERE user_id = ?1 LIMIT 1",
            )?;
            let result = stmt.query_row(params![user_id], read_raw);
            match result {
                Ok(raw) => Ok(Some(raw)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(raw.map(|r| from_raw(r, catalog)))
}

/// Update only the activity timestamp of an existing binding.
pub async fn touch(
    db: &Database,
    channel: ChannelId,
    at: DateTime<Utc>,
) -> Result<(), GatewayError> {
    let channel_id = channel.0 as i64;
    let last_active = at.to_rfc3339();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE temp_channels SET last_active = ?1 WHERE channel_id = ?2",
                params![last_active, channel_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a binding. Missing rows are a no-op (idempotent cleanup).
pub async fn delete(db: &Database, channel: ChannelId) -> Result<(), GatewayError> {
    let channel_id = channel.0 as i64;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM temp_channels WHERE channel_id = ?1",
                params![channel_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All bindings, for the reaper's boot reconciliation.
pub async fn list_all(
    db: &Database,
    catalog: &ModelCatalog,
) -> Result<Vec<TempChannel>, GatewayError> {
    let raws = db
        .connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT channel_id, user_id, last_active, model_name
                 FROM temp_channels ORDER BY channel_id",
            )?;
            let rows = stmt.query_map([], read_raw)?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(raws.into_iter().map(|r| from_raw(r, catalog)).collect())
}
