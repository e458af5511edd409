// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value operations on the `config` table.

use roost_core::GatewayError;
use rusqlite::params;

use crate::database::Database;

/// Read a config value.
pub async fn get(db: &Database, key: &str) -> Result<Option<String>, GatewayError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
            let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Upsert a config value.
pub async fn set(db: &Database, key: &str, value: &str) -> Result<(), GatewayError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO config (key, value) VALUES (?1, ?2)
                 ON CONFLICT (key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a config key. Missing keys are a no-op.
pub async fn unset(db: &Database, key: &str) -> Result<(), GatewayError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM config WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get(&db, "nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let (db, _dir) = setup_db().await;
        set(&db, "entry_channel_id", "100").await.unwrap();
        assert_eq!(get(&db, "entry_channel_id").await.unwrap().as_deref(), Some("100"));
    }

    #[tokio::test]
    async fn set_upserts_existing_key() {
        let (db, _dir) = setup_db().await;
        set(&db, "inactivity_timeout_hours", "6").await.unwrap();
        set(&db, "inactivity_timeout_hours", "1.5").await.unwrap();
        assert_eq!(
            get(&db, "inactivity_timeout_hours").await.unwrap().as_deref(),
            Some("1.5")
        );
    }

    #[tokio::test]
    async fn unset_removes_key() {
        let (db, _dir) = setup_db().await;
        set(&db, "k", "v").await.unwrap();
        unset(&db, "k").await.unwrap();
        assert!(get(&db, "k").await.unwrap().is_none());
        // Idempotent.
        unset(&db, "k").await.unwrap();
    }
}
