// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user preferred-model rows.
//!
//! Consulted once per kickoff; never rebinds an existing channel.

use roost_core::{GatewayError, UserId};
use roost_models::{ModelCatalog, ModelId};
use rusqlite::params;
use tracing::warn;

use crate::database::Database;

/// The user's preferred model, coerced against the catalog. `None` when no
/// preference is stored.
pub async fn get(
    db: &Database,
    catalog: &ModelCatalog,
    user: UserId,
) -> Result<Option<ModelId>, GatewayError> {
    let user_id = user.0 as i64;
    let raw = db
        .connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT model_name FROM preferences WHERE user_id = ?1")?;
            let result = stmt.query_row(params![user_id], |row| row.get::<_, String>(0));
            match result {
                Ok(name) => Ok(Some(name)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(raw.map(|name| {
        let (model, corrected) = catalog.coerce(&name);
        if corrected {
            warn!(user = %user, stored = %name, coerced = %model, "coerced stored preference");
        }
        model
    }))
}

/// Upsert the user's preferred model.
pub async fn set(db: &Database, user: UserId, model: &ModelId) -> Result<(), GatewayError> {
    let user_id = user.0 as i64;
    let model_name = model.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO preferences (user_id, model_name) VALUES (?1, ?2)
                 ON CONFLICT (user_id) DO UPDATE SET model_name = excluded.model_name",
                params![user_id, model_name],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn catalog() -> ModelCatalog {
        ModelCatalog::new("gemini:gemini-1.5-flash-latest", "deepseek/deepseek-chat").unwrap()
    }

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn missing_preference_is_none() {
        let (db, _dir) = setup_db().await;
        assert!(get(&db, &catalog(), UserId(7)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get_round_trips_and_upserts() {
        let (db, _dir) = setup_db().await;
        let c = catalog();
        let pro = ModelId::parse("gemini:gemini-1.5-pro-latest").unwrap();
        set(&db, UserId(7), &pro).await.unwrap();
        assert_eq!(get(&db, &c, UserId(7)).await.unwrap(), Some(pro));

        let or = c.openrouter_model();
        set(&db, UserId(7), &or).await.unwrap();
        assert_eq!(get(&db, &c, UserId(7)).await.unwrap(), Some(or));
    }
}
