//! Singleton rows: preferences and sync state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::StorageError;
use sqlx::Row;
use user::{MacroTargets, Preferences, PreferencesStore, SyncState, SyncStateStore, UserError};

use crate::SqliteStore;
use crate::time::{fmt_ts, parse_opt_ts};

#[async_trait]
impl PreferencesStore for SqliteStore {
    async fn get(&self) -> Result<Preferences, UserError> {
        let row = sqlx::query("SELECT * FROM preferences WHERE id = 1")
            .fetch_optional(self.pool())
            .await
            .map_err(StorageError::from)?;
        let Some(row) = row else {
            // The migration seeds the row; a missing row just means a
            // fresh database, so hand back the defaults.
            return Ok(Preferences::default());
        };

        let macro_targets: String = row.try_get("macro_targets").map_err(StorageError::from)?;
        let selected_slots: String = row.try_get("selected_slots").map_err(StorageError::from)?;
        let priority_order: String = row.try_get("priority_order").map_err(StorageError::from)?;

        let macro_targets: MacroTargets = serde_json::from_str(&macro_targets)
            .map_err(|err| StorageError::schema(format!("bad macro_targets json: {err}")))?;
        let selected_slots = serde_json::from_str(&selected_slots)
            .map_err(|err| StorageError::schema(format!("bad selected_slots json: {err}")))?;
        let priority_order = serde_json::from_str(&priority_order)
            .map_err(|err| StorageError::schema(format!("bad priority_order json: {err}")))?;

        Ok(Preferences {
            macro_targets,
            default_frequency: row
                .try_get::<i64, _>("default_frequency")
                .map_err(StorageError::from)?
                .max(1) as u32,
            num_days: row
                .try_get::<i64, _>("num_days")
                .map_err(StorageError::from)?
                .max(1) as u32,
            include_snacks: row.try_get("include_snacks").map_err(StorageError::from)?,
            combine_lunch_dinner: row
                .try_get("combine_lunch_dinner")
                .map_err(StorageError::from)?,
            prefer_similar_ingredients: row
                .try_get("prefer_similar_ingredients")
                .map_err(StorageError::from)?,
            selected_slots,
            priority_order,
        })
    }

    async fn save(&self, preferences: &Preferences) -> Result<(), UserError> {
        let macro_targets = serde_json::to_string(&preferences.macro_targets)
            .map_err(|err| StorageError::schema(err.to_string()))?;
        let selected_slots = serde_json::to_string(&preferences.selected_slots)
            .map_err(|err| StorageError::schema(err.to_string()))?;
        let priority_order = serde_json::to_string(&preferences.priority_order)
            .map_err(|err| StorageError::schema(err.to_string()))?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO preferences (
                id, macro_targets, default_frequency, num_days, include_snacks,
                combine_lunch_dinner, prefer_similar_ingredients, selected_slots, priority_order
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&macro_targets)
        .bind(preferences.default_frequency as i64)
        .bind(preferences.num_days as i64)
        .bind(preferences.include_snacks)
        .bind(preferences.combine_lunch_dinner)
        .bind(preferences.prefer_similar_ingredients)
        .bind(&selected_slots)
        .bind(&priority_order)
        .execute(self.pool())
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), UserError> {
        PreferencesStore::save(self, &Preferences::default()).await
    }
}

#[async_trait]
impl SyncStateStore for SqliteStore {
    async fn get(&self) -> Result<SyncState, UserError> {
        let row = sqlx::query("SELECT * FROM sync_state WHERE id = 1")
            .fetch_optional(self.pool())
            .await
            .map_err(StorageError::from)?;
        let Some(row) = row else {
            return Ok(SyncState::default());
        };
        let last_sync_at: Option<String> = row.try_get("last_sync_at").map_err(StorageError::from)?;
        Ok(SyncState {
            email: row.try_get("email").map_err(StorageError::from)?,
            server_token: row.try_get("server_token").map_err(StorageError::from)?,
            notion_token: row.try_get("notion_token").map_err(StorageError::from)?,
            notion_database_id: row
                .try_get("notion_database_id")
                .map_err(StorageError::from)?,
            last_sync_at: parse_opt_ts(last_sync_at.as_deref())?,
        })
    }

    async fn save(&self, state: &SyncState) -> Result<(), UserError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO sync_state (
                id, email, server_token, notion_token, notion_database_id, last_sync_at
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&state.email)
        .bind(&state.server_token)
        .bind(&state.notion_token)
        .bind(&state.notion_database_id)
        .bind(state.last_sync_at.map(fmt_ts))
        .execute(self.pool())
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }

    async fn set_last_sync(&self, at: DateTime<Utc>) -> Result<(), UserError> {
        sqlx::query("UPDATE sync_state SET last_sync_at = ?1 WHERE id = 1")
            .bind(fmt_ts(at))
            .execute(self.pool())
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), UserError> {
        SyncStateStore::save(self, &SyncState::default()).await
    }
}
