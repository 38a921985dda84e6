use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::UserError;
use crate::preferences::Preferences;
use crate::sync_state::SyncState;

/// Singleton preferences row. `get` always succeeds because the defaults
/// are seeded at migration time.
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    async fn get(&self) -> Result<Preferences, UserError>;
    async fn save(&self, preferences: &Preferences) -> Result<(), UserError>;
    /// Reset the singleton back to defaults.
    async fn clear(&self) -> Result<(), UserError>;
}

/// Singleton sync-state row.
#[async_trait]
pub trait SyncStateStore: Send + Sync {
    async fn get(&self) -> Result<SyncState, UserError>;
    async fn save(&self, state: &SyncState) -> Result<(), UserError>;
    async fn set_last_sync(&self, at: DateTime<Utc>) -> Result<(), UserError>;
    async fn clear(&self) -> Result<(), UserError>;
}
