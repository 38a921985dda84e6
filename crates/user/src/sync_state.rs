use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account and remote-credential state. A singleton row; all fields are
/// optional until the user signs in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    pub email: Option<String>,
    pub server_token: Option<String>,
    pub notion_token: Option<String>,
    pub notion_database_id: Option<String>,
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl SyncState {
    pub fn is_logged_in(&self) -> bool {
        self.server_token.is_some()
    }
}
