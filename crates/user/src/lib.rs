pub mod error;
pub mod preferences;
pub mod store;
pub mod sync_state;

pub use error::UserError;
pub use preferences::{MacroTarget, MacroTargets, Preferences};
pub use store::{PreferencesStore, SyncStateStore};
pub use sync_state::SyncState;
