pub mod error;
pub mod reconciler;
pub mod remote;

pub use error::{RemoteError, SyncError};
pub use reconciler::{KeepSide, SyncConflict, SyncOutcome, is_server_id, resolve_conflict, sync_recipes};
pub use remote::RecipeRemote;
