use recipe::RecipeError;
use shared::StorageError;
use thiserror::Error;
use user::UserError;

/// Failure talking to the remote recipe service.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("remote rejected the credentials")]
    Unauthorized,

    #[error("transient remote failure: {0}")]
    Transient(String),
}

#[derive(Error, Debug)]
pub enum SyncError {
    /// Sync was invoked without server credentials. Nothing was touched.
    #[error("not logged in")]
    NotLoggedIn,

    #[error("recipe store failed: {0}")]
    Recipes(#[from] RecipeError),

    #[error("settings store failed: {0}")]
    Settings(#[from] UserError),

    #[error("remote failed: {0}")]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
