use shared::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
