use thiserror::Error;

/// Errors surfaced by any backing store implementation.
///
/// Domain crates consume stores through traits and wrap this type in their
/// own error enums. `SchemaMismatch` aborts the operation that hit it;
/// callers never retry it.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted row could not be decoded into its entity shape.
    #[error("stored row is unreadable: {0}")]
    SchemaMismatch(String),
}

impl StorageError {
    pub fn schema(msg: impl Into<String>) -> Self {
        StorageError::SchemaMismatch(msg.into())
    }
}
