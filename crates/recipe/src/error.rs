use shared::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("recipe not found: {0}")]
    NotFound(String),

    #[error("unknown recipe category: {0}")]
    InvalidCategory(String),

    #[error("unknown recipe source: {0}")]
    InvalidSource(String),

    #[error("unknown meal slot: {0}")]
    InvalidSlot(String),

    #[error("rating {0} is outside the allowed 1..=5 range")]
    InvalidRating(f64),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
