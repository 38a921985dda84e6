use recipe::{MealSlot, RecipeError};
use shared::StorageError;
use thiserror::Error;
use user::UserError;

#[derive(Error, Debug)]
pub enum MealPlanningError {
    #[error("no recipes available for the {0} slot")]
    EmptyCategory(MealSlot),

    #[error("meal plan not found: {0}")]
    PlanNotFound(String),

    #[error("no {slot} assignment on day {day}")]
    MealNotFound { day: usize, slot: MealSlot },

    #[error("recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("recipe lookup failed: {0}")]
    Recipes(#[from] RecipeError),

    #[error("preferences unavailable: {0}")]
    Preferences(#[from] UserError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
