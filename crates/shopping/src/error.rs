use meal_planning::MealPlanningError;
use recipe::RecipeError;
use shared::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShoppingListError {
    #[error("shopping list not found: {0}")]
    NotFound(String),

    #[error("meal plan not found: {0}")]
    PlanNotFound(String),

    #[error("shopping item not found: {0}")]
    ItemNotFound(String),

    #[error("plan lookup failed: {0}")]
    Plans(#[from] MealPlanningError),

    #[error("recipe lookup failed: {0}")]
    Recipes(#[from] RecipeError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
