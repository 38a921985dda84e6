use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("recipe error: {0}")]
    Recipe(#[from] recipe::RecipeError),

    #[error("meal planning error: {0}")]
    MealPlanning(#[from] meal_planning::MealPlanningError),

    #[error("shopping list error: {0}")]
    ShoppingList(#[from] shopping::ShoppingListError),

    #[error("settings error: {0}")]
    User(#[from] user::UserError),

    #[error("sync error: {0}")]
    Sync(#[from] sync::SyncError),

    #[error("storage error: {0}")]
    Storage(#[from] shared::StorageError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    BadRequest(String),
}
