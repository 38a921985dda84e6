use async_trait::async_trait;
use recipe::Recipe;
use user::Preferences;

use crate::error::RemoteError;

/// Abstract remote recipe service.
///
/// The engine never talks HTTP itself; the app shell supplies an
/// implementation and tests use an in-memory fake. Server-owned rows carry
/// all-numeric ids, which is what the push side keys create-vs-update on.
#[async_trait]
pub trait RecipeRemote: Send + Sync {
    /// Every recipe the server holds for this account.
    async fn list_recipes(&self) -> Result<Vec<Recipe>, RemoteError>;

    /// Create a server row for a locally-born recipe. The returned value
    /// reflects what the server stored, its page reference included.
    async fn create_recipe(&self, recipe: &Recipe) -> Result<Recipe, RemoteError>;

    /// Update the server row with the same id.
    async fn update_recipe(&self, recipe: &Recipe) -> Result<(), RemoteError>;

    /// Server-side preferences, if any were ever pushed.
    async fn fetch_preferences(&self) -> Result<Option<Preferences>, RemoteError>;

    async fn push_preferences(&self, preferences: &Preferences) -> Result<(), RemoteError>;
}
