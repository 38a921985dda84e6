use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecipeError;
use crate::types::{NewRecipe, Recipe, RecipeCategory, RecipeSource, RecipeUpdate};

/// Optional narrowing for recipe listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeFilter {
    pub category: Option<RecipeCategory>,
    pub source: Option<RecipeSource>,
    /// Case-insensitive substring match on the recipe name.
    pub search: Option<String>,
}

/// Repository contract for the recipe library. Any backing store meeting
/// this contract is acceptable to the planner, aggregator and reconciler.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// List recipes, newest-created first.
    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipeError>;

    async fn get(&self, id: &str) -> Result<Option<Recipe>, RecipeError>;

    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Recipe>, RecipeError>;

    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe, RecipeError>;

    /// Apply a field delta. Always touches `updated_at`.
    async fn update(&self, id: &str, update: RecipeUpdate) -> Result<Recipe, RecipeError>;

    async fn delete(&self, id: &str) -> Result<(), RecipeError>;

    /// Rows edited after `since` that the remote has not yet seen
    /// (`synced_at` null or older than the edit). Called with the epoch
    /// this selects every locally dirty row.
    async fn updated_since(&self, since: DateTime<Utc>) -> Result<Vec<Recipe>, RecipeError>;

    async fn mark_synced(&self, id: &str, at: DateTime<Utc>) -> Result<(), RecipeError>;

    /// Write a server-shaped row verbatim, inserting or replacing the local
    /// row with the same id. The caller sets `synced_at` before handing the
    /// row over.
    async fn upsert_from_remote(&self, recipe: &Recipe) -> Result<(), RecipeError>;
}
