use async_trait::async_trait;

use crate::error::ShoppingListError;
use crate::types::ShoppingList;

/// Repository contract for shopping lists, keyed by their source plan.
#[async_trait]
pub trait ShoppingListStore: Send + Sync {
    async fn list_for_plan(&self, plan_id: &str) -> Result<Vec<ShoppingList>, ShoppingListError>;

    async fn get(&self, id: &str) -> Result<Option<ShoppingList>, ShoppingListError>;

    async fn insert(&self, list: &ShoppingList) -> Result<(), ShoppingListError>;

    /// Overwrite the stored list, items included.
    async fn update(&self, list: &ShoppingList) -> Result<(), ShoppingListError>;

    async fn delete_for_plan(&self, plan_id: &str) -> Result<(), ShoppingListError>;
}
