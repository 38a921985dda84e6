//! Operation layer for shopping lists.

use chrono::Utc;
use meal_planning::PlanStore;
use recipe::RecipeStore;

use crate::aggregator::aggregate_ingredients;
use crate::error::ShoppingListError;
use crate::store::ShoppingListStore;
use crate::types::ShoppingList;

/// Derive (or re-derive) the shopping list for a plan.
///
/// Any previous list for the same plan is replaced, which is how the list
/// tracks plan edits such as rerolls.
pub async fn generate_shopping_list(
    plans: &dyn PlanStore,
    recipes: &dyn RecipeStore,
    lists: &dyn ShoppingListStore,
    plan_id: &str,
) -> Result<ShoppingList, ShoppingListError> {
    let plan = plans
        .get(plan_id)
        .await?
        .ok_or_else(|| ShoppingListError::PlanNotFound(plan_id.to_string()))?;

    let ids: Vec<String> = plan.recipe_ids().into_iter().collect();
    let library = recipes.get_by_ids(&ids).await?;

    let items = aggregate_ingredients(&plan, &library);
    let list = ShoppingList::new(plan_id, items, Utc::now());

    lists.delete_for_plan(plan_id).await?;
    lists.insert(&list).await?;
    Ok(list)
}

/// Check or uncheck one item of a stored list.
pub async fn set_item_checked(
    lists: &dyn ShoppingListStore,
    list_id: &str,
    item_id: &str,
    checked: bool,
) -> Result<ShoppingList, ShoppingListError> {
    let mut list = lists
        .get(list_id)
        .await?
        .ok_or_else(|| ShoppingListError::NotFound(list_id.to_string()))?;

    let item = list
        .items
        .iter_mut()
        .find(|i| i.id == item_id)
        .ok_or_else(|| ShoppingListError::ItemNotFound(item_id.to_string()))?;
    item.checked = checked;

    lists.update(&list).await?;
    Ok(list)
}
