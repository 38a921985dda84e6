use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grocery aisle grouping for a shopping item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientCategory {
    Produce,
    Protein,
    Dairy,
    Grains,
    Pantry,
    Other,
}

impl IngredientCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientCategory::Produce => "produce",
            IngredientCategory::Protein => "protein",
            IngredientCategory::Dairy => "dairy",
            IngredientCategory::Grains => "grains",
            IngredientCategory::Pantry => "pantry",
            IngredientCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "produce" => IngredientCategory::Produce,
            "protein" => IngredientCategory::Protein,
            "dairy" => IngredientCategory::Dairy,
            "grains" => IngredientCategory::Grains,
            "pantry" => IngredientCategory::Pantry,
            _ => IngredientCategory::Other,
        }
    }
}

/// One aggregated line of a shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: String,
    /// Normalized ingredient name, the aggregation key.
    pub name: String,
    pub quantity: f64,
    /// Canonical singular unit; empty when the source lines carried none.
    pub unit: String,
    pub checked: bool,
    pub category: IngredientCategory,
}

impl ShoppingItem {
    pub fn new(
        name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        category: IngredientCategory,
    ) -> Self {
        ShoppingItem {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            quantity,
            unit: unit.into(),
            checked: false,
            category,
        }
    }
}

/// A shopping list derived from one meal plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: String,
    pub plan_id: String,
    pub items: Vec<ShoppingItem>,
    pub created_at: DateTime<Utc>,
}

impl ShoppingList {
    pub fn new(plan_id: impl Into<String>, items: Vec<ShoppingItem>, now: DateTime<Utc>) -> Self {
        ShoppingList {
            id: Uuid::new_v4().to_string(),
            plan_id: plan_id.into(),
            items,
            created_at: now,
        }
    }
}
