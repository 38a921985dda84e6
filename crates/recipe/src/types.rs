use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RecipeError;

/// Recipe category, which doubles as the recipe's home meal slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
}

impl RecipeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeCategory::Breakfast => "breakfast",
            RecipeCategory::Lunch => "lunch",
            RecipeCategory::Dinner => "dinner",
            RecipeCategory::Snack => "snack",
            RecipeCategory::Dessert => "dessert",
        }
    }

    pub fn parse(s: &str) -> Result<Self, RecipeError> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(RecipeCategory::Breakfast),
            "lunch" => Ok(RecipeCategory::Lunch),
            "dinner" => Ok(RecipeCategory::Dinner),
            "snack" => Ok(RecipeCategory::Snack),
            "dessert" => Ok(RecipeCategory::Dessert),
            other => Err(RecipeError::InvalidCategory(other.to_string())),
        }
    }

    /// The slot a recipe of this category normally fills.
    pub fn slot(&self) -> MealSlot {
        match self {
            RecipeCategory::Breakfast => MealSlot::Breakfast,
            RecipeCategory::Lunch => MealSlot::Lunch,
            RecipeCategory::Dinner => MealSlot::Dinner,
            RecipeCategory::Snack => MealSlot::Snack,
            RecipeCategory::Dessert => MealSlot::Dessert,
        }
    }
}

/// A meal slot within a planned day. Ordering follows the order meals are
/// eaten, which is also the display order inside a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
}

impl MealSlot {
    pub const ALL: [MealSlot; 5] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
        MealSlot::Dessert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
            MealSlot::Dessert => "dessert",
        }
    }

    pub fn parse(s: &str) -> Result<Self, RecipeError> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "snack" => Ok(MealSlot::Snack),
            "dessert" => Ok(MealSlot::Dessert),
            other => Err(RecipeError::InvalidSlot(other.to_string())),
        }
    }
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a recipe came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeSource {
    Notion,
    Web,
    Manual,
}

impl RecipeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeSource::Notion => "notion",
            RecipeSource::Web => "web",
            RecipeSource::Manual => "manual",
        }
    }

    pub fn parse(s: &str) -> Result<Self, RecipeError> {
        match s.to_lowercase().as_str() {
            "notion" => Ok(RecipeSource::Notion),
            "web" => Ok(RecipeSource::Web),
            "manual" => Ok(RecipeSource::Manual),
            other => Err(RecipeError::InvalidSource(other.to_string())),
        }
    }
}

/// The five tracked macronutrient dimensions. The declaration order is the
/// canonical priority order used when the user has not reordered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroKind {
    Calories,
    Protein,
    Fat,
    Carbs,
    Fiber,
}

impl MacroKind {
    pub const ALL: [MacroKind; 5] = [
        MacroKind::Calories,
        MacroKind::Protein,
        MacroKind::Fat,
        MacroKind::Carbs,
        MacroKind::Fiber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MacroKind::Calories => "calories",
            MacroKind::Protein => "protein",
            MacroKind::Fat => "fat",
            MacroKind::Carbs => "carbs",
            MacroKind::Fiber => "fiber",
        }
    }
}

/// Per-serving macro values. Zero means the value is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub fiber: f64,
}

impl Macros {
    pub fn get(&self, kind: MacroKind) -> f64 {
        match kind {
            MacroKind::Calories => self.calories,
            MacroKind::Protein => self.protein,
            MacroKind::Fat => self.fat,
            MacroKind::Carbs => self.carbs,
            MacroKind::Fiber => self.fiber,
        }
    }

    pub fn accumulate(&mut self, other: &Macros) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.fat += other.fat;
        self.carbs += other.carbs;
        self.fiber += other.fiber;
    }
}

/// A recipe in the user's library.
///
/// `id` is stable for the row's lifetime. `updated_at` is stamped on every
/// field change; `synced_at` is null until the row has round-tripped through
/// the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub category: RecipeCategory,
    pub macros: Macros,
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub source: RecipeSource,
    pub source_url: Option<String>,
    pub notion_page_id: Option<String>,
    pub rating: Option<f64>,
    pub frequency_limit: u32,
    pub servings: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub synced_at: Option<DateTime<Utc>>,
}

impl Recipe {
    /// Unrated recipes are treated as top-rated so they incur no penalty
    /// during plan scoring.
    pub fn rating_or_max(&self) -> f64 {
        self.rating.unwrap_or(5.0)
    }

    /// True when the row has local edits the remote has not seen.
    pub fn is_dirty(&self) -> bool {
        match self.synced_at {
            None => true,
            Some(synced) => self.updated_at > synced,
        }
    }
}

/// Input for creating a recipe. The id is generated when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub id: Option<String>,
    pub name: String,
    pub category: RecipeCategory,
    #[serde(default)]
    pub macros: Macros,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub source: RecipeSource,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub notion_page_id: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub frequency_limit: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
}

impl NewRecipe {
    pub fn new(name: impl Into<String>, category: RecipeCategory, source: RecipeSource) -> Self {
        NewRecipe {
            id: None,
            name: name.into(),
            category,
            macros: Macros::default(),
            ingredients: Vec::new(),
            instructions: None,
            image_url: None,
            source,
            source_url: None,
            notion_page_id: None,
            rating: None,
            frequency_limit: None,
            servings: None,
        }
    }

    /// Materialize the full entity, applying defaults and validating ranges.
    pub fn into_recipe(self, now: DateTime<Utc>) -> Result<Recipe, RecipeError> {
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        Ok(Recipe {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name,
            category: self.category,
            macros: self.macros,
            ingredients: self.ingredients,
            instructions: self.instructions,
            image_url: self.image_url,
            source: self.source,
            source_url: self.source_url,
            notion_page_id: self.notion_page_id,
            rating: self.rating,
            frequency_limit: self.frequency_limit.unwrap_or(3).max(1),
            servings: self.servings.unwrap_or(1).max(1),
            created_at: now,
            updated_at: now,
            synced_at: None,
        })
    }
}

/// Field-level delta for updating a recipe. Absent fields are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub category: Option<RecipeCategory>,
    pub macros: Option<Macros>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub notion_page_id: Option<String>,
    pub rating: Option<f64>,
    pub frequency_limit: Option<u32>,
    pub servings: Option<u32>,
}

impl RecipeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.macros.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
            && self.image_url.is_none()
            && self.source_url.is_none()
            && self.notion_page_id.is_none()
            && self.rating.is_none()
            && self.frequency_limit.is_none()
            && self.servings.is_none()
    }

    pub fn validate(&self) -> Result<(), RecipeError> {
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        Ok(())
    }
}

fn validate_rating(rating: f64) -> Result<(), RecipeError> {
    if !(1.0..=5.0).contains(&rating) {
        return Err(RecipeError::InvalidRating(rating));
    }
    Ok(())
}
