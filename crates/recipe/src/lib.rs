pub mod error;
pub mod protein;
pub mod store;
pub mod types;

pub use error::RecipeError;
pub use protein::{ProteinKind, detect_proteins};
pub use store::{RecipeFilter, RecipeStore};
pub use types::{
    MacroKind, Macros, MealSlot, NewRecipe, Recipe, RecipeCategory, RecipeSource, RecipeUpdate,
};
