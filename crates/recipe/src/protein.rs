//! Keyword-based detection of the protein families a recipe relies on.
//!
//! The planner uses these to keep a week's plans from demanding too many
//! distinct proteins when the user prefers ingredient overlap.

use serde::{Deserialize, Serialize};

use crate::types::Recipe;

/// A protein family detectable from recipe text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProteinKind {
    Chicken,
    Beef,
    Pork,
    Turkey,
    Fish,
    Seafood,
    Egg,
    Tofu,
    Legume,
}

impl ProteinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProteinKind::Chicken => "chicken",
            ProteinKind::Beef => "beef",
            ProteinKind::Pork => "pork",
            ProteinKind::Turkey => "turkey",
            ProteinKind::Fish => "fish",
            ProteinKind::Seafood => "seafood",
            ProteinKind::Egg => "egg",
            ProteinKind::Tofu => "tofu",
            ProteinKind::Legume => "legume",
        }
    }
}

const CHICKEN_KEYWORDS: &[&str] = &["chicken", "drumstick", "rotisserie"];
const BEEF_KEYWORDS: &[&str] = &["beef", "steak", "brisket", "sirloin", "chuck roast"];
const PORK_KEYWORDS: &[&str] = &["pork", "bacon", "ham", "prosciutto", "chorizo", "pancetta"];
const TURKEY_KEYWORDS: &[&str] = &["turkey"];
const FISH_KEYWORDS: &[&str] = &[
    "salmon", "tuna", "cod", "tilapia", "halibut", "trout", "mahi", "anchov", "sardine", "fish",
];
const SEAFOOD_KEYWORDS: &[&str] = &[
    "shrimp", "prawn", "scallop", "crab", "lobster", "mussel", "clam", "oyster", "calamari",
];
const EGG_KEYWORDS: &[&str] = &["egg"];
const TOFU_KEYWORDS: &[&str] = &["tofu", "tempeh", "seitan", "edamame"];
const LEGUME_KEYWORDS: &[&str] = &[
    "lentil",
    "chickpea",
    "black bean",
    "kidney bean",
    "pinto bean",
    "cannellini",
    "white bean",
];

const PROTEIN_TABLE: &[(ProteinKind, &[&str])] = &[
    (ProteinKind::Chicken, CHICKEN_KEYWORDS),
    (ProteinKind::Beef, BEEF_KEYWORDS),
    (ProteinKind::Pork, PORK_KEYWORDS),
    (ProteinKind::Turkey, TURKEY_KEYWORDS),
    (ProteinKind::Fish, FISH_KEYWORDS),
    (ProteinKind::Seafood, SEAFOOD_KEYWORDS),
    (ProteinKind::Egg, EGG_KEYWORDS),
    (ProteinKind::Tofu, TOFU_KEYWORDS),
    (ProteinKind::Legume, LEGUME_KEYWORDS),
];

/// Detect every protein family mentioned in the recipe name or its
/// ingredient lines. A recipe may carry several; most carry one or none.
pub fn detect_proteins(recipe: &Recipe) -> Vec<ProteinKind> {
    let mut haystack = recipe.name.to_lowercase();
    for line in &recipe.ingredients {
        haystack.push('\n');
        haystack.push_str(&line.to_lowercase());
    }

    let mut found: Vec<ProteinKind> = PROTEIN_TABLE
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(kind, _)| *kind)
        .collect();
    found.sort();
    found.dedup();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewRecipe, RecipeCategory, RecipeSource};
    use chrono::Utc;

    fn recipe_with(name: &str, ingredients: &[&str]) -> Recipe {
        let mut input = NewRecipe::new(name, RecipeCategory::Dinner, RecipeSource::Manual);
        input.ingredients = ingredients.iter().map(|s| s.to_string()).collect();
        input.into_recipe(Utc::now()).unwrap()
    }

    #[test]
    fn detects_protein_from_name() {
        let recipe = recipe_with("Grilled Chicken Bowl", &["1 cup rice"]);
        assert_eq!(detect_proteins(&recipe), vec![ProteinKind::Chicken]);
    }

    #[test]
    fn detects_protein_from_ingredients() {
        let recipe = recipe_with("Weeknight Tacos", &["1 lb ground beef", "8 tortillas"]);
        assert_eq!(detect_proteins(&recipe), vec![ProteinKind::Beef]);
    }

    #[test]
    fn detects_multiple_families() {
        let recipe = recipe_with("Surf and Turf", &["1 steak", "8 oz shrimp"]);
        assert_eq!(
            detect_proteins(&recipe),
            vec![ProteinKind::Beef, ProteinKind::Seafood]
        );
    }

    #[test]
    fn vegetable_recipes_detect_nothing() {
        let recipe = recipe_with("Garden Salad", &["2 cups lettuce", "1 tomato"]);
        assert!(detect_proteins(&recipe).is_empty());
    }
}
