//! Shopping-list aggregation over a meal plan.
//!
//! Every ingredient line of every planned meal is parsed, scaled by the
//! recipe's servings and merged by normalized name. The merge is
//! order-insensitive up to floating rounding, so traversal order over the
//! plan does not matter.

use std::collections::{BTreeMap, HashMap};

use meal_planning::MealPlan;
use recipe::Recipe;
use tracing::debug;

use crate::parser::parse_ingredient;
use crate::types::{IngredientCategory, ShoppingItem};

/// Normalized names that never make it onto a list.
pub const SKIP_LIST: &[&str] = &[
    "water",
    "ice",
    "salt",
    "pepper",
    "salt pepper",
    "black pepper",
    "cooking spray",
];

struct PendingItem {
    quantity: f64,
    unit: String,
    category: IngredientCategory,
}

/// Aggregate every ingredient of every meal in the plan.
///
/// `recipes` must contain the recipes the plan references; assignments
/// whose recipe is missing are skipped with a log line rather than failing
/// the whole list. Items come back sorted by name with quantities rounded
/// to two decimals.
pub fn aggregate_ingredients(plan: &MealPlan, recipes: &[Recipe]) -> Vec<ShoppingItem> {
    let recipes_by_id: HashMap<&String, &Recipe> = recipes.iter().map(|r| (&r.id, r)).collect();

    // BTreeMap keys give the alphabetical output order for free.
    let mut pending: BTreeMap<String, PendingItem> = BTreeMap::new();

    for day in &plan.days {
        for meal in &day.meals {
            let Some(recipe) = recipes_by_id.get(&meal.recipe_id) else {
                debug!(recipe_id = %meal.recipe_id, "plan references a missing recipe, skipping");
                continue;
            };
            // Servings scale ingredient lines linearly.
            let scale = 1.0 / f64::from(recipe.servings.max(1));
            for line in &recipe.ingredients {
                let parsed = parse_ingredient(line);
                if parsed.name.is_empty() {
                    debug!(line = %line, "ingredient line has no usable name, dropping");
                    continue;
                }
                if SKIP_LIST.contains(&parsed.name.as_str()) {
                    continue;
                }
                let entry = pending.entry(parsed.name).or_insert(PendingItem {
                    quantity: 0.0,
                    unit: String::new(),
                    category: IngredientCategory::Other,
                });
                entry.quantity += parsed.quantity * scale;
                // First non-empty unit wins; units are never converted.
                if entry.unit.is_empty() && !parsed.unit.is_empty() {
                    entry.unit = parsed.unit;
                }
                // A specific category beats the Other placeholder.
                if entry.category == IngredientCategory::Other
                    && parsed.category != IngredientCategory::Other
                {
                    entry.category = parsed.category;
                }
            }
        }
    }

    pending
        .into_iter()
        .map(|(name, item)| {
            ShoppingItem::new(
                name,
                (item.quantity * 100.0).round() / 100.0,
                item.unit,
                item.category,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meal_planning::{DayPlan, MacroSummary, MealAssignment, SolvedPlan};
    use recipe::{MealSlot, NewRecipe, RecipeCategory, RecipeSource};

    fn recipe_with(id: &str, servings: u32, ingredients: &[&str]) -> Recipe {
        let mut input = NewRecipe::new(format!("Recipe {id}"), RecipeCategory::Dinner, RecipeSource::Manual);
        input.id = Some(id.to_string());
        input.servings = Some(servings);
        input.ingredients = ingredients.iter().map(|s| s.to_string()).collect();
        input.into_recipe(Utc::now()).unwrap()
    }

    fn plan_over(assignments: Vec<Vec<(&str, MealSlot)>>) -> MealPlan {
        let days = assignments
            .into_iter()
            .enumerate()
            .map(|(i, meals)| {
                DayPlan::new(
                    format!("Day {}", i + 1),
                    meals
                        .into_iter()
                        .map(|(id, slot)| MealAssignment {
                            slot,
                            recipe_id: id.to_string(),
                        })
                        .collect(),
                )
            })
            .collect();
        MealPlan::from_solved(
            SolvedPlan {
                label: "Plan 1".to_string(),
                days,
                summary: MacroSummary::default(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn duplicate_ingredients_sum_across_recipes() {
        let recipes = vec![
            recipe_with("r1", 1, &["1 clove garlic, minced", "1 cup water"]),
            recipe_with("r2", 1, &["1 clove garlic, minced"]),
        ];
        let plan = plan_over(vec![vec![
            ("r1", MealSlot::Lunch),
            ("r2", MealSlot::Dinner),
        ]]);

        let items = aggregate_ingredients(&plan, &recipes);
        assert_eq!(items.len(), 1, "water is skipped, garlic merges");
        let garlic = &items[0];
        assert_eq!(garlic.name, "garlic");
        assert_eq!(garlic.quantity, 2.0);
        assert_eq!(garlic.unit, "clove");
        assert_eq!(garlic.category, IngredientCategory::Produce);
    }

    #[test]
    fn quantities_scale_by_servings() {
        let recipes = vec![recipe_with("r1", 4, &["2 cups rice"])];
        let plan = plan_over(vec![vec![("r1", MealSlot::Dinner)]]);

        let items = aggregate_ingredients(&plan, &recipes);
        assert_eq!(items[0].quantity, 0.5);
    }

    #[test]
    fn aggregation_is_traversal_order_independent() {
        let recipes = vec![
            recipe_with("r1", 2, &["1 1/2 cups rice", "2 carrots"]),
            recipe_with("r2", 3, &["1/3 cup rice", "1 onion"]),
            recipe_with("r3", 1, &["¾ cup rice", "2 cloves garlic"]),
        ];
        let forward = plan_over(vec![
            vec![("r1", MealSlot::Lunch), ("r2", MealSlot::Dinner)],
            vec![("r3", MealSlot::Lunch), ("r1", MealSlot::Dinner)],
        ]);
        let reversed = plan_over(vec![
            vec![("r1", MealSlot::Dinner), ("r3", MealSlot::Lunch)],
            vec![("r2", MealSlot::Dinner), ("r1", MealSlot::Lunch)],
        ]);

        let a = aggregate_ingredients(&forward, &recipes);
        let b = aggregate_ingredients(&reversed, &recipes);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.name, y.name);
            assert!((x.quantity - y.quantity).abs() < 1e-9);
        }
    }

    #[test]
    fn first_nonempty_unit_is_kept() {
        let recipes = vec![
            recipe_with("r1", 1, &["2 eggs"]),
            recipe_with("r2", 1, &["1 piece egg"]),
        ];
        let plan = plan_over(vec![vec![
            ("r1", MealSlot::Lunch),
            ("r2", MealSlot::Dinner),
        ]]);

        let items = aggregate_ingredients(&plan, &recipes);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit, "piece", "empty unit upgraded by later line");
        assert_eq!(items[0].quantity, 3.0);
    }

    #[test]
    fn items_come_back_alphabetical_and_rounded() {
        let recipes = vec![recipe_with(
            "r1",
            3,
            &["1 cup quinoa", "1 zucchini", "2 apples"],
        )];
        let plan = plan_over(vec![vec![("r1", MealSlot::Dinner)]]);

        let items = aggregate_ingredients(&plan, &recipes);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "quinoa", "zucchini"]);
        assert_eq!(items[1].quantity, 0.33, "1/3 rounds to two decimals");
    }

    #[test]
    fn skip_list_names_are_dropped() {
        let recipes = vec![recipe_with(
            "r1",
            1,
            &["1 cup water", "ice", "salt and pepper to taste", "cooking spray"],
        )];
        let plan = plan_over(vec![vec![("r1", MealSlot::Dinner)]]);

        assert!(aggregate_ingredients(&plan, &recipes).is_empty());
    }
}
