use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use recipe::{MealSlot, Recipe};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recipe placed into one slot of one day. Within a day, slots are
/// unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealAssignment {
    pub slot: MealSlot,
    pub recipe_id: String,
}

/// A planned day: its meals plus cached totals over them.
///
/// The four totals are a cache of the sum over this day's meals; they are
/// only ever produced by [`DayPlan::recompute_totals`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub label: String,
    pub meals: Vec<MealAssignment>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_fat: f64,
    pub total_carbs: f64,
}

impl DayPlan {
    pub fn new(label: impl Into<String>, meals: Vec<MealAssignment>) -> Self {
        DayPlan {
            label: label.into(),
            meals,
            total_calories: 0.0,
            total_protein: 0.0,
            total_fat: 0.0,
            total_carbs: 0.0,
        }
    }

    /// Refresh the cached totals from the referenced recipes. Assignments
    /// whose recipe is missing from the map contribute nothing.
    pub fn recompute_totals(&mut self, recipes: &HashMap<String, &Recipe>) {
        let mut calories = 0.0;
        let mut protein = 0.0;
        let mut fat = 0.0;
        let mut carbs = 0.0;
        for meal in &self.meals {
            if let Some(recipe) = recipes.get(&meal.recipe_id) {
                calories += recipe.macros.calories;
                protein += recipe.macros.protein;
                fat += recipe.macros.fat;
                carbs += recipe.macros.carbs;
            }
        }
        self.total_calories = calories;
        self.total_protein = protein;
        self.total_fat = fat;
        self.total_carbs = carbs;
    }
}

/// Daily-average macros over a whole plan. Always averages, never targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroSummary {
    pub avg_calories: f64,
    pub avg_protein: f64,
    pub avg_fat: f64,
    pub avg_carbs: f64,
    pub avg_fiber: f64,
}

impl MacroSummary {
    /// Average each macro over the plan's days. Fiber is not cached on the
    /// days, so the per-recipe values are consulted for all five macros.
    pub fn compute(days: &[DayPlan], recipes: &HashMap<String, &Recipe>) -> Self {
        if days.is_empty() {
            return MacroSummary::default();
        }
        let mut summary = MacroSummary::default();
        for day in days {
            for meal in &day.meals {
                if let Some(recipe) = recipes.get(&meal.recipe_id) {
                    summary.avg_calories += recipe.macros.calories;
                    summary.avg_protein += recipe.macros.protein;
                    summary.avg_fat += recipe.macros.fat;
                    summary.avg_carbs += recipe.macros.carbs;
                    summary.avg_fiber += recipe.macros.fiber;
                }
            }
        }
        let count = days.len() as f64;
        summary.avg_calories /= count;
        summary.avg_protein /= count;
        summary.avg_fat /= count;
        summary.avg_carbs /= count;
        summary.avg_fiber /= count;
        summary
    }
}

/// Solver output for one plan. Unpersisted until the user selects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedPlan {
    pub label: String,
    pub days: Vec<DayPlan>,
    pub summary: MacroSummary,
}

impl SolvedPlan {
    pub fn recipe_ids(&self) -> HashSet<String> {
        self.days
            .iter()
            .flat_map(|day| day.meals.iter().map(|m| m.recipe_id.clone()))
            .collect()
    }
}

/// A persisted meal plan. At most one plan carries `selected = true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: String,
    pub label: String,
    pub days: Vec<DayPlan>,
    pub summary: MacroSummary,
    pub selected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub synced_at: Option<DateTime<Utc>>,
}

impl MealPlan {
    pub fn from_solved(solved: SolvedPlan, now: DateTime<Utc>) -> Self {
        MealPlan {
            id: Uuid::new_v4().to_string(),
            label: solved.label,
            days: solved.days,
            summary: solved.summary,
            selected: false,
            created_at: now,
            updated_at: now,
            synced_at: None,
        }
    }

    pub fn recipe_ids(&self) -> HashSet<String> {
        self.days
            .iter()
            .flat_map(|day| day.meals.iter().map(|m| m.recipe_id.clone()))
            .collect()
    }
}
