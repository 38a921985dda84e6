//! Single-slot replacement within an existing plan.
//!
//! The replacement is applied everywhere the outgoing recipe fills the same
//! slot, so a block that repeated the recipe across days keeps repeating
//! one recipe afterwards.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use recipe::{MealSlot, Recipe};
use tracing::debug;

use crate::error::MealPlanningError;
use crate::plan::{MacroSummary, MealPlan};

/// Candidates within this window of the outgoing recipe count as
/// macro-equivalent and are picked from at random.
const CALORIE_TOLERANCE: f64 = 100.0;
const PROTEIN_TOLERANCE: f64 = 10.0;
const FAT_TOLERANCE: f64 = 10.0;
const CARB_TOLERANCE: f64 = 10.0;

/// A rerolled plan plus the recipe that went in.
#[derive(Debug, Clone)]
pub struct RerollOutcome {
    pub plan: MealPlan,
    pub replacement: Recipe,
}

/// Replace the meal at (`day_index`, `slot`) with a fresh recipe.
///
/// Returns `Ok(None)` when no unused same-category recipe exists. The seed
/// makes the in-tolerance random choice reproducible; without one the
/// choice varies run to run.
pub fn reroll_plan_meal(
    plan: &MealPlan,
    day_index: usize,
    slot: MealSlot,
    recipes: &[Recipe],
    seed: Option<u64>,
) -> Result<Option<RerollOutcome>, MealPlanningError> {
    let day = plan
        .days
        .get(day_index)
        .ok_or(MealPlanningError::MealNotFound {
            day: day_index,
            slot,
        })?;
    let old_id = day
        .meals
        .iter()
        .find(|m| m.slot == slot)
        .map(|m| m.recipe_id.clone())
        .ok_or(MealPlanningError::MealNotFound {
            day: day_index,
            slot,
        })?;

    let recipes_by_id: HashMap<String, &Recipe> =
        recipes.iter().map(|r| (r.id.clone(), r)).collect();
    let old = *recipes_by_id
        .get(&old_id)
        .ok_or_else(|| MealPlanningError::RecipeNotFound(old_id.clone()))?;

    // Everything already on the plan is off limits, the outgoing recipe
    // included.
    let used: HashSet<&String> = plan
        .days
        .iter()
        .flat_map(|d| d.meals.iter().map(|m| &m.recipe_id))
        .collect();

    let candidates: Vec<&Recipe> = recipes
        .iter()
        .filter(|r| r.category.slot() == slot && !used.contains(&r.id))
        .collect();
    if candidates.is_empty() {
        debug!(%slot, "no unused candidates for reroll");
        return Ok(None);
    }

    let in_tolerance: Vec<&Recipe> = candidates
        .iter()
        .copied()
        .filter(|r| {
            (r.macros.calories - old.macros.calories).abs() <= CALORIE_TOLERANCE
                && (r.macros.protein - old.macros.protein).abs() <= PROTEIN_TOLERANCE
                && (r.macros.fat - old.macros.fat).abs() <= FAT_TOLERANCE
                && (r.macros.carbs - old.macros.carbs).abs() <= CARB_TOLERANCE
        })
        .collect();

    let picked: Option<&Recipe> = if in_tolerance.is_empty() {
        // Fall back to the candidate with the least relative macro drift.
        candidates.iter().copied().min_by(|a, b| {
            drift_score(a, old)
                .partial_cmp(&drift_score(b, old))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    } else {
        let mut rng = match seed {
            Some(s) => rand::rngs::StdRng::seed_from_u64(s),
            None => {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(0);
                rand::rngs::StdRng::seed_from_u64(now)
            }
        };
        in_tolerance.choose(&mut rng).copied()
    };
    let Some(replacement) = picked else {
        return Ok(None);
    };

    let updated = apply_replacement(plan, slot, &old_id, replacement, &recipes_by_id, Utc::now());
    Ok(Some(RerollOutcome {
        plan: updated,
        replacement: replacement.clone(),
    }))
}

/// Sum of squared macro deltas, each normalized by the outgoing value.
fn drift_score(candidate: &Recipe, old: &Recipe) -> f64 {
    let pairs = [
        (candidate.macros.calories, old.macros.calories),
        (candidate.macros.protein, old.macros.protein),
        (candidate.macros.fat, old.macros.fat),
        (candidate.macros.carbs, old.macros.carbs),
    ];
    pairs
        .iter()
        .map(|(new, old)| {
            let rel = (new - old) / old.max(1.0);
            rel * rel
        })
        .sum()
}

fn apply_replacement(
    plan: &MealPlan,
    slot: MealSlot,
    old_id: &str,
    replacement: &Recipe,
    recipes_by_id: &HashMap<String, &Recipe>,
    now: DateTime<Utc>,
) -> MealPlan {
    let mut updated = plan.clone();
    for day in &mut updated.days {
        let mut touched = false;
        for meal in &mut day.meals {
            if meal.slot == slot && meal.recipe_id == old_id {
                meal.recipe_id = replacement.id.clone();
                touched = true;
            }
        }
        if touched {
            day.recompute_totals(recipes_by_id);
        }
    }
    updated.summary = MacroSummary::compute(&updated.days, recipes_by_id);
    updated.updated_at = now;
    updated
}
