//! Operation layer: fetch inputs from the stores, run the pure engines,
//! persist what needs persisting.

use chrono::Utc;
use recipe::{MealSlot, RecipeFilter, RecipeStore};
use user::PreferencesStore;

use crate::config::SolverConfig;
use crate::driver::generate_plans;
use crate::error::MealPlanningError;
use crate::plan::{MealPlan, SolvedPlan};
use crate::reroll::{RerollOutcome, reroll_plan_meal};
use crate::solver::MicrolpSolver;
use crate::store::PlanStore;

/// Generate candidate plans from the full recipe library and the stored
/// preferences. Nothing is persisted; the caller offers the plans to the
/// user and saves the chosen one via [`select_plan`].
pub async fn generate_meal_plans(
    recipes: &dyn RecipeStore,
    preferences: &dyn PreferencesStore,
    config: &SolverConfig,
) -> Result<Vec<SolvedPlan>, MealPlanningError> {
    let prefs = preferences.get().await?;
    let library = recipes.list(&RecipeFilter::default()).await?;
    Ok(generate_plans(&library, &prefs, config, &MicrolpSolver))
}

/// Persist a solved plan and mark it as the selected one.
pub async fn select_plan(
    plans: &dyn PlanStore,
    solved: SolvedPlan,
) -> Result<MealPlan, MealPlanningError> {
    let mut plan = MealPlan::from_solved(solved, Utc::now());
    plans.insert(&plan).await?;
    plans.select(&plan.id).await?;
    plan.selected = true;
    Ok(plan)
}

/// Reroll one meal of a stored plan and write the result back.
///
/// Returns `Ok(None)` when no replacement candidate exists; the stored plan
/// is left untouched in that case.
pub async fn reroll_meal(
    plans: &dyn PlanStore,
    recipes: &dyn RecipeStore,
    plan_id: &str,
    day_index: usize,
    slot: MealSlot,
    seed: Option<u64>,
) -> Result<Option<RerollOutcome>, MealPlanningError> {
    let plan = plans
        .get(plan_id)
        .await?
        .ok_or_else(|| MealPlanningError::PlanNotFound(plan_id.to_string()))?;
    let library = recipes.list(&RecipeFilter::default()).await?;

    match reroll_plan_meal(&plan, day_index, slot, &library, seed)? {
        Some(outcome) => {
            plans.update(&outcome.plan).await?;
            Ok(Some(outcome))
        }
        None => Ok(None),
    }
}
