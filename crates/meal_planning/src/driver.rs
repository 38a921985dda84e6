//! Tiered plan generation.
//!
//! Each plan index walks the model tiers strictest-first and keeps the
//! first optimal solve. Recipe ids chosen by earlier plans feed the next
//! plan's reuse penalty, which is the only variety mechanism between plans;
//! tie-breaking inside the backend is accepted as nondeterminism.

use std::collections::{HashMap, HashSet};

use recipe::Recipe;
use tracing::{debug, info, warn};
use user::Preferences;

use crate::builder::{PlanContext, Tier, build_plan_problem};
use crate::config::SolverConfig;
use crate::error::MealPlanningError;
use crate::plan::{DayPlan, MacroSummary, MealAssignment, SolvedPlan};
use crate::problem::{MilpSolver, SolveStatus};

/// Generate up to `config.plan_count` plans.
///
/// Returns an empty list when some active slot has no compatible recipe or
/// when every plan index is infeasible at every tier; both outcomes are
/// recoverable and reported through logs rather than errors.
pub fn generate_plans(
    recipes: &[Recipe],
    preferences: &Preferences,
    config: &SolverConfig,
    solver: &dyn MilpSolver,
) -> Vec<SolvedPlan> {
    let ctx = match PlanContext::from_preferences(recipes, preferences, config) {
        Ok(ctx) => ctx,
        Err(MealPlanningError::EmptyCategory(slot)) => {
            warn!(slot = %slot, "no compatible recipes for an active slot, returning no plans");
            return Vec::new();
        }
        Err(err) => {
            warn!(error = %err, "could not derive a planning context");
            return Vec::new();
        }
    };

    let recipes_by_id: HashMap<String, &Recipe> =
        recipes.iter().map(|r| (r.id.clone(), r)).collect();

    let mut plans: Vec<SolvedPlan> = Vec::new();
    let mut used: HashSet<String> = HashSet::new();

    for plan_index in 0..config.plan_count {
        let Some(solved) = solve_one(&ctx, &used, solver, plan_index, &recipes_by_id) else {
            warn!(plan = plan_index + 1, "infeasible at every tier, skipping");
            continue;
        };
        used.extend(solved.recipe_ids());
        plans.push(solved);
    }

    info!(produced = plans.len(), requested = config.plan_count, "plan generation finished");
    plans
}

fn solve_one(
    ctx: &PlanContext<'_>,
    used: &HashSet<String>,
    solver: &dyn MilpSolver,
    plan_index: usize,
    recipes_by_id: &HashMap<String, &Recipe>,
) -> Option<SolvedPlan> {
    for tier in ctx.tiers() {
        let problem = build_plan_problem(ctx, tier, used);
        debug!(
            plan = plan_index + 1,
            ?tier,
            vars = problem.spec.var_count(),
            constraints = problem.spec.constraint_count(),
            "solving"
        );
        match solver.solve(&problem.spec, ctx.config.solve_timeout) {
            SolveStatus::Optimal(values) => {
                if tier != Tier::Full {
                    debug!(plan = plan_index + 1, ?tier, "solved at a relaxed tier");
                }
                return Some(extract_plan(ctx, &problem, &values, plan_index, recipes_by_id));
            }
            SolveStatus::Infeasible => continue,
        }
    }
    None
}

/// Read the chosen assignments out of a solution by rounding the binaries.
fn extract_plan(
    ctx: &PlanContext<'_>,
    problem: &crate::builder::PlanProblem,
    values: &[f64],
    plan_index: usize,
    recipes_by_id: &HashMap<String, &Recipe>,
) -> SolvedPlan {
    let mut days = Vec::with_capacity(ctx.num_days);
    for day in 0..ctx.num_days {
        let mut meals: Vec<MealAssignment> = ctx
            .active_slots
            .iter()
            .filter_map(|&slot| {
                problem
                    .assignments
                    .iter()
                    .find(|a| a.day == day && a.slot == slot && values[a.var.index()] > 0.5)
                    .map(|a| MealAssignment {
                        slot,
                        recipe_id: ctx.recipes[a.recipe].id.clone(),
                    })
            })
            .collect();
        meals.sort_by_key(|m| m.slot);

        let mut day_plan = DayPlan::new(format!("Day {}", day + 1), meals);
        day_plan.recompute_totals(recipes_by_id);
        days.push(day_plan);
    }

    let summary = MacroSummary::compute(&days, recipes_by_id);
    SolvedPlan {
        label: format!("Plan {}", plan_index + 1),
        days,
        summary,
    }
}
