//! Translation of planning inputs into a mixed-integer linear program.
//!
//! `build_plan_problem` is a pure function from a [`PlanContext`] and a
//! [`Tier`] to a [`PlanProblem`]; the tiered driver owns the retry loop and
//! the backend call. The model:
//!
//! - binary `x[r,d,s]` per eligible (recipe, day, slot) triple;
//! - exactly one recipe per active slot per day;
//! - per-recipe frequency limit over the whole plan;
//! - contiguous day blocks share identical assignments, which is what makes
//!   cook-once-eat-twice leftovers emerge;
//! - combined lunch/dinner recipes commit to one of the two slots for the
//!   whole plan;
//! - per enabled macro and day: hard target bounds (dropped at the softest
//!   tier), a directional soft cap, and a two-sided deviation
//!   decomposition feeding the objective;
//! - optional protein-family indicators with a hard family cap at the
//!   strictest tier.

use std::collections::{HashMap, HashSet};

use recipe::{MacroKind, MealSlot, ProteinKind, Recipe, RecipeCategory, detect_proteins};
use user::Preferences;

use crate::config::SolverConfig;
use crate::error::MealPlanningError;
use crate::problem::{ProblemSpec, Sense, VarId};

/// Relaxation level of one model build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Hard macro bounds plus the protein-family cap.
    Full,
    /// Hard macro bounds, no protein-family cap.
    NoProteinCap,
    /// Soft penalties only.
    SoftOnly,
}

/// One daily macro goal with its priority rank (1 = most important).
#[derive(Debug, Clone, Copy)]
pub struct MacroGoal {
    pub kind: MacroKind,
    pub value: f64,
    pub rank: usize,
}

/// Everything the builder needs, precomputed once per generation call.
#[derive(Debug)]
pub struct PlanContext<'a> {
    pub recipes: &'a [Recipe],
    pub goals: Vec<MacroGoal>,
    pub active_slots: Vec<MealSlot>,
    pub num_days: usize,
    pub block_size: usize,
    pub combine_lunch_dinner: bool,
    pub prefer_similar_ingredients: bool,
    pub config: &'a SolverConfig,
    recipe_proteins: Vec<Vec<ProteinKind>>,
}

impl<'a> PlanContext<'a> {
    /// Derive the planning context from stored preferences.
    ///
    /// Fails with `EmptyCategory` when some active slot has no compatible
    /// recipe at all; the exactly-one-per-slot constraint could never hold.
    pub fn from_preferences(
        recipes: &'a [Recipe],
        preferences: &Preferences,
        config: &'a SolverConfig,
    ) -> Result<Self, MealPlanningError> {
        let active_slots = active_slots(preferences);
        let num_days = preferences.num_days.clamp(1, 7) as usize;

        for &slot in &active_slots {
            let any = recipes
                .iter()
                .any(|r| slot_accepts(slot, r.category, preferences.combine_lunch_dinner));
            if !any {
                return Err(MealPlanningError::EmptyCategory(slot));
            }
        }

        // Block length follows the first recipe's frequency limit; the
        // constraint is then applied identically to every recipe in the
        // block.
        let block_size = recipes
            .first()
            .map(|r| (r.frequency_limit as usize).min(num_days).max(1))
            .unwrap_or(1);

        let goals = preferences
            .normalized_priority_order()
            .iter()
            .enumerate()
            .filter_map(|(position, &kind)| {
                let target = preferences.macro_targets.get(kind);
                target.is_active().then_some(MacroGoal {
                    kind,
                    value: target.value,
                    rank: position + 1,
                })
            })
            .collect();

        let recipe_proteins = recipes.iter().map(detect_proteins).collect();

        Ok(PlanContext {
            recipes,
            goals,
            active_slots,
            num_days,
            block_size,
            combine_lunch_dinner: preferences.combine_lunch_dinner,
            prefer_similar_ingredients: preferences.prefer_similar_ingredients,
            config,
            recipe_proteins,
        })
    }

    /// The tiers a generation attempt walks through, strictest first.
    pub fn tiers(&self) -> Vec<Tier> {
        if self.prefer_similar_ingredients {
            vec![Tier::Full, Tier::NoProteinCap, Tier::SoftOnly]
        } else {
            vec![Tier::Full, Tier::SoftOnly]
        }
    }
}

/// The active slot set: the stored selection when present, the classic
/// three meals otherwise, plus the snack slot when requested.
fn active_slots(preferences: &Preferences) -> Vec<MealSlot> {
    let mut slots: Vec<MealSlot> = MealSlot::ALL
        .into_iter()
        .filter(|slot| preferences.selected_slots.contains(slot))
        .collect();
    if slots.is_empty() {
        slots = vec![MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];
    }
    if preferences.include_snacks && !slots.contains(&MealSlot::Snack) {
        slots.push(MealSlot::Snack);
        slots.sort();
    }
    slots
}

/// Whether a recipe of `category` may fill `slot`.
pub fn slot_accepts(slot: MealSlot, category: RecipeCategory, combine_lunch_dinner: bool) -> bool {
    if combine_lunch_dinner && matches!(slot, MealSlot::Lunch | MealSlot::Dinner) {
        return matches!(category, RecipeCategory::Lunch | RecipeCategory::Dinner);
    }
    category.slot() == slot
}

fn prefers_at_most(kind: MacroKind) -> bool {
    matches!(kind, MacroKind::Calories | MacroKind::Fat | MacroKind::Carbs)
}

/// One assignment variable and the triple it stands for.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentVar {
    pub recipe: usize,
    pub day: usize,
    pub slot: MealSlot,
    pub var: VarId,
}

/// A built model plus the index needed to read assignments back out.
pub struct PlanProblem {
    pub spec: ProblemSpec,
    pub assignments: Vec<AssignmentVar>,
}

/// Build the MILP for one plan at one tier. `reuse` holds the recipe ids
/// chosen by earlier plans of the same generation call.
pub fn build_plan_problem(ctx: &PlanContext, tier: Tier, reuse: &HashSet<String>) -> PlanProblem {
    let mut spec = ProblemSpec::new();
    let mut assignments: Vec<AssignmentVar> = Vec::new();
    let mut index: HashMap<(usize, usize, MealSlot), VarId> = HashMap::new();

    for (ri, recipe) in ctx.recipes.iter().enumerate() {
        let reuse_cost = if reuse.contains(&recipe.id) {
            ctx.config.reuse_penalty
        } else {
            0.0
        };
        let rating_cost = ctx.config.rating_weight * (5.0 - recipe.rating_or_max()) / 5.0;
        for &slot in &ctx.active_slots {
            if !slot_accepts(slot, recipe.category, ctx.combine_lunch_dinner) {
                continue;
            }
            for day in 0..ctx.num_days {
                let var = spec.add_binary(reuse_cost + rating_cost);
                index.insert((ri, day, slot), var);
                assignments.push(AssignmentVar {
                    recipe: ri,
                    day,
                    slot,
                    var,
                });
            }
        }
    }

    // Exactly one recipe per active slot per day.
    for day in 0..ctx.num_days {
        for &slot in &ctx.active_slots {
            let terms: Vec<(VarId, f64)> = (0..ctx.recipes.len())
                .filter_map(|ri| index.get(&(ri, day, slot)).map(|&v| (v, 1.0)))
                .collect();
            spec.constrain(terms, Sense::Eq, 1.0);
        }
    }

    // Total appearances per recipe never exceed its frequency limit.
    for (ri, recipe) in ctx.recipes.iter().enumerate() {
        let terms: Vec<(VarId, f64)> = assignments
            .iter()
            .filter(|a| a.recipe == ri)
            .map(|a| (a.var, 1.0))
            .collect();
        if !terms.is_empty() {
            spec.constrain(terms, Sense::Le, recipe.frequency_limit as f64);
        }
    }

    // Within each contiguous block of days, every slot repeats the block's
    // first-day assignment.
    for block_start in (0..ctx.num_days).step_by(ctx.block_size.max(1)) {
        let block_end = (block_start + ctx.block_size).min(ctx.num_days);
        for day in block_start + 1..block_end {
            for ri in 0..ctx.recipes.len() {
                for &slot in &ctx.active_slots {
                    if let (Some(&lead), Some(&follow)) = (
                        index.get(&(ri, block_start, slot)),
                        index.get(&(ri, day, slot)),
                    ) {
                        spec.constrain(vec![(follow, 1.0), (lead, -1.0)], Sense::Eq, 0.0);
                    }
                }
            }
        }
    }

    // A dual-eligible recipe commits to lunch or dinner for the whole plan.
    if ctx.combine_lunch_dinner {
        for (ri, recipe) in ctx.recipes.iter().enumerate() {
            if !matches!(
                recipe.category,
                RecipeCategory::Lunch | RecipeCategory::Dinner
            ) {
                continue;
            }
            let has_lunch = (0..ctx.num_days).any(|d| index.contains_key(&(ri, d, MealSlot::Lunch)));
            let has_dinner =
                (0..ctx.num_days).any(|d| index.contains_key(&(ri, d, MealSlot::Dinner)));
            if !(has_lunch && has_dinner) {
                continue;
            }
            let choice = spec.add_binary(0.0);
            for day in 0..ctx.num_days {
                if let Some(&lunch) = index.get(&(ri, day, MealSlot::Lunch)) {
                    spec.constrain(vec![(lunch, 1.0), (choice, -1.0)], Sense::Le, 0.0);
                }
                if let Some(&dinner) = index.get(&(ri, day, MealSlot::Dinner)) {
                    spec.constrain(vec![(dinner, 1.0), (choice, 1.0)], Sense::Le, 1.0);
                }
            }
        }
    }

    // Per enabled macro and day: hard bounds, directional soft cap and the
    // plus/minus deviation split that carries the objective.
    for goal in &ctx.goals {
        let rank = goal.rank as f64;
        let max_dev = ctx.config.base_max_dev(goal.kind) * (1.0 + 0.5 * (rank - 1.0));
        let weight = (1000.0 - 200.0 * (rank - 1.0)).max(200.0);

        for day in 0..ctx.num_days {
            let day_terms: Vec<(VarId, f64)> = assignments
                .iter()
                .filter(|a| a.day == day)
                .map(|a| (a.var, ctx.recipes[a.recipe].macros.get(goal.kind)))
                .collect();

            if tier != Tier::SoftOnly {
                spec.constrain(day_terms.clone(), Sense::Ge, goal.value - max_dev);
                spec.constrain(day_terms.clone(), Sense::Le, goal.value + max_dev);
            }

            let slack = spec.add_continuous(0.0, f64::INFINITY, ctx.config.cap_penalty / goal.value);
            let mut cap_terms = day_terms.clone();
            if prefers_at_most(goal.kind) {
                cap_terms.push((slack, -1.0));
                spec.constrain(cap_terms, Sense::Le, goal.value);
            } else {
                cap_terms.push((slack, 1.0));
                spec.constrain(cap_terms, Sense::Ge, goal.value);
            }

            // daily_sum - target = dev_plus - dev_minus
            let dev_plus = spec.add_continuous(0.0, f64::INFINITY, weight / goal.value);
            let dev_minus = spec.add_continuous(0.0, f64::INFINITY, weight / goal.value);
            let mut dev_terms = day_terms;
            dev_terms.push((dev_plus, -1.0));
            dev_terms.push((dev_minus, 1.0));
            spec.constrain(dev_terms, Sense::Eq, goal.value);
        }
    }

    // Protein-family indicators: using any recipe of a family switches the
    // family's indicator on; the strictest tier also caps the family count.
    if ctx.prefer_similar_ingredients {
        let mut indicators: HashMap<ProteinKind, VarId> = HashMap::new();
        for assignment in &assignments {
            for &kind in &ctx.recipe_proteins[assignment.recipe] {
                let indicator = *indicators
                    .entry(kind)
                    .or_insert_with(|| spec.add_binary(ctx.config.protein_variety_penalty));
                spec.constrain(
                    vec![(assignment.var, 1.0), (indicator, -1.0)],
                    Sense::Le,
                    0.0,
                );
            }
        }
        if tier == Tier::Full && !indicators.is_empty() {
            let terms: Vec<(VarId, f64)> = indicators.values().map(|&v| (v, 1.0)).collect();
            spec.constrain(terms, Sense::Le, ctx.config.max_protein_types as f64);
        }
    }

    PlanProblem { spec, assignments }
}
