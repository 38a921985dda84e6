use std::time::Duration;

use recipe::MacroKind;

/// Solver tuning constants.
///
/// These are part of the behavioral contract: changing them changes
/// observed plan quality and the expectations the scenario tests encode.
/// The intent behind the defaults is that macro deviation dominates reuse
/// (200 kcal off target costs about 200 units against 30 per reused slot),
/// reuse dominates rating (30 against at most 8), and wrong-direction macro
/// movement costs roughly double the same-magnitude movement toward the
/// preferred side.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// How many plans a single generation call attempts.
    pub plan_count: usize,
    /// Objective weight per unit of directional-cap violation, scaled by
    /// 1/target.
    pub cap_penalty: f64,
    /// Flat objective cost for assigning a recipe already used by an
    /// earlier plan of the same call.
    pub reuse_penalty: f64,
    /// Scales the (5 - rating)/5 objective cost for rated recipes.
    pub rating_weight: f64,
    /// Objective cost per distinct protein family a plan draws on.
    pub protein_variety_penalty: f64,
    /// Hard cap on distinct protein families at the strictest tier.
    pub max_protein_types: usize,
    /// Per-macro base half-width of the daily hard bounds.
    pub base_dev_calories: f64,
    pub base_dev_protein: f64,
    pub base_dev_fat: f64,
    pub base_dev_carbs: f64,
    pub base_dev_fiber: f64,
    /// Budget for a single backend solve.
    pub solve_timeout: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            plan_count: 3,
            cap_penalty: 1000.0,
            reuse_penalty: 30.0,
            rating_weight: 8.0,
            protein_variety_penalty: 500.0,
            max_protein_types: 2,
            base_dev_calories: 200.0,
            base_dev_protein: 20.0,
            base_dev_fat: 20.0,
            base_dev_carbs: 40.0,
            base_dev_fiber: 15.0,
            solve_timeout: Duration::from_secs(10),
        }
    }
}

impl SolverConfig {
    pub fn base_max_dev(&self, kind: MacroKind) -> f64 {
        match kind {
            MacroKind::Calories => self.base_dev_calories,
            MacroKind::Protein => self.base_dev_protein,
            MacroKind::Fat => self.base_dev_fat,
            MacroKind::Carbs => self.base_dev_carbs,
            MacroKind::Fiber => self.base_dev_fiber,
        }
    }
}
