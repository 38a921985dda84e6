use recipe::{MacroKind, MealSlot};
use serde::{Deserialize, Serialize};

/// One daily macro goal. Disabled targets impose no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroTarget {
    pub enabled: bool,
    pub value: f64,
}

impl MacroTarget {
    pub fn new(enabled: bool, value: f64) -> Self {
        MacroTarget { enabled, value }
    }

    /// An enabled target with a non-positive value cannot anchor the
    /// deviation scaling and is treated as inactive.
    pub fn is_active(&self) -> bool {
        self.enabled && self.value > 0.0
    }
}

/// Daily targets for the five tracked macros.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: MacroTarget,
    pub protein: MacroTarget,
    pub fat: MacroTarget,
    pub carbs: MacroTarget,
    pub fiber: MacroTarget,
}

impl MacroTargets {
    pub fn get(&self, kind: MacroKind) -> MacroTarget {
        match kind {
            MacroKind::Calories => self.calories,
            MacroKind::Protein => self.protein,
            MacroKind::Fat => self.fat,
            MacroKind::Carbs => self.carbs,
            MacroKind::Fiber => self.fiber,
        }
    }

    pub fn set(&mut self, kind: MacroKind, target: MacroTarget) {
        match kind {
            MacroKind::Calories => self.calories = target,
            MacroKind::Protein => self.protein = target,
            MacroKind::Fat => self.fat = target,
            MacroKind::Carbs => self.carbs = target,
            MacroKind::Fiber => self.fiber = target,
        }
    }
}

impl Default for MacroTargets {
    fn default() -> Self {
        MacroTargets {
            calories: MacroTarget::new(true, 2000.0),
            protein: MacroTarget::new(true, 100.0),
            fat: MacroTarget::new(true, 70.0),
            carbs: MacroTarget::new(true, 250.0),
            fiber: MacroTarget::new(false, 30.0),
        }
    }
}

/// Plan-generation knobs. A singleton row; every generation call reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub macro_targets: MacroTargets,
    pub default_frequency: u32,
    /// Days per plan, clamped to 1..=7 at use.
    pub num_days: u32,
    pub include_snacks: bool,
    /// When set, lunch and dinner recipes may fill either of the two slots.
    pub combine_lunch_dinner: bool,
    /// When set, the planner penalizes plans that span many protein
    /// families.
    pub prefer_similar_ingredients: bool,
    pub selected_slots: Vec<MealSlot>,
    /// Permutation of the five macro kinds, most important first.
    pub priority_order: Vec<MacroKind>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            macro_targets: MacroTargets::default(),
            default_frequency: 3,
            num_days: 7,
            include_snacks: false,
            combine_lunch_dinner: false,
            prefer_similar_ingredients: false,
            selected_slots: vec![MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner],
            priority_order: MacroKind::ALL.to_vec(),
        }
    }
}

impl Preferences {
    /// The stored priority order when it is a genuine permutation of the
    /// five macros; the canonical order otherwise.
    pub fn normalized_priority_order(&self) -> Vec<MacroKind> {
        let mut seen = Vec::with_capacity(5);
        for &kind in &self.priority_order {
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        if seen.len() == MacroKind::ALL.len() {
            seen
        } else {
            MacroKind::ALL.to_vec()
        }
    }

    /// 1-based rank of a macro within the priority order.
    pub fn priority_rank(&self, kind: MacroKind) -> usize {
        self.normalized_priority_order()
            .iter()
            .position(|&k| k == kind)
            .map(|p| p + 1)
            .unwrap_or(MacroKind::ALL.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_priority_order_is_canonical() {
        let prefs = Preferences::default();
        assert_eq!(prefs.normalized_priority_order(), MacroKind::ALL.to_vec());
        assert_eq!(prefs.priority_rank(MacroKind::Calories), 1);
        assert_eq!(prefs.priority_rank(MacroKind::Fiber), 5);
    }

    #[test]
    fn corrupt_priority_order_falls_back_to_canonical() {
        let mut prefs = Preferences::default();
        prefs.priority_order = vec![MacroKind::Protein, MacroKind::Protein];
        assert_eq!(prefs.normalized_priority_order(), MacroKind::ALL.to_vec());
    }

    #[test]
    fn reordered_priority_changes_ranks() {
        let mut prefs = Preferences::default();
        prefs.priority_order = vec![
            MacroKind::Protein,
            MacroKind::Calories,
            MacroKind::Carbs,
            MacroKind::Fat,
            MacroKind::Fiber,
        ];
        assert_eq!(prefs.priority_rank(MacroKind::Protein), 1);
        assert_eq!(prefs.priority_rank(MacroKind::Calories), 2);
    }

    #[test]
    fn zero_valued_enabled_target_is_inactive() {
        let target = MacroTarget::new(true, 0.0);
        assert!(!target.is_active());
    }
}
