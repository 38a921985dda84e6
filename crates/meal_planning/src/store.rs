use async_trait::async_trait;

use crate::error::MealPlanningError;
use crate::plan::MealPlan;

/// Repository contract for persisted meal plans.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// List plans, newest-created first.
    async fn list(&self) -> Result<Vec<MealPlan>, MealPlanningError>;

    async fn get(&self, id: &str) -> Result<Option<MealPlan>, MealPlanningError>;

    async fn insert(&self, plan: &MealPlan) -> Result<(), MealPlanningError>;

    /// Persist an edited plan in place. Touches `updated_at` via the plan
    /// value itself.
    async fn update(&self, plan: &MealPlan) -> Result<(), MealPlanningError>;

    /// Clear the selected flag on every plan, then set it on the target.
    async fn select(&self, id: &str) -> Result<(), MealPlanningError>;

    async fn delete(&self, id: &str) -> Result<(), MealPlanningError>;
}
