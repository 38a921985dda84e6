//! Meal-plan table access.
//!
//! `plan_data` persists only the assignment map (day label -> slot name ->
//! recipe id). Day totals are a cache and are recomputed from the recipe
//! rows at load time; the macro summary is stored alongside as part of the
//! entity.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use meal_planning::{DayPlan, MacroSummary, MealAssignment, MealPlan, MealPlanningError, PlanStore};
use recipe::{MealSlot, Recipe, RecipeStore};
use shared::StorageError;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracing::warn;

use crate::SqliteStore;
use crate::time::{fmt_ts, parse_opt_ts, parse_ts};

type PlanData = BTreeMap<String, BTreeMap<String, String>>;

fn plan_data_of(plan: &MealPlan) -> PlanData {
    plan.days
        .iter()
        .map(|day| {
            let slots = day
                .meals
                .iter()
                .map(|meal| (meal.slot.as_str().to_string(), meal.recipe_id.clone()))
                .collect();
            (day.label.clone(), slots)
        })
        .collect()
}

/// Day labels sort by their numeric suffix ("Day 2" before "Day 10").
fn day_sort_key(label: &str) -> (u32, String) {
    let number = label
        .rsplit(' ')
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .unwrap_or(u32::MAX);
    (number, label.to_string())
}

fn days_from_plan_data(data: PlanData) -> Result<Vec<DayPlan>, StorageError> {
    let mut labeled: Vec<(String, BTreeMap<String, String>)> = data.into_iter().collect();
    labeled.sort_by_key(|(label, _)| day_sort_key(label));

    let mut days = Vec::with_capacity(labeled.len());
    for (label, slots) in labeled {
        let mut meals = Vec::with_capacity(slots.len());
        for (slot_name, recipe_id) in slots {
            let slot = MealSlot::parse(&slot_name)
                .map_err(|_| StorageError::schema(format!("unknown slot {slot_name:?}")))?;
            meals.push(MealAssignment { slot, recipe_id });
        }
        meals.sort_by_key(|m| m.slot);
        days.push(DayPlan::new(label, meals));
    }
    Ok(days)
}

impl SqliteStore {
    async fn hydrate_plan(&self, row: &SqliteRow) -> Result<MealPlan, MealPlanningError> {
        let plan_data: String = row.try_get("plan_data").map_err(StorageError::from)?;
        let macro_summary: String = row.try_get("macro_summary").map_err(StorageError::from)?;
        let created_at: String = row.try_get("created_at").map_err(StorageError::from)?;
        let updated_at: String = row.try_get("updated_at").map_err(StorageError::from)?;
        let synced_at: Option<String> = row.try_get("synced_at").map_err(StorageError::from)?;

        let data: PlanData = serde_json::from_str(&plan_data)
            .map_err(|err| StorageError::schema(format!("bad plan_data json: {err}")))?;
        let summary: MacroSummary = serde_json::from_str(&macro_summary)
            .map_err(|err| StorageError::schema(format!("bad macro_summary json: {err}")))?;

        let mut days = days_from_plan_data(data)?;

        let ids: Vec<String> = days
            .iter()
            .flat_map(|d| d.meals.iter().map(|m| m.recipe_id.clone()))
            .collect();
        let recipes = self.get_by_ids(&ids).await?;
        let recipes_by_id: HashMap<String, &Recipe> =
            recipes.iter().map(|r| (r.id.clone(), r)).collect();
        if recipes_by_id.len() < ids.iter().collect::<std::collections::HashSet<_>>().len() {
            warn!("plan references recipes that no longer exist; their totals read as zero");
        }
        for day in &mut days {
            day.recompute_totals(&recipes_by_id);
        }

        Ok(MealPlan {
            id: row.try_get("id").map_err(StorageError::from)?,
            label: row.try_get("label").map_err(StorageError::from)?,
            days,
            summary,
            selected: row.try_get("selected").map_err(StorageError::from)?,
            created_at: parse_ts(&created_at)?,
            updated_at: parse_ts(&updated_at)?,
            synced_at: parse_opt_ts(synced_at.as_deref())?,
        })
    }

    fn encode_plan(plan: &MealPlan) -> Result<(String, String), StorageError> {
        let plan_data = serde_json::to_string(&plan_data_of(plan))
            .map_err(|err| StorageError::schema(err.to_string()))?;
        let macro_summary = serde_json::to_string(&plan.summary)
            .map_err(|err| StorageError::schema(err.to_string()))?;
        Ok((plan_data, macro_summary))
    }
}

#[async_trait]
impl PlanStore for SqliteStore {
    async fn list(&self) -> Result<Vec<MealPlan>, MealPlanningError> {
        let rows = sqlx::query("SELECT * FROM meal_plans ORDER BY created_at DESC")
            .fetch_all(self.pool())
            .await
            .map_err(StorageError::from)?;
        let mut plans = Vec::with_capacity(rows.len());
        for row in &rows {
            plans.push(self.hydrate_plan(row).await?);
        }
        Ok(plans)
    }

    async fn get(&self, id: &str) -> Result<Option<MealPlan>, MealPlanningError> {
        let row = sqlx::query("SELECT * FROM meal_plans WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(StorageError::from)?;
        match row {
            Some(row) => Ok(Some(self.hydrate_plan(&row).await?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, plan: &MealPlan) -> Result<(), MealPlanningError> {
        let (plan_data, macro_summary) = Self::encode_plan(plan)?;
        sqlx::query(
            r#"
            INSERT INTO meal_plans (
                id, label, plan_data, macro_summary, selected,
                created_at, updated_at, synced_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.label)
        .bind(&plan_data)
        .bind(&macro_summary)
        .bind(plan.selected)
        .bind(fmt_ts(plan.created_at))
        .bind(fmt_ts(plan.updated_at))
        .bind(plan.synced_at.map(fmt_ts))
        .execute(self.pool())
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }

    // A plain UPDATE: replacing the row would fire the shopping-list
    // cascade and silently drop derived lists.
    async fn update(&self, plan: &MealPlan) -> Result<(), MealPlanningError> {
        let (plan_data, macro_summary) = Self::encode_plan(plan)?;
        let result = sqlx::query(
            r#"
            UPDATE meal_plans
            SET label = ?1, plan_data = ?2, macro_summary = ?3, selected = ?4,
                updated_at = ?5, synced_at = ?6
            WHERE id = ?7
            "#,
        )
        .bind(&plan.label)
        .bind(&plan_data)
        .bind(&macro_summary)
        .bind(plan.selected)
        .bind(fmt_ts(plan.updated_at))
        .bind(plan.synced_at.map(fmt_ts))
        .bind(&plan.id)
        .execute(self.pool())
        .await
        .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(MealPlanningError::PlanNotFound(plan.id.clone()));
        }
        Ok(())
    }

    async fn select(&self, id: &str) -> Result<(), MealPlanningError> {
        let mut tx = self.pool().begin().await.map_err(StorageError::from)?;
        sqlx::query("UPDATE meal_plans SET selected = 0")
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        let result = sqlx::query("UPDATE meal_plans SET selected = 1 WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(MealPlanningError::PlanNotFound(id.to_string()));
        }
        tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), MealPlanningError> {
        sqlx::query("DELETE FROM meal_plans WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
