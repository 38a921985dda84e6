//! Store tests over an in-memory SQLite database.
//!
//! `SqliteStore` implements every store trait, so shared method names are
//! disambiguated with trait-qualified calls throughout.

use std::time::Duration;

use chrono::Utc;
use db::{SqliteStore, migrate};
use meal_planning::{
    DayPlan, MacroSummary, MealAssignment, MealPlan, MealPlanningError, PlanStore, SolvedPlan,
};
use recipe::{
    Macros, MealSlot, NewRecipe, Recipe, RecipeCategory, RecipeFilter, RecipeSource, RecipeStore,
    RecipeUpdate,
};
use shopping::{IngredientCategory, ShoppingItem, ShoppingList, ShoppingListStore};
use sqlx::sqlite::SqlitePoolOptions;
use user::{PreferencesStore, SyncState, SyncStateStore};

async fn setup_store() -> SqliteStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    migrate(&pool).await.unwrap();
    sqlx::query("PRAGMA foreign_keys = true")
        .execute(&pool)
        .await
        .unwrap();
    SqliteStore::new(pool)
}

fn new_recipe(name: &str, category: RecipeCategory) -> NewRecipe {
    let mut input = NewRecipe::new(name, category, RecipeSource::Manual);
    input.macros = Macros {
        calories: 400.0,
        protein: 25.0,
        fat: 12.0,
        carbs: 40.0,
        fiber: 6.0,
    };
    input.ingredients = vec!["1 cup rice".to_string()];
    input
}

async fn add_recipe(store: &SqliteStore, name: &str, category: RecipeCategory) -> Recipe {
    RecipeStore::insert(store, new_recipe(name, category))
        .await
        .unwrap()
}

#[tokio::test]
async fn insert_then_get_round_trips() {
    let store = setup_store().await;
    let inserted = add_recipe(&store, "Fried Rice", RecipeCategory::Dinner).await;

    let loaded = RecipeStore::get(&store, &inserted.id)
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(loaded.name, "Fried Rice");
    assert_eq!(loaded.category, RecipeCategory::Dinner);
    assert_eq!(loaded.macros.calories, 400.0);
    assert_eq!(loaded.ingredients, vec!["1 cup rice".to_string()]);
    assert_eq!(loaded.frequency_limit, 3);
    assert!(loaded.synced_at.is_none());
}

#[tokio::test]
async fn list_orders_newest_first_and_filters() {
    let store = setup_store().await;
    add_recipe(&store, "Oatmeal", RecipeCategory::Breakfast).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    add_recipe(&store, "Lentil Soup", RecipeCategory::Lunch).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    add_recipe(&store, "Pad Thai", RecipeCategory::Dinner).await;

    let all = RecipeStore::list(&store, &RecipeFilter::default())
        .await
        .unwrap();
    let names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Pad Thai", "Lentil Soup", "Oatmeal"]);

    let lunches = RecipeStore::list(
        &store,
        &RecipeFilter {
            category: Some(RecipeCategory::Lunch),
            ..RecipeFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(lunches.len(), 1);
    assert_eq!(lunches[0].name, "Lentil Soup");

    let searched = RecipeStore::list(
        &store,
        &RecipeFilter {
            search: Some("pad".to_string()),
            ..RecipeFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].name, "Pad Thai");
}

#[tokio::test]
async fn partial_update_touches_updated_at_only() {
    let store = setup_store().await;
    let inserted = add_recipe(&store, "Tacos", RecipeCategory::Dinner).await;

    tokio::time::sleep(Duration::from_millis(5)).await;
    let updated = RecipeStore::update(
        &store,
        &inserted.id,
        RecipeUpdate {
            rating: Some(4.0),
            ..RecipeUpdate::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.rating, Some(4.0));
    assert_eq!(updated.name, "Tacos", "untouched fields survive");
    assert!(updated.updated_at > inserted.updated_at);
    assert_eq!(updated.created_at, inserted.created_at);
}

#[tokio::test]
async fn update_missing_row_is_not_found() {
    let store = setup_store().await;
    let err = RecipeStore::update(&store, "nope", RecipeUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, recipe::RecipeError::NotFound(_)));
}

#[tokio::test]
async fn updated_since_tracks_sync_stamps() {
    let store = setup_store().await;
    let epoch = chrono::DateTime::UNIX_EPOCH;
    let inserted = add_recipe(&store, "Curry", RecipeCategory::Dinner).await;

    assert_eq!(
        store.updated_since(epoch).await.unwrap().len(),
        1,
        "unsynced row is dirty"
    );

    store.mark_synced(&inserted.id, Utc::now()).await.unwrap();
    assert!(store.updated_since(epoch).await.unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(5)).await;
    let updated = RecipeStore::update(
        &store,
        &inserted.id,
        RecipeUpdate {
            name: Some("Green Curry".to_string()),
            ..RecipeUpdate::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(
        store.updated_since(epoch).await.unwrap().len(),
        1,
        "edits re-dirty the row"
    );
    assert!(
        store
            .updated_since(updated.updated_at)
            .await
            .unwrap()
            .is_empty(),
        "the cutoff timestamp is exclusive"
    );
}

#[tokio::test]
async fn upsert_from_remote_overwrites_in_place() {
    let store = setup_store().await;
    let mut server_row = new_recipe("Server Pasta", RecipeCategory::Dinner)
        .into_recipe(Utc::now())
        .unwrap();
    server_row.id = "3003".to_string();
    server_row.synced_at = Some(Utc::now());

    store.upsert_from_remote(&server_row).await.unwrap();
    let mut renamed = server_row.clone();
    renamed.name = "Server Pasta v2".to_string();
    store.upsert_from_remote(&renamed).await.unwrap();

    let loaded = RecipeStore::get(&store, "3003").await.unwrap().unwrap();
    assert_eq!(loaded.name, "Server Pasta v2");
    assert!(loaded.synced_at.is_some());
}

fn plan_with(recipe_ids: &[(&str, MealSlot)], days: usize) -> MealPlan {
    let day_plans: Vec<DayPlan> = (0..days)
        .map(|i| {
            DayPlan::new(
                format!("Day {}", i + 1),
                recipe_ids
                    .iter()
                    .map(|(id, slot)| MealAssignment {
                        slot: *slot,
                        recipe_id: id.to_string(),
                    })
                    .collect(),
            )
        })
        .collect();
    MealPlan::from_solved(
        SolvedPlan {
            label: "Plan 1".to_string(),
            days: day_plans,
            summary: MacroSummary::default(),
        },
        Utc::now(),
    )
}

#[tokio::test]
async fn plan_round_trip_recomputes_day_totals() {
    let store = setup_store().await;
    let breakfast = add_recipe(&store, "Eggs", RecipeCategory::Breakfast).await;
    let dinner = add_recipe(&store, "Steak", RecipeCategory::Dinner).await;

    let plan = plan_with(
        &[
            (&breakfast.id, MealSlot::Breakfast),
            (&dinner.id, MealSlot::Dinner),
        ],
        2,
    );
    PlanStore::insert(&store, &plan).await.unwrap();

    let loaded = PlanStore::get(&store, &plan.id).await.unwrap().unwrap();
    assert_eq!(loaded.days.len(), 2);
    for day in &loaded.days {
        assert_eq!(day.meals.len(), 2);
        assert_eq!(day.total_calories, 800.0, "totals rebuilt from recipes");
    }
    assert_eq!(loaded.label, "Plan 1");
    assert!(!loaded.selected);
}

#[tokio::test]
async fn day_order_survives_double_digit_labels() {
    let store = setup_store().await;
    let dinner = add_recipe(&store, "Stew", RecipeCategory::Dinner).await;

    // Ten day labels force "Day 10" to sort after "Day 9" despite plain
    // string ordering saying otherwise.
    let mut plan = plan_with(&[(&dinner.id, MealSlot::Dinner)], 1);
    plan.days = (0..10)
        .map(|i| {
            DayPlan::new(
                format!("Day {}", i + 1),
                vec![MealAssignment {
                    slot: MealSlot::Dinner,
                    recipe_id: dinner.id.clone(),
                }],
            )
        })
        .collect();
    PlanStore::insert(&store, &plan).await.unwrap();

    let loaded = PlanStore::get(&store, &plan.id).await.unwrap().unwrap();
    let labels: Vec<&str> = loaded.days.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels[0], "Day 1");
    assert_eq!(labels[1], "Day 2");
    assert_eq!(labels[9], "Day 10");
}

#[tokio::test]
async fn select_plan_is_exclusive() {
    let store = setup_store().await;
    let dinner = add_recipe(&store, "Chili", RecipeCategory::Dinner).await;

    let first = plan_with(&[(&dinner.id, MealSlot::Dinner)], 1);
    let second = plan_with(&[(&dinner.id, MealSlot::Dinner)], 1);
    PlanStore::insert(&store, &first).await.unwrap();
    PlanStore::insert(&store, &second).await.unwrap();

    store.select(&first.id).await.unwrap();
    store.select(&second.id).await.unwrap();

    let plans = PlanStore::list(&store).await.unwrap();
    let selected: Vec<&MealPlan> = plans.iter().filter(|p| p.selected).collect();
    assert_eq!(selected.len(), 1, "exactly one plan may be selected");
    assert_eq!(selected[0].id, second.id);
}

#[tokio::test]
async fn selecting_a_missing_plan_fails_and_changes_nothing() {
    let store = setup_store().await;
    let dinner = add_recipe(&store, "Ramen", RecipeCategory::Dinner).await;
    let plan = plan_with(&[(&dinner.id, MealSlot::Dinner)], 1);
    PlanStore::insert(&store, &plan).await.unwrap();
    store.select(&plan.id).await.unwrap();

    let err = store.select("missing").await.unwrap_err();
    assert!(matches!(err, MealPlanningError::PlanNotFound(_)));

    let loaded = PlanStore::get(&store, &plan.id).await.unwrap().unwrap();
    assert!(loaded.selected, "failed select rolls back the clear");
}

#[tokio::test]
async fn deleting_a_plan_cascades_to_its_shopping_lists() {
    let store = setup_store().await;
    let dinner = add_recipe(&store, "Pizza", RecipeCategory::Dinner).await;
    let plan = plan_with(&[(&dinner.id, MealSlot::Dinner)], 1);
    PlanStore::insert(&store, &plan).await.unwrap();

    let list = ShoppingList::new(
        plan.id.clone(),
        vec![ShoppingItem::new("flour", 2.0, "cup", IngredientCategory::Grains)],
        Utc::now(),
    );
    ShoppingListStore::insert(&store, &list).await.unwrap();
    assert_eq!(store.list_for_plan(&plan.id).await.unwrap().len(), 1);

    PlanStore::delete(&store, &plan.id).await.unwrap();
    assert!(store.list_for_plan(&plan.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn shopping_list_check_state_round_trips() {
    let store = setup_store().await;
    let dinner = add_recipe(&store, "Burgers", RecipeCategory::Dinner).await;
    let plan = plan_with(&[(&dinner.id, MealSlot::Dinner)], 1);
    PlanStore::insert(&store, &plan).await.unwrap();

    let mut list = ShoppingList::new(
        plan.id.clone(),
        vec![ShoppingItem::new("onion", 1.0, "", IngredientCategory::Produce)],
        Utc::now(),
    );
    ShoppingListStore::insert(&store, &list).await.unwrap();

    list.items[0].checked = true;
    ShoppingListStore::update(&store, &list).await.unwrap();

    let loaded = ShoppingListStore::get(&store, &list.id)
        .await
        .unwrap()
        .unwrap();
    assert!(loaded.items[0].checked);
}

#[tokio::test]
async fn preferences_default_row_is_seeded() {
    let store = setup_store().await;
    let prefs = PreferencesStore::get(&store).await.unwrap();
    assert_eq!(prefs.num_days, 7);
    assert_eq!(prefs.default_frequency, 3);
    assert!(prefs.macro_targets.calories.enabled);
    assert_eq!(prefs.macro_targets.calories.value, 2000.0);
}

#[tokio::test]
async fn preferences_save_and_reload() {
    let store = setup_store().await;
    let mut prefs = PreferencesStore::get(&store).await.unwrap();
    prefs.num_days = 4;
    prefs.include_snacks = true;
    prefs.selected_slots = vec![MealSlot::Lunch, MealSlot::Dinner];
    PreferencesStore::save(&store, &prefs).await.unwrap();

    let loaded = PreferencesStore::get(&store).await.unwrap();
    assert_eq!(loaded, prefs);
}

#[tokio::test]
async fn sync_state_starts_empty_and_stamps() {
    let store = setup_store().await;
    let state = SyncStateStore::get(&store).await.unwrap();
    assert!(state.email.is_none());
    assert!(state.last_sync_at.is_none());
    assert!(!state.is_logged_in());

    SyncStateStore::save(
        &store,
        &SyncState {
            email: Some("user@example.com".to_string()),
            server_token: Some("token".to_string()),
            ..SyncState::default()
        },
    )
    .await
    .unwrap();

    let at = Utc::now();
    store.set_last_sync(at).await.unwrap();
    let state = SyncStateStore::get(&store).await.unwrap();
    assert!(state.is_logged_in());
    let stamped = state.last_sync_at.unwrap();
    assert!((stamped - at).num_microseconds().unwrap().abs() < 2);
}
