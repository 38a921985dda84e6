use shared::StorageError;
use sqlx::SqlitePool;
use user::Preferences;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS recipes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    calories REAL NOT NULL DEFAULT 0,
    protein REAL NOT NULL DEFAULT 0,
    fat REAL NOT NULL DEFAULT 0,
    carbs REAL NOT NULL DEFAULT 0,
    fiber REAL NOT NULL DEFAULT 0,
    ingredients TEXT NOT NULL DEFAULT '[]',
    instructions TEXT,
    image_url TEXT,
    source TEXT NOT NULL,
    source_url TEXT,
    notion_page_id TEXT,
    rating REAL,
    frequency_limit INTEGER NOT NULL DEFAULT 3,
    servings INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    synced_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_recipes_created_at ON recipes(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category);

CREATE TABLE IF NOT EXISTS meal_plans (
    id TEXT PRIMARY KEY,
    label TEXT NOT NULL,
    plan_data TEXT NOT NULL,
    macro_summary TEXT NOT NULL,
    selected INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    synced_at TEXT
);

CREATE TABLE IF NOT EXISTS shopping_lists (
    id TEXT PRIMARY KEY,
    plan_id TEXT NOT NULL REFERENCES meal_plans(id) ON DELETE CASCADE,
    items TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_shopping_lists_plan ON shopping_lists(plan_id);

CREATE TABLE IF NOT EXISTS preferences (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    macro_targets TEXT NOT NULL,
    default_frequency INTEGER NOT NULL DEFAULT 3,
    num_days INTEGER NOT NULL DEFAULT 7,
    include_snacks INTEGER NOT NULL DEFAULT 0,
    combine_lunch_dinner INTEGER NOT NULL DEFAULT 0,
    prefer_similar_ingredients INTEGER NOT NULL DEFAULT 0,
    selected_slots TEXT NOT NULL,
    priority_order TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sync_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    email TEXT,
    server_token TEXT,
    notion_token TEXT,
    notion_database_id TEXT,
    last_sync_at TEXT
);
"#;

/// Create the schema and seed the singleton rows.
///
/// Idempotent; runs at every startup before the pool is handed out.
pub async fn migrate(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;

    let defaults = Preferences::default();
    let macro_targets = serde_json::to_string(&defaults.macro_targets)
        .map_err(|err| StorageError::schema(err.to_string()))?;
    let selected_slots = serde_json::to_string(&defaults.selected_slots)
        .map_err(|err| StorageError::schema(err.to_string()))?;
    let priority_order = serde_json::to_string(&defaults.priority_order)
        .map_err(|err| StorageError::schema(err.to_string()))?;

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO preferences (
            id, macro_targets, default_frequency, num_days, include_snacks,
            combine_lunch_dinner, prefer_similar_ingredients, selected_slots, priority_order
        )
        VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&macro_targets)
    .bind(defaults.default_frequency as i64)
    .bind(defaults.num_days as i64)
    .bind(defaults.include_snacks)
    .bind(defaults.combine_lunch_dinner)
    .bind(defaults.prefer_similar_ingredients)
    .bind(&selected_slots)
    .bind(&priority_order)
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO sync_state (id) VALUES (1)")
        .execute(pool)
        .await?;

    Ok(())
}
