//! Recipe table access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipe::{
    Macros, NewRecipe, Recipe, RecipeCategory, RecipeError, RecipeFilter, RecipeSource,
    RecipeStore, RecipeUpdate,
};
use shared::StorageError;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::SqliteStore;
use crate::time::{EPOCH_TEXT, fmt_ts, parse_opt_ts, parse_ts};

fn recipe_from_row(row: &SqliteRow) -> Result<Recipe, StorageError> {
    let category: String = row.try_get("category")?;
    let source: String = row.try_get("source")?;
    let ingredients: String = row.try_get("ingredients")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    let synced_at: Option<String> = row.try_get("synced_at")?;

    Ok(Recipe {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: RecipeCategory::parse(&category)
            .map_err(|_| StorageError::schema(format!("unknown category {category:?}")))?,
        macros: Macros {
            calories: row.try_get("calories")?,
            protein: row.try_get("protein")?,
            fat: row.try_get("fat")?,
            carbs: row.try_get("carbs")?,
            fiber: row.try_get("fiber")?,
        },
        ingredients: serde_json::from_str(&ingredients)
            .map_err(|err| StorageError::schema(format!("bad ingredients json: {err}")))?,
        instructions: row.try_get("instructions")?,
        image_url: row.try_get("image_url")?,
        source: RecipeSource::parse(&source)
            .map_err(|_| StorageError::schema(format!("unknown source {source:?}")))?,
        source_url: row.try_get("source_url")?,
        notion_page_id: row.try_get("notion_page_id")?,
        rating: row.try_get("rating")?,
        frequency_limit: row.try_get::<i64, _>("frequency_limit")?.max(1) as u32,
        servings: row.try_get::<i64, _>("servings")?.max(1) as u32,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
        synced_at: parse_opt_ts(synced_at.as_deref())?,
    })
}

async fn write_full_row(store: &SqliteStore, recipe: &Recipe) -> Result<(), StorageError> {
    let ingredients = serde_json::to_string(&recipe.ingredients)
        .map_err(|err| StorageError::schema(err.to_string()))?;
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO recipes (
            id, name, category, calories, protein, fat, carbs, fiber,
            ingredients, instructions, image_url, source, source_url,
            notion_page_id, rating, frequency_limit, servings,
            created_at, updated_at, synced_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
        "#,
    )
    .bind(&recipe.id)
    .bind(&recipe.name)
    .bind(recipe.category.as_str())
    .bind(recipe.macros.calories)
    .bind(recipe.macros.protein)
    .bind(recipe.macros.fat)
    .bind(recipe.macros.carbs)
    .bind(recipe.macros.fiber)
    .bind(&ingredients)
    .bind(&recipe.instructions)
    .bind(&recipe.image_url)
    .bind(recipe.source.as_str())
    .bind(&recipe.source_url)
    .bind(&recipe.notion_page_id)
    .bind(recipe.rating)
    .bind(recipe.frequency_limit as i64)
    .bind(recipe.servings as i64)
    .bind(fmt_ts(recipe.created_at))
    .bind(fmt_ts(recipe.updated_at))
    .bind(recipe.synced_at.map(fmt_ts))
    .execute(store.pool())
    .await?;
    Ok(())
}

#[async_trait]
impl RecipeStore for SqliteStore {
    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipeError> {
        let mut sql = String::from("SELECT * FROM recipes WHERE 1=1");
        if filter.category.is_some() {
            sql.push_str(" AND category = ?");
        }
        if filter.source.is_some() {
            sql.push_str(" AND source = ?");
        }
        if filter.search.is_some() {
            sql.push_str(" AND lower(name) LIKE ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query(&sql);
        if let Some(category) = filter.category {
            query = query.bind(category.as_str());
        }
        if let Some(source) = filter.source {
            query = query.bind(source.as_str());
        }
        if let Some(search) = &filter.search {
            query = query.bind(format!("%{}%", search.to_lowercase()));
        }

        let rows = query
            .fetch_all(self.pool())
            .await
            .map_err(StorageError::from)?;
        let recipes = rows
            .iter()
            .map(recipe_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    async fn get(&self, id: &str) -> Result<Option<Recipe>, RecipeError> {
        let row = sqlx::query("SELECT * FROM recipes WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(StorageError::from)?;
        Ok(row.as_ref().map(recipe_from_row).transpose()?)
    }

    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Recipe>, RecipeError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT * FROM recipes WHERE id IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(self.pool())
            .await
            .map_err(StorageError::from)?;
        let recipes = rows
            .iter()
            .map(recipe_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe, RecipeError> {
        let mut recipe = recipe.into_recipe(Utc::now())?;
        // Persisted timestamps carry microsecond precision; the returned
        // value must match what a reload would produce.
        recipe.created_at = parse_ts(&fmt_ts(recipe.created_at))?;
        recipe.updated_at = recipe.created_at;
        write_full_row(self, &recipe).await?;
        Ok(recipe)
    }

    async fn update(&self, id: &str, update: RecipeUpdate) -> Result<Recipe, RecipeError> {
        update.validate()?;

        // Column names are hardcoded; only values go through binds.
        let mut sets: Vec<&str> = Vec::new();
        if update.name.is_some() {
            sets.push("name = ?");
        }
        if update.category.is_some() {
            sets.push("category = ?");
        }
        if update.macros.is_some() {
            sets.push("calories = ?");
            sets.push("protein = ?");
            sets.push("fat = ?");
            sets.push("carbs = ?");
            sets.push("fiber = ?");
        }
        if update.ingredients.is_some() {
            sets.push("ingredients = ?");
        }
        if update.instructions.is_some() {
            sets.push("instructions = ?");
        }
        if update.image_url.is_some() {
            sets.push("image_url = ?");
        }
        if update.source_url.is_some() {
            sets.push("source_url = ?");
        }
        if update.notion_page_id.is_some() {
            sets.push("notion_page_id = ?");
        }
        if update.rating.is_some() {
            sets.push("rating = ?");
        }
        if update.frequency_limit.is_some() {
            sets.push("frequency_limit = ?");
        }
        if update.servings.is_some() {
            sets.push("servings = ?");
        }
        sets.push("updated_at = ?");

        let sql = format!("UPDATE recipes SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(name) = &update.name {
            query = query.bind(name);
        }
        if let Some(category) = update.category {
            query = query.bind(category.as_str());
        }
        if let Some(macros) = update.macros {
            query = query
                .bind(macros.calories)
                .bind(macros.protein)
                .bind(macros.fat)
                .bind(macros.carbs)
                .bind(macros.fiber);
        }
        if let Some(ingredients) = &update.ingredients {
            let json = serde_json::to_string(ingredients)
                .map_err(|err| StorageError::schema(err.to_string()))?;
            query = query.bind(json);
        }
        if let Some(instructions) = &update.instructions {
            query = query.bind(instructions);
        }
        if let Some(image_url) = &update.image_url {
            query = query.bind(image_url);
        }
        if let Some(source_url) = &update.source_url {
            query = query.bind(source_url);
        }
        if let Some(notion_page_id) = &update.notion_page_id {
            query = query.bind(notion_page_id);
        }
        if let Some(rating) = update.rating {
            query = query.bind(rating);
        }
        if let Some(frequency_limit) = update.frequency_limit {
            query = query.bind(frequency_limit as i64);
        }
        if let Some(servings) = update.servings {
            query = query.bind(servings as i64);
        }
        query = query.bind(fmt_ts(Utc::now())).bind(id);

        let result = query
            .execute(self.pool())
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(RecipeError::NotFound(id.to_string()));
        }

        self.get(id)
            .await?
            .ok_or_else(|| RecipeError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), RecipeError> {
        sqlx::query("DELETE FROM recipes WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn updated_since(&self, since: DateTime<Utc>) -> Result<Vec<Recipe>, RecipeError> {
        let sql = "SELECT * FROM recipes \
                   WHERE updated_at > ?1 AND updated_at > COALESCE(synced_at, ?2)";
        let rows = sqlx::query(sql)
            .bind(fmt_ts(since))
            .bind(EPOCH_TEXT)
            .fetch_all(self.pool())
            .await
            .map_err(StorageError::from)?;
        let recipes = rows
            .iter()
            .map(recipe_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    async fn mark_synced(&self, id: &str, at: DateTime<Utc>) -> Result<(), RecipeError> {
        sqlx::query("UPDATE recipes SET synced_at = ?1 WHERE id = ?2")
            .bind(fmt_ts(at))
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn upsert_from_remote(&self, recipe: &Recipe) -> Result<(), RecipeError> {
        write_full_row(self, recipe).await?;
        Ok(())
    }
}
