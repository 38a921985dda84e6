//! Shopping-list table access. Items live as a JSON array on the row.

use async_trait::async_trait;
use shared::StorageError;
use shopping::{ShoppingItem, ShoppingList, ShoppingListError, ShoppingListStore};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::SqliteStore;
use crate::time::{fmt_ts, parse_ts};

fn list_from_row(row: &SqliteRow) -> Result<ShoppingList, StorageError> {
    let items: String = row.try_get("items")?;
    let created_at: String = row.try_get("created_at")?;
    let items: Vec<ShoppingItem> = serde_json::from_str(&items)
        .map_err(|err| StorageError::schema(format!("bad items json: {err}")))?;
    Ok(ShoppingList {
        id: row.try_get("id")?,
        plan_id: row.try_get("plan_id")?,
        items,
        created_at: parse_ts(&created_at)?,
    })
}

#[async_trait]
impl ShoppingListStore for SqliteStore {
    async fn list_for_plan(&self, plan_id: &str) -> Result<Vec<ShoppingList>, ShoppingListError> {
        let rows =
            sqlx::query("SELECT * FROM shopping_lists WHERE plan_id = ?1 ORDER BY created_at DESC")
                .bind(plan_id)
                .fetch_all(self.pool())
                .await
                .map_err(StorageError::from)?;
        let lists = rows
            .iter()
            .map(list_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    async fn get(&self, id: &str) -> Result<Option<ShoppingList>, ShoppingListError> {
        let row = sqlx::query("SELECT * FROM shopping_lists WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(StorageError::from)?;
        Ok(row.as_ref().map(list_from_row).transpose()?)
    }

    async fn insert(&self, list: &ShoppingList) -> Result<(), ShoppingListError> {
        let items = serde_json::to_string(&list.items)
            .map_err(|err| StorageError::schema(err.to_string()))?;
        sqlx::query(
            "INSERT INTO shopping_lists (id, plan_id, items, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&list.id)
        .bind(&list.plan_id)
        .bind(&items)
        .bind(fmt_ts(list.created_at))
        .execute(self.pool())
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }

    async fn update(&self, list: &ShoppingList) -> Result<(), ShoppingListError> {
        let items = serde_json::to_string(&list.items)
            .map_err(|err| StorageError::schema(err.to_string()))?;
        let result = sqlx::query("UPDATE shopping_lists SET items = ?1 WHERE id = ?2")
            .bind(&items)
            .bind(&list.id)
            .execute(self.pool())
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(ShoppingListError::NotFound(list.id.clone()));
        }
        Ok(())
    }

    async fn delete_for_plan(&self, plan_id: &str) -> Result<(), ShoppingListError> {
        sqlx::query("DELETE FROM shopping_lists WHERE plan_id = ?1")
            .bind(plan_id)
            .execute(self.pool())
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
