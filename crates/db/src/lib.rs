pub mod migrate;
pub mod plans;
pub mod pool;
pub mod recipes;
pub mod settings;
pub mod shopping_lists;
mod time;

pub use migrate::migrate;
pub use pool::create_pool;

use sqlx::SqlitePool;

/// SQLite implementation of every store trait the engine consumes.
///
/// One value wraps one pool; the per-entity trait impls live in their own
/// modules.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
