use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::ocean;

/// Pool options for the given database URL. A `:memory:` database lives and
/// dies with its connection, so the in-memory variant is pinned to a single
/// connection that is exempt from idle and lifetime reaping; losing it would
/// lose the whole ledger mid-process.
pub fn pool_options(database_url: &str) -> SqlitePoolOptions {
    if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(16)
    }
}

/// Creates the schema and, on a first run against an empty ledger, drops a
/// handful of sample bottles into the ocean.
pub async fn init(db_pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            name TEXT PRIMARY KEY,
            password TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )",
    )
    .execute(db_pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS bottles (
            id TEXT PRIMARY KEY,
            content TEXT NOT NULL,
            sender_name TEXT NOT NULL DEFAULT 'Anonymous',
            mood_color INTEGER NOT NULL DEFAULT 0xFFFFD700,
            likes INTEGER NOT NULL DEFAULT 0,
            timestamp INTEGER NOT NULL
        )",
    )
    .execute(db_pool)
    .await?;

    ocean::seed_if_empty(db_pool).await
}
