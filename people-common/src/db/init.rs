//! Database initialization
//!
//! Opens the connection pool and creates the `person` table on first run.
//! Every statement here is idempotent, so the service can run it on each
//! startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Pool sizing and timeouts for [`init_database`]
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Upper bound for waiting on a free connection and on SQLite locks
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Connect to `database_url` and create tables if needed
pub async fn init_database(database_url: &str, settings: &PoolSettings) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(settings.acquire_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await?;

    info!(url = %database_url, "Database connection pool opened");

    create_person_table(&pool).await?;

    Ok(pool)
}

/// Create the person table and its lookup indexes
///
/// `AUTOINCREMENT` keeps identifiers of deleted rows from being handed out
/// again.
pub async fn create_person_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS person (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            surname TEXT NOT NULL,
            patronymic TEXT,
            age INTEGER NOT NULL DEFAULT 0,
            gender TEXT NOT NULL DEFAULT '',
            nation TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    for (index, column) in [
        ("idx_person_age", "age"),
        ("idx_person_gender", "gender"),
        ("idx_person_nation", "nation"),
    ] {
        let sql = format!("CREATE INDEX IF NOT EXISTS {} ON person({})", index, column);
        sqlx::query(&sql).execute(pool).await?;
    }

    Ok(())
}
