//! SQLite-backed person store
//!
//! Every statement runs under the configured storage timeout. SQL integers
//! are `i64`; rows whose values do not fit the unsigned domain types are
//! reported as internal errors instead of being truncated.

use super::PersonStore;
use async_trait::async_trait;
use people_common::{Error, PersonRecord, Result};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

const SELECT_PERSON: &str =
    "SELECT id, name, surname, patronymic, age, gender, nation FROM person";

/// Person store over an sqlx SQLite pool
#[derive(Clone)]
pub struct SqlitePersonStore {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqlitePersonStore {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Run one statement, failing with `Error::Timeout` past the budget
    async fn bounded<T, F>(&self, op: &str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(Error::Timeout(format!(
                "{} exceeded {} ms",
                op,
                self.timeout.as_millis()
            ))),
        }
    }

    async fn fetch_records<'q>(
        &self,
        op: &str,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Result<Vec<PersonRecord>> {
        let rows = self.bounded(op, query.fetch_all(&self.pool)).await?;
        debug!(op, rows = rows.len(), "Fetched person rows");
        rows.iter().map(record_from_row).collect()
    }
}

#[async_trait]
impl PersonStore for SqlitePersonStore {
    async fn list(&self) -> Result<Vec<PersonRecord>> {
        self.fetch_records("list", sqlx::query(SELECT_PERSON)).await
    }

    async fn list_by_age(&self, age: u32) -> Result<Vec<PersonRecord>> {
        let sql = format!("{} WHERE age = ?", SELECT_PERSON);
        self.fetch_records("list_by_age", sqlx::query(&sql).bind(i64::from(age)))
            .await
    }

    async fn list_by_gender(&self, gender: &str) -> Result<Vec<PersonRecord>> {
        let sql = format!("{} WHERE gender = ?", SELECT_PERSON);
        self.fetch_records("list_by_gender", sqlx::query(&sql).bind(gender))
            .await
    }

    async fn list_by_nation(&self, nation: &str) -> Result<Vec<PersonRecord>> {
        let sql = format!("{} WHERE nation = ?", SELECT_PERSON);
        self.fetch_records("list_by_nation", sqlx::query(&sql).bind(nation))
            .await
    }

    async fn list_with_limit(&self, limit: u64) -> Result<Vec<PersonRecord>> {
        let sql = format!("{} LIMIT ?", SELECT_PERSON);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.fetch_records("list_with_limit", sqlx::query(&sql).bind(limit))
            .await
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<PersonRecord>> {
        // Larger identifiers are never assigned by SQLite
        let Ok(id) = i64::try_from(id) else {
            return Ok(None);
        };

        let sql = format!("{} WHERE id = ?", SELECT_PERSON);
        let row = self
            .bounded("get_by_id", sqlx::query(&sql).bind(id).fetch_optional(&self.pool))
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn create(&self, record: &PersonRecord) -> Result<u64> {
        let query = sqlx::query(
            "INSERT INTO person (name, surname, patronymic, age, gender, nation)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.name)
        .bind(&record.surname)
        .bind(record.patronymic.as_deref())
        .bind(i64::from(record.age))
        .bind(&record.gender)
        .bind(&record.nation);

        let result = self.bounded("create", query.execute(&self.pool)).await?;
        let id = result.last_insert_rowid();

        u64::try_from(id)
            .map_err(|_| Error::Internal(format!("store assigned invalid id {}", id)))
    }

    async fn update(&self, record: &PersonRecord) -> Result<()> {
        let Ok(id) = i64::try_from(record.id) else {
            return Ok(());
        };

        let query = sqlx::query(
            "UPDATE person
             SET name = ?, surname = ?, patronymic = ?, age = ?, gender = ?, nation = ?
             WHERE id = ?",
        )
        .bind(&record.name)
        .bind(&record.surname)
        .bind(record.patronymic.as_deref())
        .bind(i64::from(record.age))
        .bind(&record.gender)
        .bind(&record.nation)
        .bind(id);

        self.bounded("update", query.execute(&self.pool)).await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let Ok(id) = i64::try_from(id) else {
            return Ok(());
        };

        let query = sqlx::query("DELETE FROM person WHERE id = ?").bind(id);
        self.bounded("delete", query.execute(&self.pool)).await?;
        Ok(())
    }
}

fn record_from_row(row: &SqliteRow) -> Result<PersonRecord> {
    let id: i64 = row.try_get("id")?;
    let age: i64 = row.try_get("age")?;

    Ok(PersonRecord {
        id: u64::try_from(id)
            .map_err(|_| Error::Internal(format!("negative person id {}", id)))?,
        name: row.try_get("name")?,
        surname: row.try_get("surname")?,
        patronymic: row.try_get("patronymic")?,
        age: u32::try_from(age)
            .map_err(|_| Error::Internal(format!("age {} out of range for person {}", age, id)))?,
        gender: row.try_get("gender")?,
        nation: row.try_get("nation")?,
    })
}
