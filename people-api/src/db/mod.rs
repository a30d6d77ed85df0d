//! Person storage
//!
//! The service only sees [`PersonStore`]; [`SqlitePersonStore`] is the
//! production adapter.

pub mod sqlite;

pub use sqlite::SqlitePersonStore;

use async_trait::async_trait;
use people_common::{PersonRecord, Result};

/// CRUD contract for person records
///
/// List results carry no ordering guarantee. Reads normalize "no rows" to an
/// empty list or `None`; only genuine storage faults are errors.
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn list(&self) -> Result<Vec<PersonRecord>>;

    async fn list_by_age(&self, age: u32) -> Result<Vec<PersonRecord>>;

    async fn list_by_gender(&self, gender: &str) -> Result<Vec<PersonRecord>>;

    async fn list_by_nation(&self, nation: &str) -> Result<Vec<PersonRecord>>;

    async fn list_with_limit(&self, limit: u64) -> Result<Vec<PersonRecord>>;

    async fn get_by_id(&self, id: u64) -> Result<Option<PersonRecord>>;

    /// Insert `record` and return the identifier assigned by the store.
    /// `record.id` is ignored.
    async fn create(&self, record: &PersonRecord) -> Result<u64>;

    /// Overwrite every mutable field of the row with `record.id`.
    /// Succeeds without effect when the row does not exist.
    async fn update(&self, record: &PersonRecord) -> Result<()>;

    /// Succeeds without effect when the row does not exist.
    async fn delete(&self, id: u64) -> Result<()>;
}
