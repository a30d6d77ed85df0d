//! Person service
//!
//! Orchestrates the storage port and the enrichment client:
//! - list projections are passthroughs (nation filter is upper-cased)
//! - `update` merges by presence: only non-empty strings and non-zero age
//!   replace stored values, so a field cannot be cleared through it
//! - `create` overwrites age, gender and nation with inferred values and
//!   persists nothing unless all three lookups succeed
//!
//! No transactions are used: `update` reads then writes, and concurrent
//! updates of one person resolve as last writer wins.

use crate::db::PersonStore;
use crate::services::enrichment::{Enricher, EnrichmentError};
use people_common::{Person, PersonRecord};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Person service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("person {0} not found")]
    NotFound(u64),

    #[error(transparent)]
    Storage(#[from] people_common::Error),

    #[error("enrichment failed: {0}")]
    Enrichment(#[from] EnrichmentError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Person use cases over injected storage and enrichment
#[derive(Clone)]
pub struct PersonService {
    store: Arc<dyn PersonStore>,
    enricher: Arc<dyn Enricher>,
}

impl PersonService {
    pub fn new(store: Arc<dyn PersonStore>, enricher: Arc<dyn Enricher>) -> Self {
        Self { store, enricher }
    }

    pub async fn list_all(&self) -> ServiceResult<Vec<Person>> {
        Ok(into_people(self.store.list().await?))
    }

    pub async fn list_by_age(&self, age: u32) -> ServiceResult<Vec<Person>> {
        Ok(into_people(self.store.list_by_age(age).await?))
    }

    pub async fn list_by_gender(&self, gender: &str) -> ServiceResult<Vec<Person>> {
        Ok(into_people(self.store.list_by_gender(gender).await?))
    }

    /// Nation codes are stored upper-cased, so the filter is too
    pub async fn list_by_nation(&self, nation: &str) -> ServiceResult<Vec<Person>> {
        let nation = nation.to_uppercase();
        Ok(into_people(self.store.list_by_nation(&nation).await?))
    }

    pub async fn list_with_limit(&self, limit: u64) -> ServiceResult<Vec<Person>> {
        Ok(into_people(self.store.list_with_limit(limit).await?))
    }

    pub async fn get(&self, id: u64) -> ServiceResult<Person> {
        self.store
            .get_by_id(id)
            .await?
            .map(Person::from)
            .ok_or(ServiceError::NotFound(id))
    }

    /// Deleting an unknown id succeeds without effect
    pub async fn delete(&self, id: u64) -> ServiceResult<()> {
        self.store.delete(id).await?;
        info!(person_id = id, "Person deleted");
        Ok(())
    }

    /// Merge `partial` into the stored person with the same id
    pub async fn update(&self, partial: Person) -> ServiceResult<()> {
        let id = partial.id;
        let stored = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        let merged = merge_by_presence(Person::from(stored), partial);
        self.store.update(&PersonRecord::from(merged)).await?;

        info!(person_id = id, "Person updated");
        Ok(())
    }

    /// Enrich and persist a new person, returning its identifier
    pub async fn create(&self, input: Person) -> ServiceResult<u64> {
        let mut record = PersonRecord::from(input);
        let name = record.name.as_str();

        let (age, gender, nation) = tokio::try_join!(
            self.enricher.infer_age(name),
            self.enricher.infer_gender(name),
            self.enricher.infer_nation(name),
        )?;
        debug!(name, age, %gender, %nation, "Enrichment complete");

        record.age = age;
        record.gender = gender;
        record.nation = nation.to_uppercase();

        let id = self.store.create(&record).await?;
        info!(person_id = id, "Person created");
        Ok(id)
    }
}

fn into_people(records: Vec<PersonRecord>) -> Vec<Person> {
    records.into_iter().map(Person::from).collect()
}

/// Non-empty / non-zero incoming fields win; the stored id is kept
fn merge_by_presence(mut stored: Person, incoming: Person) -> Person {
    let replace = |field: &mut String, value: String| {
        if !value.is_empty() {
            *field = value;
        }
    };

    replace(&mut stored.name, incoming.name);
    replace(&mut stored.surname, incoming.surname);
    replace(&mut stored.patronymic, incoming.patronymic);
    replace(&mut stored.gender, incoming.gender);
    replace(&mut stored.nation, incoming.nation.to_uppercase());

    if incoming.age != 0 {
        stored.age = incoming.age;
    }

    stored
}
