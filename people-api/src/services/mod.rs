//! Domain services for the people API

pub mod enrichment;
pub mod person;

pub use enrichment::{Enricher, EnrichmentClient, EnrichmentError};
pub use person::{PersonService, ServiceError};
