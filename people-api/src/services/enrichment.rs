//! Name-based demographic inference client
//!
//! Three independent lookups (age, gender, nationality) against the public
//! agify / genderize / nationalize style endpoints. Each call is bounded by
//! the client timeout and fails on transport errors, non-2xx statuses and
//! undecodable bodies.

use async_trait::async_trait;
use people_common::config::EnrichmentConfig;
use people_common::models::null_as_default;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("people-api/", env!("CARGO_PKG_VERSION"));

/// Enrichment client errors
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Network error calling {service}: {message}")]
    Network {
        service: &'static str,
        message: String,
    },

    #[error("{service} responded with status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("Cannot decode {service} response: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },

    #[error("nationalize returned no country candidates for '{0}'")]
    NoNationCandidate(String),

    #[error("Cannot build HTTP client: {0}")]
    Client(String),
}

/// `{"age": 30}`
#[derive(Debug, Deserialize)]
pub struct AgeGuess {
    #[serde(default, deserialize_with = "null_as_default")]
    pub age: u32,
}

/// `{"gender": "female"}`
#[derive(Debug, Deserialize)]
pub struct GenderGuess {
    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: String,
}

/// `{"country": [{"country_id": "US"}, ...]}`, highest confidence first
#[derive(Debug, Deserialize)]
pub struct NationGuess {
    #[serde(default)]
    pub country: Vec<CountryGuess>,
}

#[derive(Debug, Deserialize)]
pub struct CountryGuess {
    pub country_id: String,
}

/// Demographic inference by first name
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn infer_age(&self, name: &str) -> Result<u32, EnrichmentError>;

    async fn infer_gender(&self, name: &str) -> Result<String, EnrichmentError>;

    /// Country code of the top-ranked candidate
    async fn infer_nation(&self, name: &str) -> Result<String, EnrichmentError>;
}

/// HTTP implementation of [`Enricher`]
pub struct EnrichmentClient {
    http_client: reqwest::Client,
    age_url: String,
    gender_url: String,
    nation_url: String,
}

impl EnrichmentClient {
    pub fn new(config: &EnrichmentConfig) -> Result<Self, EnrichmentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| EnrichmentError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            age_url: config.age_url.clone(),
            gender_url: config.gender_url.clone(),
            nation_url: config.nation_url.clone(),
        })
    }

    async fn lookup<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        name: &str,
    ) -> Result<T, EnrichmentError> {
        debug!(service, name, url, "Querying inference service");

        let response = self
            .http_client
            .get(url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| EnrichmentError::Network {
                service,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status {
                service,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| EnrichmentError::Parse {
            service,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Enricher for EnrichmentClient {
    async fn infer_age(&self, name: &str) -> Result<u32, EnrichmentError> {
        let guess: AgeGuess = self.lookup("agify", &self.age_url, name).await?;
        Ok(guess.age)
    }

    async fn infer_gender(&self, name: &str) -> Result<String, EnrichmentError> {
        let guess: GenderGuess = self.lookup("genderize", &self.gender_url, name).await?;
        Ok(guess.gender)
    }

    async fn infer_nation(&self, name: &str) -> Result<String, EnrichmentError> {
        let guess: NationGuess = self.lookup("nationalize", &self.nation_url, name).await?;
        guess
            .country
            .into_iter()
            .next()
            .map(|c| c.country_id)
            .ok_or_else(|| EnrichmentError::NoNationCandidate(name.to_string()))
    }
}
