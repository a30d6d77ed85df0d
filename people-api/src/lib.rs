//! people-api library - person registry microservice
//!
//! Exposes the router and its building blocks for the binary and for
//! integration testing.

use axum::Router;
use chrono::{DateTime, Utc};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod services;

pub use crate::error::{ApiError, ApiResult};
pub use crate::services::PersonService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Person use cases (storage + enrichment behind it)
    pub people: PersonService,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(people: PersonService) -> Self {
        Self {
            people,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// The access-log middleware is outermost so it observes every response,
/// including the 500 produced when a handler panics.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::people_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::access_log))
                .layer(CatchPanicLayer::custom(middleware::panic_response)),
        )
}
