//! Correlated access and error logging
//!
//! Every request gets a fresh UUID v4 correlation id. It is returned in the
//! `request-id` response header and recorded on the `request` span that
//! wraps all downstream processing, so any event logged by handlers or
//! services carries it too.
//!
//! After the response is produced, one access entry is written on
//! [`ACCESS_TARGET`]. Responses carrying an [`ErrorReport`] additionally
//! produce an ERROR entry on [`ERROR_TARGET`] with the same id.

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::fmt;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::error::ErrorReport;

/// Response header holding the correlation id
pub const REQUEST_ID_HEADER: &str = "request-id";

/// Tracing target of access log entries
pub const ACCESS_TARGET: &str = "people_api::access";

/// Tracing target of error log entries
pub const ERROR_TARGET: &str = "people_api::error";

/// Per-request correlation id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outermost middleware: correlation id, access log, error log
pub async fn access_log(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::new();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    request.extensions_mut().insert(request_id.clone());

    let start = Instant::now();
    let mut response = next.run(request).instrument(span).await;
    let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

    // A v4 UUID is always a valid header value
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    if let Some(report) = response.extensions().get::<ErrorReport>() {
        error!(
            target: ERROR_TARGET,
            request_id = %request_id,
            url = %path,
            error = %report.cause,
            "{}",
            report.message
        );
    }

    info!(
        target: ACCESS_TARGET,
        method = %method,
        remote_addr = %remote_addr,
        url = %path,
        request_id = %request_id,
        status = response.status().as_u16(),
        work_time_us = elapsed_us,
        "Access log info"
    );

    response
}
