//! Panic isolation
//!
//! Used with `tower_http::catch_panic::CatchPanicLayer`, installed inside
//! the access-log middleware so the resulting 500 is logged with the
//! request's correlation id like any other error.

use axum::{http::StatusCode, response::Response};
use std::any::Any;

use crate::error::{error_response, ErrorReport};

/// Convert a caught handler panic into a 500 response
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let cause = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "non-string panic payload".to_string()
    };

    let mut response = error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR");
    response.extensions_mut().insert(ErrorReport {
        message: "unrecovered fault while handling request",
        cause,
    });
    response
}
