//! HTTP middleware: request correlation, access/error logging, panic isolation

pub mod access_log;
pub mod panic;

pub use access_log::{access_log, RequestId, ACCESS_TARGET, ERROR_TARGET, REQUEST_ID_HEADER};
pub use panic::panic_response;
