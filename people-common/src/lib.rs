//! # People Common Library
//!
//! Shared code for the people registry services including:
//! - Person domain and storage models
//! - Database bootstrap (pool + schema)
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{Person, PersonRecord};
