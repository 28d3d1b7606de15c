//! Shared types, errors, and configuration for the document ledger.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error taxonomy
//! - Read outcomes that carry data provenance
//! - Pagination and the uniform response envelope
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, LedgerConfig};
pub use error::{AppError, AppResult};
