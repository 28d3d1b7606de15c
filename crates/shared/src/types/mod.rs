//! Common types used across the application.

pub mod envelope;
pub mod outcome;
pub mod pagination;

pub use envelope::ApiResponse;
pub use outcome::ReadOutcome;
pub use pagination::{ListPage, PageRequest, Pagination};
