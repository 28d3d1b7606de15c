//! Core business logic for the document ledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and lifecycle rules live here.
//!
//! # Modules
//!
//! - `document` - Document kinds and their numbering series
//! - `numbering` - Parsing and formatting of document numbers
//! - `ledger` - Document inputs and invariant validation
//! - `workflow` - Lifecycle state machines, role policy, and reversals

pub mod document;
pub mod ledger;
pub mod numbering;
pub mod workflow;

pub use document::DocumentKind;
