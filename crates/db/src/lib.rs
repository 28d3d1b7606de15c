//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions and migrations
//! - Deadline-bounded reads with fallback data
//! - Per-series document numbering
//! - Atomic multi-line document creation
//! - Repositories for every document kind

pub mod coordinator;
pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod resilient;
pub mod sequence;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::{Document, DocumentWriter, LedgerCoordinator};
pub use error::storage_error;
pub use repositories::{
    FinancialTransactionRepository, JournalEntryRepository, LedgerContext,
    PurchaseOrderRepository, Repositories, SupplierRepository,
};
pub use resilient::ResilientReader;
pub use sequence::SequenceGenerator;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use docledger_shared::DatabaseConfig;

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .sqlx_logging(false);
    Database::connect(options).await
}
