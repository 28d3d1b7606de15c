//! Atomic creation of multi-line documents.
//!
//! The coordinator owns the write order for every document kind: validate,
//! allocate a number, insert the header, insert the lines, commit. Anything
//! failing after the transaction opens rolls the whole scope back, including
//! the number allocation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use docledger_core::DocumentKind;
use docledger_core::workflow::Actor;
use docledger_shared::{AppError, AppResult};

use crate::error::storage_error;
use crate::sequence::SequenceGenerator;

/// A persisted header together with its lines in line order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document<H, L> {
    /// Header row.
    #[serde(flatten)]
    pub header: H,
    /// Line rows ordered by line number.
    pub lines: Vec<L>,
}

/// Per-kind persistence used by [`LedgerCoordinator`].
///
/// Every method receives the open transaction and must not touch any other
/// connection.
#[async_trait]
pub trait DocumentWriter: Send + Sync {
    /// Caller input.
    type Input: Send + Sync;
    /// One line of the input.
    type LineInput: Send + Sync;
    /// Values derived during validation, e.g. totals.
    type Prepared: Send + Sync;
    /// Persisted header row.
    type Header: Send + Sync;
    /// Persisted line row.
    type Line: Send + Sync;

    /// Kind of document written.
    const KIND: DocumentKind;

    /// Validates `input` without touching storage.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` describing the first violation.
    fn prepare(&self, input: &Self::Input) -> AppResult<Self::Prepared>;

    /// Returns the lines of `input` in insertion order.
    fn lines(input: &Self::Input) -> &[Self::LineInput];

    /// Returns the document number stored in `header`.
    fn number(header: &Self::Header) -> &str;

    /// Returns the highest counter already used by this kind's series.
    async fn highest_existing(&self, txn: &DatabaseTransaction) -> Result<u64, DbErr>;

    /// Inserts the header row.
    async fn insert_header(
        &self,
        txn: &DatabaseTransaction,
        number: &str,
        actor: &Actor,
        input: &Self::Input,
        prepared: &Self::Prepared,
    ) -> AppResult<Self::Header>;

    /// Inserts one line row with its 1-based `line_number`.
    async fn insert_line(
        &self,
        txn: &DatabaseTransaction,
        header: &Self::Header,
        line_number: i32,
        line: &Self::LineInput,
    ) -> Result<Self::Line, DbErr>;
}

/// Runs document creation inside one database transaction.
#[derive(Debug, Clone)]
pub struct LedgerCoordinator {
    db: Arc<DatabaseConnection>,
    sequences: SequenceGenerator,
}

impl LedgerCoordinator {
    /// Creates a coordinator over the shared pool.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, sequences: SequenceGenerator) -> Self {
        Self { db, sequences }
    }

    /// Validates and persists a document atomically.
    ///
    /// # Errors
    ///
    /// Returns `Validation` before any write if `input` is invalid, or the
    /// first storage error, in which case nothing is persisted.
    pub async fn create<W: DocumentWriter>(
        &self,
        writer: &W,
        actor: &Actor,
        input: &W::Input,
    ) -> AppResult<Document<W::Header, W::Line>> {
        let prepared = writer.prepare(input)?;

        let txn = self.db.begin().await.map_err(storage_error)?;
        let result = self.create_within(&txn, writer, actor, input, &prepared).await;
        let document = settle(txn, result).await?;
        info!(
            number = W::number(&document.header),
            lines = document.lines.len(),
            "{} created",
            W::KIND
        );
        Ok(document)
    }

    /// Writes a prepared document into an already open transaction.
    ///
    /// The caller commits or rolls back.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by numbering or an insert.
    pub async fn create_within<W: DocumentWriter>(
        &self,
        txn: &DatabaseTransaction,
        writer: &W,
        actor: &Actor,
        input: &W::Input,
        prepared: &W::Prepared,
    ) -> AppResult<Document<W::Header, W::Line>> {
        let number = self
            .sequences
            .next(txn, W::KIND.series(), writer.highest_existing(txn))
            .await
            .map_err(storage_error)?;

        let header = writer
            .insert_header(txn, &number, actor, input, prepared)
            .await?;

        let line_inputs = W::lines(input);
        let mut lines = Vec::with_capacity(line_inputs.len());
        for (index, line) in line_inputs.iter().enumerate() {
            let line_number = i32::try_from(index + 1)
                .map_err(|_| AppError::Validation("too many lines".to_string()))?;
            let row = writer
                .insert_line(txn, &header, line_number, line)
                .await
                .map_err(storage_error)?;
            lines.push(row);
        }

        Ok(Document { header, lines })
    }
}

/// Commits `txn` if `result` is `Ok`, otherwise rolls it back.
///
/// # Errors
///
/// Returns the error of `result`, or the commit failure.
pub async fn settle<T>(txn: DatabaseTransaction, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(storage_error)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            warn!(error = %err, "transaction rolled back");
            Err(err)
        }
    }
}

/// Returns a fresh identifier for a header or line row.
pub(crate) fn new_id() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
