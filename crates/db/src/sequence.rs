//! Document number allocation.
//!
//! Each series owns a row in `document_sequences`. Allocation runs inside the
//! caller's transaction: the row is seeded from the highest number already in
//! use if it does not exist yet, then incremented with a single
//! `UPDATE ... SET last_value = last_value + 1`. The update holds a row lock
//! until the transaction ends, so concurrent creators of one series queue up
//! instead of computing the same number, and a rolled-back transaction gives
//! its number back.

use std::future::Future;

use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect, Set,
};
use tracing::debug;

use docledger_core::numbering::{self, DEFAULT_WIDTH};

use crate::entities::document_sequences;

/// Allocates zero-padded, per-series document numbers.
#[derive(Debug, Clone, Copy)]
pub struct SequenceGenerator {
    width: usize,
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

impl SequenceGenerator {
    /// Creates a generator rendering `width` digits.
    #[must_use]
    pub const fn new(width: usize) -> Self {
        Self { width }
    }

    /// Allocates the next number of `series`.
    ///
    /// `seed` yields the highest counter already used by the series. It is
    /// only awaited when the series has no counter row yet.
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if any statement fails or the counter row vanishes.
    pub async fn next<C, S>(&self, conn: &C, series: &str, seed: S) -> Result<String, DbErr>
    where
        C: ConnectionTrait,
        S: Future<Output = Result<u64, DbErr>>,
    {
        let existing = document_sequences::Entity::find_by_id(series.to_string())
            .one(conn)
            .await?;

        if existing.is_none() {
            let start = i64::try_from(seed.await?)
                .map_err(|_| DbErr::Custom(format!("sequence {series} is out of range")))?;
            let row = document_sequences::ActiveModel {
                series: Set(series.to_string()),
                last_value: Set(start),
                updated_at: Set(Utc::now().fixed_offset()),
            };
            document_sequences::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(document_sequences::Column::Series)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(conn)
                .await?;
            debug!(series, start, "seeded document sequence");
        }

        document_sequences::Entity::update_many()
            .col_expr(
                document_sequences::Column::LastValue,
                Expr::col(document_sequences::Column::LastValue).add(1),
            )
            .col_expr(
                document_sequences::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(document_sequences::Column::Series.eq(series))
            .exec(conn)
            .await?;

        let value: i64 = document_sequences::Entity::find_by_id(series.to_string())
            .select_only()
            .column(document_sequences::Column::LastValue)
            .into_tuple()
            .one(conn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("document sequence {series}")))?;

        let value = u64::try_from(value)
            .map_err(|_| DbErr::Custom(format!("sequence {series} is negative")))?;
        let number = numbering::format_number(series, value, self.width);
        debug!(series, %number, "allocated document number");
        Ok(number)
    }
}

/// Returns the highest counter among existing numbers of `series` in `column`.
///
/// # Errors
///
/// Returns a `DbErr` if the scan fails.
pub async fn scan_max_suffix<E, C>(conn: &C, column: E::Column, series: &str) -> Result<u64, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let numbers: Vec<String> = E::find()
        .select_only()
        .column(column)
        .filter(column.starts_with(series))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(numbering::max_suffix(series, numbers.iter().map(String::as_str)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::journal_entries;
    use crate::test_support::sqlite;
    use sea_orm::TransactionTrait;

    #[tokio::test]
    async fn test_sequential_numbers() {
        let db = sqlite().await;
        let generator = SequenceGenerator::default();

        let first = generator.next(&db, "JE", async { Ok(0) }).await.unwrap();
        let second = generator.next(&db, "JE", async { Ok(0) }).await.unwrap();
        let other = generator.next(&db, "PO", async { Ok(0) }).await.unwrap();

        assert_eq!(first, "JE000001");
        assert_eq!(second, "JE000002");
        assert_eq!(other, "PO000001");
    }

    #[tokio::test]
    async fn test_seed_from_existing_numbers() {
        let db = sqlite().await;
        let generator = SequenceGenerator::new(4);

        let number = generator.next(&db, "TXN", async { Ok(41) }).await.unwrap();
        assert_eq!(number, "TXN0042");

        // The seed is only consulted once.
        let number = generator.next(&db, "TXN", async { Ok(900) }).await.unwrap();
        assert_eq!(number, "TXN0043");
    }

    #[tokio::test]
    async fn test_rolled_back_number_is_reused() {
        let db = sqlite().await;
        let generator = SequenceGenerator::default();
        generator.next(&db, "JE", async { Ok(0) }).await.unwrap();

        let txn = db.begin().await.unwrap();
        let inside = generator.next(&txn, "JE", async { Ok(0) }).await.unwrap();
        assert_eq!(inside, "JE000002");
        txn.rollback().await.unwrap();

        let after = generator.next(&db, "JE", async { Ok(0) }).await.unwrap();
        assert_eq!(after, "JE000002");
    }

    #[tokio::test]
    async fn test_scan_on_empty_table() {
        let db = sqlite().await;
        let max = scan_max_suffix::<journal_entries::Entity, _>(
            &db,
            journal_entries::Column::Number,
            "JE",
        )
        .await
        .unwrap();
        assert_eq!(max, 0);
    }
}
