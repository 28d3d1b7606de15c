//! Journal entry repository.
//!
//! Entries are created `DRAFT`, posted, and finally reversed. A reversal
//! marks the original `REVERSED` and creates a mirrored, already posted entry
//! in the same transaction.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use docledger_core::DocumentKind;
use docledger_core::ledger::{
    BalanceTotals, JournalEntryInput, JournalLineInput, validate_journal_entry,
};
use docledger_core::workflow::{
    Action, Actor, DocumentStatus, JournalEntryStatus, JournalEntryTransition, ReversalInput,
    ReversalService, WorkflowService,
};
use docledger_shared::types::{ListPage, PageRequest, ReadOutcome};
use docledger_shared::AppResult;

use super::{DocumentTable, LedgerContext, find_header, guarded_update, load, now};
use crate::coordinator::{Document, DocumentWriter, new_id, settle};
use crate::entities::{journal_entries, journal_entry_lines};
use crate::error::storage_error;
use crate::sequence::scan_max_suffix;

/// A journal entry with its lines.
pub type JournalEntry = Document<journal_entries::Model, journal_entry_lines::Model>;

/// Result of reversing an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryReversal {
    /// The reversed entry, now `REVERSED`.
    pub original: JournalEntry,
    /// The mirrored entry.
    pub reversal: JournalEntry,
}

/// Filter for listing journal entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryFilter {
    /// Only entries in this status.
    pub status: Option<JournalEntryStatus>,
    /// Entries dated on or after this day.
    pub date_from: Option<NaiveDate>,
    /// Entries dated on or before this day.
    pub date_to: Option<NaiveDate>,
}

// ============================================================================
// Writer
// ============================================================================

/// Persists journal entries for the coordinator.
#[derive(Debug, Clone, Copy)]
pub struct JournalEntryWriter {
    status: JournalEntryStatus,
    reverses_id: Option<Uuid>,
}

impl Default for JournalEntryWriter {
    fn default() -> Self {
        Self {
            status: JournalEntryStatus::INITIAL,
            reverses_id: None,
        }
    }
}

impl JournalEntryWriter {
    /// Writer for the posted entry that reverses `original_id`.
    #[must_use]
    pub const fn reversing(original_id: Uuid) -> Self {
        Self {
            status: JournalEntryStatus::Posted,
            reverses_id: Some(original_id),
        }
    }
}

#[async_trait]
impl DocumentWriter for JournalEntryWriter {
    type Input = JournalEntryInput;
    type LineInput = JournalLineInput;
    type Prepared = BalanceTotals;
    type Header = journal_entries::Model;
    type Line = journal_entry_lines::Model;

    const KIND: DocumentKind = DocumentKind::JournalEntry;

    fn prepare(&self, input: &JournalEntryInput) -> AppResult<BalanceTotals> {
        Ok(validate_journal_entry(input)?)
    }

    fn lines(input: &JournalEntryInput) -> &[JournalLineInput] {
        &input.lines
    }

    fn number(header: &journal_entries::Model) -> &str {
        &header.number
    }

    async fn highest_existing(&self, txn: &DatabaseTransaction) -> Result<u64, DbErr> {
        scan_max_suffix::<journal_entries::Entity, _>(
            txn,
            journal_entries::Column::Number,
            Self::KIND.series(),
        )
        .await
    }

    async fn insert_header(
        &self,
        txn: &DatabaseTransaction,
        number: &str,
        actor: &Actor,
        input: &JournalEntryInput,
        totals: &BalanceTotals,
    ) -> AppResult<journal_entries::Model> {
        let now = Utc::now().fixed_offset();
        let posted = self.status == JournalEntryStatus::Posted;

        journal_entries::ActiveModel {
            id: Set(new_id()),
            number: Set(number.to_string()),
            entry_date: Set(input.entry_date),
            description: Set(input.description.trim().to_string()),
            reference: Set(input.reference.clone()),
            status: Set(self.status.as_str().to_string()),
            total_debit: Set(totals.total_debit),
            total_credit: Set(totals.total_credit),
            reverses_id: Set(self.reverses_id),
            created_by: Set(actor.id),
            created_at: Set(now),
            posted_by: Set(posted.then_some(actor.id)),
            posted_at: Set(posted.then_some(now)),
            reversed_by: Set(None),
            reversed_at: Set(None),
            reversal_reason: Set(None),
        }
        .insert(txn)
        .await
        .map_err(storage_error)
    }

    async fn insert_line(
        &self,
        txn: &DatabaseTransaction,
        header: &journal_entries::Model,
        line_number: i32,
        line: &JournalLineInput,
    ) -> Result<journal_entry_lines::Model, DbErr> {
        journal_entry_lines::ActiveModel {
            id: Set(new_id()),
            journal_entry_id: Set(header.id),
            line_number: Set(line_number),
            account_code: Set(line.account_code.trim().to_string()),
            debit: Set(line.debit),
            credit: Set(line.credit),
            description: Set(line.description.clone()),
        }
        .insert(txn)
        .await
    }
}

// ============================================================================
// Repository
// ============================================================================

impl DocumentTable for journal_entries::Entity {
    type Lines = journal_entry_lines::Entity;

    const KIND: DocumentKind = DocumentKind::JournalEntry;
    const ID: journal_entries::Column = journal_entries::Column::Id;
    const NUMBER: journal_entries::Column = journal_entries::Column::Number;
    const STATUS: journal_entries::Column = journal_entries::Column::Status;
    const PARENT: journal_entry_lines::Column = journal_entry_lines::Column::JournalEntryId;
    const LINE_NUMBER: journal_entry_lines::Column = journal_entry_lines::Column::LineNumber;

    fn number(header: &journal_entries::Model) -> &str {
        &header.number
    }

    fn status(header: &journal_entries::Model) -> &str {
        &header.status
    }

    fn created_by(header: &journal_entries::Model) -> Uuid {
        header.created_by
    }
}

/// Journal entry repository.
#[derive(Debug, Clone)]
pub struct JournalEntryRepository {
    ctx: LedgerContext,
}

impl JournalEntryRepository {
    /// Creates a new journal entry repository.
    #[must_use]
    pub const fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Lists entry headers, newest first.
    pub async fn list(
        &self,
        filter: &JournalEntryFilter,
        page: PageRequest,
    ) -> ReadOutcome<ListPage<journal_entries::Model>> {
        let request = page.normalized();
        let query = async {
            let mut query = journal_entries::Entity::find();
            if let Some(status) = filter.status {
                query = query.filter(journal_entries::Column::Status.eq(status.as_str()));
            }
            if let Some(date_from) = filter.date_from {
                query = query.filter(journal_entries::Column::EntryDate.gte(date_from));
            }
            if let Some(date_to) = filter.date_to {
                query = query.filter(journal_entries::Column::EntryDate.lte(date_to));
            }

            let paginator = query
                .order_by_desc(journal_entries::Column::EntryDate)
                .order_by_desc(journal_entries::Column::Number)
                .paginate(self.ctx.db(), request.limit());
            let total = paginator.num_items().await.map_err(storage_error)?;
            let items = paginator
                .fetch_page(request.offset() / request.limit())
                .await
                .map_err(storage_error)?;
            Ok(ListPage::new(items, request, total))
        };

        self.ctx
            .reader
            .read("journal entries", query, || ListPage::empty(request))
            .await
    }

    /// Gets an entry with its lines.
    pub async fn get(&self, id: Uuid) -> ReadOutcome<Option<JournalEntry>> {
        self.ctx
            .reader
            .read(
                "journal entry",
                async { load::<journal_entries::Entity, _>(self.ctx.db(), id).await.map(Some) },
                || None,
            )
            .await
    }

    /// Creates a `DRAFT` entry.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `Validation`, or a storage error. Nothing is
    /// persisted on error.
    pub async fn create(&self, actor: &Actor, input: &JournalEntryInput) -> AppResult<JournalEntry> {
        self.ctx
            .policy
            .authorize(actor, Action::CreateJournalEntry, None)?;
        self.ctx
            .coordinator
            .create(&JournalEntryWriter::default(), actor, input)
            .await
    }

    /// Posts a `DRAFT` entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, `NotEligible`, or a storage error.
    pub async fn post(&self, actor: &Actor, id: Uuid) -> AppResult<JournalEntry> {
        self.ctx
            .transition::<journal_entries::Entity, _>(
                actor,
                id,
                JournalEntryTransition::Post,
                vec![
                    (journal_entries::Column::PostedBy, Expr::value(actor.id)),
                    (journal_entries::Column::PostedAt, now()),
                ],
            )
            .await
    }

    /// Reverses a `POSTED` entry.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank reason, `NotFound`, `Forbidden`,
    /// `NotEligible`, or a storage error. Either both entries change or neither.
    pub async fn reverse(
        &self,
        actor: &Actor,
        id: Uuid,
        reason: &str,
    ) -> AppResult<JournalEntryReversal> {
        let transition = JournalEntryTransition::Reverse;
        let reason = WorkflowService::reason(transition, Some(reason))?.unwrap_or_default();
        let entry = find_header::<journal_entries::Entity, _>(self.ctx.db(), id).await?;
        self.ctx
            .authorize_transition::<journal_entries::Entity, _>(actor, &entry, transition)?;

        let txn = self.ctx.db().begin().await.map_err(storage_error)?;
        let result = self.reverse_within(&txn, actor, id, &reason).await;
        let reversal = settle(txn, result).await?;

        info!(
            number = %reversal.original.header.number,
            reversal = %reversal.reversal.header.number,
            "journal entry reversed"
        );
        Ok(reversal)
    }

    async fn reverse_within(
        &self,
        txn: &DatabaseTransaction,
        actor: &Actor,
        id: Uuid,
        reason: &str,
    ) -> AppResult<JournalEntryReversal> {
        guarded_update::<journal_entries::Entity, _, _>(
            txn,
            id,
            JournalEntryTransition::Reverse,
            vec![
                (journal_entries::Column::ReversedBy, Expr::value(actor.id)),
                (journal_entries::Column::ReversedAt, now()),
                (
                    journal_entries::Column::ReversalReason,
                    Expr::value(reason.to_string()),
                ),
            ],
        )
        .await?;

        let original = load::<journal_entries::Entity, _>(txn, id).await?;
        let original_lines: Vec<JournalLineInput> =
            original.lines.iter().map(line_input).collect();
        let input = ReversalService::create_reversing_entry(&ReversalInput {
            original_number: &original.header.number,
            original_lines: &original_lines,
            reversal_date: Utc::now().date_naive(),
            reason,
        });

        let writer = JournalEntryWriter::reversing(id);
        let totals = writer.prepare(&input)?;
        let reversal = self
            .ctx
            .coordinator
            .create_within(txn, &writer, actor, &input, &totals)
            .await?;

        Ok(JournalEntryReversal { original, reversal })
    }
}

fn line_input(line: &journal_entry_lines::Model) -> JournalLineInput {
    JournalLineInput {
        account_code: line.account_code.clone(),
        debit: line.debit,
        credit: line.credit,
        description: line.description.clone(),
    }
}

#[cfg(test)]
#[path = "journal_entry_tests.rs"]
mod tests;
