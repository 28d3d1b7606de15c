//! Financial transaction repository.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use docledger_core::DocumentKind;
use docledger_core::ledger::{
    FinancialLineInput, FinancialTransactionInput, TransactionType,
    validate_financial_transaction,
};
use docledger_core::workflow::{
    Action, Actor, DocumentStatus, FinancialTransactionStatus, FinancialTransactionTransition,
    WorkflowService,
};
use docledger_shared::types::{ListPage, PageRequest, ReadOutcome};
use docledger_shared::AppResult;

use super::{DocumentTable, LedgerContext, load, now};
use crate::coordinator::{Document, DocumentWriter, new_id};
use crate::entities::{financial_transaction_lines, financial_transactions};
use crate::error::storage_error;
use crate::sequence::scan_max_suffix;

/// A financial transaction with its lines.
pub type FinancialTransaction =
    Document<financial_transactions::Model, financial_transaction_lines::Model>;

/// Filter for listing financial transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTransactionFilter {
    /// Only transactions in this status.
    pub status: Option<FinancialTransactionStatus>,
    /// Only transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Transactions dated on or after this day.
    pub date_from: Option<NaiveDate>,
    /// Transactions dated on or before this day.
    pub date_to: Option<NaiveDate>,
}

/// Persists financial transactions for the coordinator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialTransactionWriter;

#[async_trait]
impl DocumentWriter for FinancialTransactionWriter {
    type Input = FinancialTransactionInput;
    type LineInput = FinancialLineInput;
    type Prepared = Decimal;
    type Header = financial_transactions::Model;
    type Line = financial_transaction_lines::Model;

    const KIND: DocumentKind = DocumentKind::FinancialTransaction;

    fn prepare(&self, input: &FinancialTransactionInput) -> AppResult<Decimal> {
        Ok(validate_financial_transaction(input)?)
    }

    fn lines(input: &FinancialTransactionInput) -> &[FinancialLineInput] {
        &input.lines
    }

    fn number(header: &financial_transactions::Model) -> &str {
        &header.number
    }

    async fn highest_existing(&self, txn: &DatabaseTransaction) -> Result<u64, DbErr> {
        scan_max_suffix::<financial_transactions::Entity, _>(
            txn,
            financial_transactions::Column::Number,
            Self::KIND.series(),
        )
        .await
    }

    async fn insert_header(
        &self,
        txn: &DatabaseTransaction,
        number: &str,
        actor: &Actor,
        input: &FinancialTransactionInput,
        total: &Decimal,
    ) -> AppResult<financial_transactions::Model> {
        financial_transactions::ActiveModel {
            id: Set(new_id()),
            number: Set(number.to_string()),
            transaction_date: Set(input.transaction_date),
            transaction_type: Set(input.transaction_type.as_str().to_string()),
            description: Set(input.description.trim().to_string()),
            status: Set(FinancialTransactionStatus::INITIAL.as_str().to_string()),
            total: Set(*total),
            created_by: Set(actor.id),
            created_at: Set(Utc::now().fixed_offset()),
            approved_by: Set(None),
            approved_at: Set(None),
            rejected_by: Set(None),
            rejected_at: Set(None),
            rejection_reason: Set(None),
        }
        .insert(txn)
        .await
        .map_err(storage_error)
    }

    async fn insert_line(
        &self,
        txn: &DatabaseTransaction,
        header: &financial_transactions::Model,
        line_number: i32,
        line: &FinancialLineInput,
    ) -> Result<financial_transaction_lines::Model, DbErr> {
        financial_transaction_lines::ActiveModel {
            id: Set(new_id()),
            financial_transaction_id: Set(header.id),
            line_number: Set(line_number),
            account_code: Set(line.account_code.trim().to_string()),
            amount: Set(line.amount),
            description: Set(line.description.clone()),
        }
        .insert(txn)
        .await
    }
}

impl DocumentTable for financial_transactions::Entity {
    type Lines = financial_transaction_lines::Entity;

    const KIND: DocumentKind = DocumentKind::FinancialTransaction;
    const ID: financial_transactions::Column = financial_transactions::Column::Id;
    const NUMBER: financial_transactions::Column = financial_transactions::Column::Number;
    const STATUS: financial_transactions::Column = financial_transactions::Column::Status;
    const PARENT: financial_transaction_lines::Column =
        financial_transaction_lines::Column::FinancialTransactionId;
    const LINE_NUMBER: financial_transaction_lines::Column =
        financial_transaction_lines::Column::LineNumber;

    fn number(header: &financial_transactions::Model) -> &str {
        &header.number
    }

    fn status(header: &financial_transactions::Model) -> &str {
        &header.status
    }

    fn created_by(header: &financial_transactions::Model) -> Uuid {
        header.created_by
    }
}

/// Financial transaction repository.
#[derive(Debug, Clone)]
pub struct FinancialTransactionRepository {
    ctx: LedgerContext,
}

impl FinancialTransactionRepository {
    /// Creates a new financial transaction repository.
    #[must_use]
    pub const fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Lists transaction headers, newest first.
    pub async fn list(
        &self,
        filter: &FinancialTransactionFilter,
        page: PageRequest,
    ) -> ReadOutcome<ListPage<financial_transactions::Model>> {
        let request = page.normalized();
        let query = async {
            let mut query = financial_transactions::Entity::find();
            if let Some(status) = filter.status {
                query = query.filter(financial_transactions::Column::Status.eq(status.as_str()));
            }
            if let Some(kind) = filter.transaction_type {
                query = query
                    .filter(financial_transactions::Column::TransactionType.eq(kind.as_str()));
            }
            if let Some(date_from) = filter.date_from {
                query = query.filter(financial_transactions::Column::TransactionDate.gte(date_from));
            }
            if let Some(date_to) = filter.date_to {
                query = query.filter(financial_transactions::Column::TransactionDate.lte(date_to));
            }

            let paginator = query
                .order_by_desc(financial_transactions::Column::TransactionDate)
                .order_by_desc(financial_transactions::Column::Number)
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
            .read("financial transactions", query, || ListPage::empty(request))
            .await
    }

    /// Gets a transaction with its lines.
    pub async fn get(&self, id: Uuid) -> ReadOutcome<Option<FinancialTransaction>> {
        self.ctx
            .reader
            .read(
                "financial transaction",
                async {
                    load::<financial_transactions::Entity, _>(self.ctx.db(), id)
                        .await
                        .map(Some)
                },
                || None,
            )
            .await
    }

    /// Creates a `PENDING` transaction.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `Validation`, or a storage error.
    pub async fn create(
        &self,
        actor: &Actor,
        input: &FinancialTransactionInput,
    ) -> AppResult<FinancialTransaction> {
        self.ctx
            .policy
            .authorize(actor, Action::CreateFinancialTransaction, None)?;
        self.ctx
            .coordinator
            .create(&FinancialTransactionWriter, actor, input)
            .await
    }

    /// Approves a `PENDING` transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, `NotEligible`, or a storage error.
    pub async fn approve(&self, actor: &Actor, id: Uuid) -> AppResult<FinancialTransaction> {
        self.ctx
            .transition::<financial_transactions::Entity, _>(
                actor,
                id,
                FinancialTransactionTransition::Approve,
                vec![
                    (financial_transactions::Column::ApprovedBy, Expr::value(actor.id)),
                    (financial_transactions::Column::ApprovedAt, now()),
                ],
            )
            .await
    }

    /// Rejects a `PENDING` transaction with a reason.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank reason, `NotFound`, `Forbidden`,
    /// `NotEligible`, or a storage error.
    pub async fn reject(
        &self,
        actor: &Actor,
        id: Uuid,
        reason: &str,
    ) -> AppResult<FinancialTransaction> {
        let transition = FinancialTransactionTransition::Reject;
        let reason = WorkflowService::reason(transition, Some(reason))?;
        self.ctx
            .transition::<financial_transactions::Entity, _>(
                actor,
                id,
                transition,
                vec![
                    (financial_transactions::Column::RejectedBy, Expr::value(actor.id)),
                    (financial_transactions::Column::RejectedAt, now()),
                    (
                        financial_transactions::Column::RejectionReason,
                        Expr::value(reason),
                    ),
                ],
            )
            .await
    }
}
