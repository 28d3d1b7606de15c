//! Purchase order repository.

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
    DocumentTotals, PurchaseOrderInput, PurchaseOrderLineInput, validate_purchase_order,
};
use docledger_core::workflow::{
    Action, Actor, DocumentStatus, PurchaseOrderStatus, PurchaseOrderTransition, WorkflowService,
};
use docledger_shared::types::{ListPage, PageRequest, ReadOutcome};
use docledger_shared::{AppError, AppResult};

use super::{DocumentTable, LedgerContext, load, now};
use crate::coordinator::{Document, DocumentWriter, new_id};
use crate::entities::{purchase_order_lines, purchase_orders, suppliers};
use crate::error::storage_error;
use crate::sequence::scan_max_suffix;

/// A purchase order with its lines.
pub type PurchaseOrder = Document<purchase_orders::Model, purchase_order_lines::Model>;

/// Filter for listing purchase orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderFilter {
    /// Only orders in this status.
    pub status: Option<PurchaseOrderStatus>,
    /// Only orders placed with this supplier.
    pub supplier_id: Option<Uuid>,
    /// Orders dated on or after this day.
    pub date_from: Option<NaiveDate>,
    /// Orders dated on or before this day.
    pub date_to: Option<NaiveDate>,
}

/// Persists purchase orders for the coordinator.
#[derive(Debug, Clone, Copy)]
pub struct PurchaseOrderWriter {
    default_tax_rate: Decimal,
}

impl PurchaseOrderWriter {
    /// Creates a writer applying `default_tax_rate` where the input has none.
    #[must_use]
    pub const fn new(default_tax_rate: Decimal) -> Self {
        Self { default_tax_rate }
    }
}

#[async_trait]
impl DocumentWriter for PurchaseOrderWriter {
    type Input = PurchaseOrderInput;
    type LineInput = PurchaseOrderLineInput;
    type Prepared = DocumentTotals;
    type Header = purchase_orders::Model;
    type Line = purchase_order_lines::Model;

    const KIND: DocumentKind = DocumentKind::PurchaseOrder;

    fn prepare(&self, input: &PurchaseOrderInput) -> AppResult<DocumentTotals> {
        Ok(validate_purchase_order(input, self.default_tax_rate)?)
    }

    fn lines(input: &PurchaseOrderInput) -> &[PurchaseOrderLineInput] {
        &input.lines
    }

    fn number(header: &purchase_orders::Model) -> &str {
        &header.number
    }

    async fn highest_existing(&self, txn: &DatabaseTransaction) -> Result<u64, DbErr> {
        scan_max_suffix::<purchase_orders::Entity, _>(
            txn,
            purchase_orders::Column::Number,
            Self::KIND.series(),
        )
        .await
    }

    async fn insert_header(
        &self,
        txn: &DatabaseTransaction,
        number: &str,
        actor: &Actor,
        input: &PurchaseOrderInput,
        totals: &DocumentTotals,
    ) -> AppResult<purchase_orders::Model> {
        let supplier_id = input
            .supplier_id
            .ok_or_else(|| AppError::Validation("supplierId is required".to_string()))?;
        let supplier = suppliers::Entity::find_by_id(supplier_id)
            .one(txn)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| AppError::NotFound(format!("supplier {supplier_id} not found")))?;
        if !supplier.is_active {
            return Err(AppError::Validation(format!(
                "supplier {} is inactive",
                supplier.code
            )));
        }

        purchase_orders::ActiveModel {
            id: Set(new_id()),
            number: Set(number.to_string()),
            supplier_id: Set(supplier_id),
            order_date: Set(input.order_date),
            expected_date: Set(input.expected_date),
            status: Set(PurchaseOrderStatus::INITIAL.as_str().to_string()),
            tax_rate: Set(totals.tax_rate),
            subtotal: Set(totals.subtotal),
            tax: Set(totals.tax),
            discount: Set(totals.discount),
            total: Set(totals.total),
            notes: Set(input.notes.clone()),
            created_by: Set(actor.id),
            created_at: Set(Utc::now().fixed_offset()),
            submitted_by: Set(None),
            submitted_at: Set(None),
            approved_by: Set(None),
            approved_at: Set(None),
            received_by: Set(None),
            received_at: Set(None),
            cancelled_by: Set(None),
            cancelled_at: Set(None),
            cancellation_reason: Set(None),
        }
        .insert(txn)
        .await
        .map_err(storage_error)
    }

    async fn insert_line(
        &self,
        txn: &DatabaseTransaction,
        header: &purchase_orders::Model,
        line_number: i32,
        line: &PurchaseOrderLineInput,
    ) -> Result<purchase_order_lines::Model, DbErr> {
        let line_total = line
            .line_total()
            .ok_or_else(|| DbErr::Custom(format!("line {line_number} total overflows")))?;
        purchase_order_lines::ActiveModel {
            id: Set(new_id()),
            purchase_order_id: Set(header.id),
            line_number: Set(line_number),
            product_code: Set(line.product_code.clone()),
            description: Set(line.description.trim().to_string()),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            line_total: Set(line_total),
        }
        .insert(txn)
        .await
    }
}

impl DocumentTable for purchase_orders::Entity {
    type Lines = purchase_order_lines::Entity;

    const KIND: DocumentKind = DocumentKind::PurchaseOrder;
    const ID: purchase_orders::Column = purchase_orders::Column::Id;
    const NUMBER: purchase_orders::Column = purchase_orders::Column::Number;
    const STATUS: purchase_orders::Column = purchase_orders::Column::Status;
    const PARENT: purchase_order_lines::Column = purchase_order_lines::Column::PurchaseOrderId;
    const LINE_NUMBER: purchase_order_lines::Column = purchase_order_lines::Column::LineNumber;

    fn number(header: &purchase_orders::Model) -> &str {
        &header.number
    }

    fn status(header: &purchase_orders::Model) -> &str {
        &header.status
    }

    fn created_by(header: &purchase_orders::Model) -> Uuid {
        header.created_by
    }
}

/// Purchase order repository.
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    ctx: LedgerContext,
}

impl PurchaseOrderRepository {
    /// Creates a new purchase order repository.
    #[must_use]
    pub const fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Lists order headers, newest first.
    pub async fn list(
        &self,
        filter: &PurchaseOrderFilter,
        page: PageRequest,
    ) -> ReadOutcome<ListPage<purchase_orders::Model>> {
        let request = page.normalized();
        let query = async {
            let mut query = purchase_orders::Entity::find();
            if let Some(status) = filter.status {
                query = query.filter(purchase_orders::Column::Status.eq(status.as_str()));
            }
            if let Some(supplier_id) = filter.supplier_id {
                query = query.filter(purchase_orders::Column::SupplierId.eq(supplier_id));
            }
            if let Some(date_from) = filter.date_from {
                query = query.filter(purchase_orders::Column::OrderDate.gte(date_from));
            }
            if let Some(date_to) = filter.date_to {
                query = query.filter(purchase_orders::Column::OrderDate.lte(date_to));
            }

            let paginator = query
                .order_by_desc(purchase_orders::Column::OrderDate)
                .order_by_desc(purchase_orders::Column::Number)
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
            .read("purchase orders", query, || ListPage::empty(request))
            .await
    }

    /// Gets an order with its lines.
    pub async fn get(&self, id: Uuid) -> ReadOutcome<Option<PurchaseOrder>> {
        self.ctx
            .reader
            .read(
                "purchase order",
                async { load::<purchase_orders::Entity, _>(self.ctx.db(), id).await.map(Some) },
                || None,
            )
            .await
    }

    /// Creates a `DRAFT` order with computed totals.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `Validation` (including an inactive supplier),
    /// `NotFound` for an unknown supplier, or a storage error.
    pub async fn create(
        &self,
        actor: &Actor,
        input: &PurchaseOrderInput,
    ) -> AppResult<PurchaseOrder> {
        self.ctx
            .policy
            .authorize(actor, Action::CreatePurchaseOrder, None)?;
        self.ctx
            .coordinator
            .create(&PurchaseOrderWriter::new(self.ctx.default_tax_rate), actor, input)
            .await
    }

    /// Submits a `DRAFT` order for approval.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, `NotEligible`, or a storage error.
    pub async fn submit(&self, actor: &Actor, id: Uuid) -> AppResult<PurchaseOrder> {
        self.ctx
            .transition::<purchase_orders::Entity, _>(
                actor,
                id,
                PurchaseOrderTransition::Submit,
                vec![
                    (purchase_orders::Column::SubmittedBy, Expr::value(actor.id)),
                    (purchase_orders::Column::SubmittedAt, now()),
                ],
            )
            .await
    }

    /// Approves a `PENDING` order.
    ///
    /// The approver must not be the order's creator.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, `NotEligible`, or a storage error.
    pub async fn approve(&self, actor: &Actor, id: Uuid) -> AppResult<PurchaseOrder> {
        self.ctx
            .transition::<purchase_orders::Entity, _>(
                actor,
                id,
                PurchaseOrderTransition::Approve,
                vec![
                    (purchase_orders::Column::ApprovedBy, Expr::value(actor.id)),
                    (purchase_orders::Column::ApprovedAt, now()),
                ],
            )
            .await
    }

    /// Marks an `APPROVED` order as received.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, `NotEligible`, or a storage error.
    pub async fn receive(&self, actor: &Actor, id: Uuid) -> AppResult<PurchaseOrder> {
        self.ctx
            .transition::<purchase_orders::Entity, _>(
                actor,
                id,
                PurchaseOrderTransition::Receive,
                vec![
                    (purchase_orders::Column::ReceivedBy, Expr::value(actor.id)),
                    (purchase_orders::Column::ReceivedAt, now()),
                ],
            )
            .await
    }

    /// Cancels a `DRAFT` or `PENDING` order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, `NotEligible`, or a storage error.
    pub async fn cancel(
        &self,
        actor: &Actor,
        id: Uuid,
        reason: Option<&str>,
    ) -> AppResult<PurchaseOrder> {
        let transition = PurchaseOrderTransition::Cancel;
        let reason = WorkflowService::reason(transition, reason)?;
        self.ctx
            .transition::<purchase_orders::Entity, _>(
                actor,
                id,
                transition,
                vec![
                    (purchase_orders::Column::CancelledBy, Expr::value(actor.id)),
                    (purchase_orders::Column::CancelledAt, now()),
                    (
                        purchase_orders::Column::CancellationReason,
                        Expr::value(reason),
                    ),
                ],
            )
            .await
    }
}
