//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Reads go through the [`ResilientReader`] and return `ReadOutcome`; writes
//! return `AppResult` and never fall back.

pub mod financial_transaction;
pub mod journal_entry;
pub mod purchase_order;
pub mod supplier;

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::info;
use uuid::Uuid;

use docledger_core::DocumentKind;
use docledger_core::workflow::{Actor, DocumentStatus, Policy, Transition, WorkflowService};
use docledger_shared::{AppError, AppResult, LedgerConfig};

use crate::coordinator::{Document, LedgerCoordinator};
use crate::error::storage_error;
use crate::resilient::ResilientReader;
use crate::sequence::SequenceGenerator;

pub use financial_transaction::{
    FinancialTransaction, FinancialTransactionFilter, FinancialTransactionRepository,
    FinancialTransactionWriter,
};
pub use journal_entry::{
    JournalEntry, JournalEntryFilter, JournalEntryRepository, JournalEntryReversal,
    JournalEntryWriter,
};
pub use purchase_order::{
    PurchaseOrder, PurchaseOrderFilter, PurchaseOrderRepository, PurchaseOrderWriter,
};
pub use supplier::{SupplierFilter, SupplierRepository};

/// Shared handles every repository works with.
#[derive(Debug, Clone)]
pub struct LedgerContext {
    db: Arc<DatabaseConnection>,
    reader: ResilientReader,
    coordinator: LedgerCoordinator,
    policy: Arc<Policy>,
    default_tax_rate: Decimal,
}

impl LedgerContext {
    /// Builds the context from the pool, ledger settings, and policy table.
    #[must_use]
    pub fn new(
        db: impl Into<Arc<DatabaseConnection>>,
        config: &LedgerConfig,
        policy: Policy,
    ) -> Self {
        let db = db.into();
        let sequences = SequenceGenerator::new(config.number_width);
        Self {
            coordinator: LedgerCoordinator::new(Arc::clone(&db), sequences),
            reader: ResilientReader::new(config.read_deadline()),
            policy: Arc::new(policy),
            default_tax_rate: config.default_tax_rate,
            db,
        }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Authorizes `transition` on a loaded header and checks its status.
    fn authorize_transition<D, T>(
        &self,
        actor: &Actor,
        header: &D::Model,
        transition: T,
    ) -> AppResult<()>
    where
        D: DocumentTable,
        T: Transition,
    {
        self.policy
            .authorize(actor, transition.action(), Some(D::created_by(header)))?;
        if let Some(status) = <T::Status as DocumentStatus>::parse(D::status(header)) {
            WorkflowService::check(transition, D::number(header), status)?;
        }
        Ok(())
    }

    /// Runs a guarded status change outside any caller transaction and
    /// returns the reloaded document.
    async fn transition<D, T>(
        &self,
        actor: &Actor,
        id: Uuid,
        transition: T,
        stamps: Vec<(D::Column, SimpleExpr)>,
    ) -> AppResult<StoredDocument<D>>
    where
        D: DocumentTable,
        T: Transition,
    {
        let header = find_header::<D, _>(self.db(), id).await?;
        self.authorize_transition::<D, T>(actor, &header, transition)?;
        guarded_update::<D, T, _>(self.db(), id, transition, stamps).await?;

        info!(
            number = D::number(&header),
            action = transition.verb(),
            status = %transition.to_status(),
            "{} transitioned",
            D::KIND
        );
        load::<D, _>(self.db(), id).await
    }
}

/// All document repositories over one pool.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Journal entries.
    pub journal_entries: JournalEntryRepository,
    /// Purchase orders.
    pub purchase_orders: PurchaseOrderRepository,
    /// Financial transactions.
    pub financial_transactions: FinancialTransactionRepository,
    /// Suppliers.
    pub suppliers: SupplierRepository,
}

impl Repositories {
    /// Creates every repository with the default policy table.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>, config: &LedgerConfig) -> Self {
        Self::with_policy(db, config, Policy::default())
    }

    /// Creates every repository with an explicit policy table.
    #[must_use]
    pub fn with_policy(
        db: impl Into<Arc<DatabaseConnection>>,
        config: &LedgerConfig,
        policy: Policy,
    ) -> Self {
        let ctx = LedgerContext::new(db, config, policy);
        Self {
            journal_entries: JournalEntryRepository::new(ctx.clone()),
            purchase_orders: PurchaseOrderRepository::new(ctx.clone()),
            financial_transactions: FinancialTransactionRepository::new(ctx.clone()),
            suppliers: SupplierRepository::new(ctx),
        }
    }
}

// ============================================================================
// Document tables
// ============================================================================

/// A header table whose rows own numbered lines and carry a status.
pub(crate) trait DocumentTable: EntityTrait {
    /// Line table.
    type Lines: EntityTrait;

    /// Kind of document stored.
    const KIND: DocumentKind;
    /// Primary key column.
    const ID: Self::Column;
    /// Document number column.
    const NUMBER: Self::Column;
    /// Status column.
    const STATUS: Self::Column;
    /// Line column referencing the header.
    const PARENT: <Self::Lines as EntityTrait>::Column;
    /// Line position column.
    const LINE_NUMBER: <Self::Lines as EntityTrait>::Column;

    fn number(header: &Self::Model) -> &str;

    fn status(header: &Self::Model) -> &str;

    fn created_by(header: &Self::Model) -> Uuid;
}

/// A stored header together with its lines.
pub(crate) type StoredDocument<D> =
    Document<<D as EntityTrait>::Model, <<D as DocumentTable>::Lines as EntityTrait>::Model>;

/// Value for a `*_at` column stamped by a transition.
fn now() -> SimpleExpr {
    Expr::value(Utc::now().fixed_offset())
}

async fn find_header<D, C>(conn: &C, id: Uuid) -> AppResult<D::Model>
where
    D: DocumentTable,
    C: ConnectionTrait,
{
    D::find()
        .filter(D::ID.eq(id))
        .one(conn)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| not_found(D::KIND, id))
}

async fn load<D, C>(conn: &C, id: Uuid) -> AppResult<StoredDocument<D>>
where
    D: DocumentTable,
    C: ConnectionTrait,
{
    let header = find_header::<D, C>(conn, id).await?;
    let lines = <D::Lines as EntityTrait>::find()
        .filter(D::PARENT.eq(id))
        .order_by_asc(D::LINE_NUMBER)
        .all(conn)
        .await
        .map_err(storage_error)?;
    Ok(Document { header, lines })
}

/// Reads `(number, status)` of a header, if it still exists.
async fn current<D, C>(conn: &C, id: Uuid) -> Result<Option<(String, String)>, DbErr>
where
    D: DocumentTable,
    C: ConnectionTrait,
{
    D::find()
        .select_only()
        .column(D::NUMBER)
        .column(D::STATUS)
        .filter(D::ID.eq(id))
        .into_tuple()
        .one(conn)
        .await
}

// ============================================================================
// Guarded transitions
// ============================================================================

/// Sets the target status and `stamps` only where the stored status is still
/// one `transition` may start from.
async fn guarded_update<D, T, C>(
    conn: &C,
    id: Uuid,
    transition: T,
    stamps: Vec<(D::Column, SimpleExpr)>,
) -> AppResult<()>
where
    D: DocumentTable,
    T: Transition,
    C: ConnectionTrait,
{
    let mut update =
        D::update_many().col_expr(D::STATUS, Expr::value(transition.to_status().as_str()));
    for (column, value) in stamps {
        update = update.col_expr(column, value);
    }
    let result = update
        .filter(D::ID.eq(id))
        .filter(D::STATUS.is_in(start_statuses(transition)))
        .exec(conn)
        .await
        .map_err(storage_error)?;
    resolve_transition(transition, id, result.rows_affected, current::<D, C>(conn, id)).await
}

/// Persisted values of the statuses `transition` may start from.
fn start_statuses<T: Transition>(transition: T) -> Vec<&'static str> {
    transition
        .from_statuses()
        .iter()
        .map(|status| status.as_str())
        .collect()
}

/// Interprets the affected-row count of a conditional status update.
///
/// Zero rows means either the document is gone or another status won; `current`
/// re-reads `(number, status)` to tell the two apart and is only awaited then.
async fn resolve_transition<T, F>(
    transition: T,
    id: Uuid,
    rows_affected: u64,
    current: F,
) -> AppResult<()>
where
    T: Transition,
    F: Future<Output = Result<Option<(String, String)>, DbErr>>,
{
    if rows_affected > 0 {
        return Ok(());
    }
    match current.await.map_err(storage_error)? {
        None => Err(not_found(T::KIND, id)),
        Some((number, status)) => {
            Err(WorkflowService::not_eligible(transition, &number, &status).into())
        }
    }
}

fn not_found(kind: DocumentKind, id: Uuid) -> AppError {
    AppError::NotFound(format!("{kind} {id} not found"))
}
