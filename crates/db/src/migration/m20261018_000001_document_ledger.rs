//! Document ledger schema.
//!
//! Creates suppliers, the per-series counter table, and the three document
//! kinds with their line tables. Lines cascade with their header.

use sea_orm::DbBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Suppliers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Suppliers::Code).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Suppliers::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Suppliers::ContactName).string_len(200))
                    .col(ColumnDef::new(Suppliers::Phone).string_len(50))
                    .col(ColumnDef::new(Suppliers::Email).string_len(200))
                    .col(ColumnDef::new(Suppliers::Address).text())
                    .col(ColumnDef::new(Suppliers::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Suppliers::CreatedBy).uuid().not_null())
                    .col(timestamp(Suppliers::CreatedAt))
                    .col(timestamp(Suppliers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DocumentSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentSequences::Series)
                            .string_len(16)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DocumentSequences::LastValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp(DocumentSequences::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // Journal entries
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalEntries::Id).uuid().not_null().primary_key())
                    .col(number(JournalEntries::Number))
                    .col(ColumnDef::new(JournalEntries::EntryDate).date().not_null())
                    .col(ColumnDef::new(JournalEntries::Description).text().not_null())
                    .col(ColumnDef::new(JournalEntries::Reference).string_len(100))
                    .col(status(JournalEntries::Status))
                    .col(money(backend, JournalEntries::TotalDebit))
                    .col(money(backend, JournalEntries::TotalCredit))
                    .col(ColumnDef::new(JournalEntries::ReversesId).uuid())
                    .col(ColumnDef::new(JournalEntries::CreatedBy).uuid().not_null())
                    .col(timestamp(JournalEntries::CreatedAt))
                    .col(ColumnDef::new(JournalEntries::PostedBy).uuid())
                    .col(ColumnDef::new(JournalEntries::PostedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(JournalEntries::ReversedBy).uuid())
                    .col(ColumnDef::new(JournalEntries::ReversedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(JournalEntries::ReversalReason).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntryLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalEntryLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalEntryLines::JournalEntryId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntryLines::LineNumber).integer().not_null())
                    .col(ColumnDef::new(JournalEntryLines::AccountCode).string_len(50).not_null())
                    .col(money(backend, JournalEntryLines::Debit))
                    .col(money(backend, JournalEntryLines::Credit))
                    .col(ColumnDef::new(JournalEntryLines::Description).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entry_lines_entry")
                            .from(JournalEntryLines::Table, JournalEntryLines::JournalEntryId)
                            .to(JournalEntries::Table, JournalEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // Purchase orders
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PurchaseOrders::Id).uuid().not_null().primary_key())
                    .col(number(PurchaseOrders::Number))
                    .col(ColumnDef::new(PurchaseOrders::SupplierId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrders::OrderDate).date().not_null())
                    .col(ColumnDef::new(PurchaseOrders::ExpectedDate).date())
                    .col(status(PurchaseOrders::Status))
                    .col(rate(backend, PurchaseOrders::TaxRate))
                    .col(money(backend, PurchaseOrders::Subtotal))
                    .col(money(backend, PurchaseOrders::Tax))
                    .col(money(backend, PurchaseOrders::Discount))
                    .col(money(backend, PurchaseOrders::Total))
                    .col(ColumnDef::new(PurchaseOrders::Notes).text())
                    .col(ColumnDef::new(PurchaseOrders::CreatedBy).uuid().not_null())
                    .col(timestamp(PurchaseOrders::CreatedAt))
                    .col(ColumnDef::new(PurchaseOrders::SubmittedBy).uuid())
                    .col(ColumnDef::new(PurchaseOrders::SubmittedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PurchaseOrders::ApprovedBy).uuid())
                    .col(ColumnDef::new(PurchaseOrders::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PurchaseOrders::ReceivedBy).uuid())
                    .col(ColumnDef::new(PurchaseOrders::ReceivedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PurchaseOrders::CancelledBy).uuid())
                    .col(ColumnDef::new(PurchaseOrders::CancelledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PurchaseOrders::CancellationReason).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_orders_supplier")
                            .from(PurchaseOrders::Table, PurchaseOrders::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrderLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PurchaseOrderLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PurchaseOrderLines::PurchaseOrderId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrderLines::LineNumber).integer().not_null())
                    .col(ColumnDef::new(PurchaseOrderLines::ProductCode).string_len(50))
                    .col(ColumnDef::new(PurchaseOrderLines::Description).text().not_null())
                    .col(money(backend, PurchaseOrderLines::Quantity))
                    .col(money(backend, PurchaseOrderLines::UnitPrice))
                    .col(money(backend, PurchaseOrderLines::LineTotal))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_lines_order")
                            .from(PurchaseOrderLines::Table, PurchaseOrderLines::PurchaseOrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // Financial transactions
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(FinancialTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinancialTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(number(FinancialTransactions::Number))
                    .col(ColumnDef::new(FinancialTransactions::TransactionDate).date().not_null())
                    .col(
                        ColumnDef::new(FinancialTransactions::TransactionType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialTransactions::Description).text().not_null())
                    .col(status(FinancialTransactions::Status))
                    .col(money(backend, FinancialTransactions::Total))
                    .col(ColumnDef::new(FinancialTransactions::CreatedBy).uuid().not_null())
                    .col(timestamp(FinancialTransactions::CreatedAt))
                    .col(ColumnDef::new(FinancialTransactions::ApprovedBy).uuid())
                    .col(
                        ColumnDef::new(FinancialTransactions::ApprovedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(FinancialTransactions::RejectedBy).uuid())
                    .col(
                        ColumnDef::new(FinancialTransactions::RejectedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(FinancialTransactions::RejectionReason).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FinancialTransactionLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinancialTransactionLines::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FinancialTransactionLines::FinancialTransactionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialTransactionLines::LineNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialTransactionLines::AccountCode)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(money(backend, FinancialTransactionLines::Amount))
                    .col(ColumnDef::new(FinancialTransactionLines::Description).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_financial_transaction_lines_transaction")
                            .from(
                                FinancialTransactionLines::Table,
                                FinancialTransactionLines::FinancialTransactionId,
                            )
                            .to(FinancialTransactions::Table, FinancialTransactions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // Indexes
        // ====================================================================
        for index in [
            line_index(
                "idx_journal_entry_lines_order",
                JournalEntryLines::Table,
                JournalEntryLines::JournalEntryId,
                JournalEntryLines::LineNumber,
            ),
            line_index(
                "idx_purchase_order_lines_order",
                PurchaseOrderLines::Table,
                PurchaseOrderLines::PurchaseOrderId,
                PurchaseOrderLines::LineNumber,
            ),
            line_index(
                "idx_financial_transaction_lines_order",
                FinancialTransactionLines::Table,
                FinancialTransactionLines::FinancialTransactionId,
                FinancialTransactionLines::LineNumber,
            ),
        ] {
            manager.create_index(index).await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_status_date")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::Status)
                    .col(JournalEntries::EntryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_orders_supplier")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::SupplierId)
                    .col(PurchaseOrders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_financial_transactions_status")
                    .table(FinancialTransactions::Table)
                    .col(FinancialTransactions::Status)
                    .col(FinancialTransactions::TransactionType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            FinancialTransactionLines::Table.into_table_ref(),
            FinancialTransactions::Table.into_table_ref(),
            PurchaseOrderLines::Table.into_table_ref(),
            PurchaseOrders::Table.into_table_ref(),
            JournalEntryLines::Table.into_table_ref(),
            JournalEntries::Table.into_table_ref(),
            DocumentSequences::Table.into_table_ref(),
            Suppliers::Table.into_table_ref(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

// ============================================================================
// Column helpers
// ============================================================================

/// Money column. SQLite keeps it as REAL so values read back as floating point.
fn money<T: IntoIden>(backend: DbBackend, name: T) -> ColumnDef {
    let mut def = ColumnDef::new(name);
    if backend == DbBackend::Sqlite {
        def.double();
    } else {
        def.decimal_len(20, 4);
    }
    def.not_null().default(0);
    def
}

fn rate<T: IntoIden>(backend: DbBackend, name: T) -> ColumnDef {
    let mut def = ColumnDef::new(name);
    if backend == DbBackend::Sqlite {
        def.double();
    } else {
        def.decimal_len(8, 4);
    }
    def.not_null().default(0);
    def
}

fn number<T: IntoIden>(name: T) -> ColumnDef {
    let mut def = ColumnDef::new(name);
    def.string_len(32).not_null().unique_key();
    def
}

fn status<T: IntoIden>(name: T) -> ColumnDef {
    let mut def = ColumnDef::new(name);
    def.string_len(20).not_null();
    def
}

fn timestamp<T: IntoIden>(name: T) -> ColumnDef {
    let mut def = ColumnDef::new(name);
    def.timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp());
    def
}

fn line_index<T, P, L>(name: &str, table: T, parent: P, line: L) -> IndexCreateStatement
where
    T: IntoIden + 'static,
    P: IntoIden + 'static,
    L: IntoIden + 'static,
{
    Index::create()
        .name(name)
        .table(table)
        .col(parent)
        .col(line)
        .unique()
        .to_owned()
}

// ============================================================================
// Identifiers
// ============================================================================

#[derive(DeriveIden)]
enum Suppliers {
    Table,
    Id,
    Code,
    Name,
    ContactName,
    Phone,
    Email,
    Address,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DocumentSequences {
    Table,
    Series,
    LastValue,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    Number,
    EntryDate,
    Description,
    Reference,
    Status,
    TotalDebit,
    TotalCredit,
    ReversesId,
    CreatedBy,
    CreatedAt,
    PostedBy,
    PostedAt,
    ReversedBy,
    ReversedAt,
    ReversalReason,
}

#[derive(DeriveIden)]
enum JournalEntryLines {
    Table,
    Id,
    JournalEntryId,
    LineNumber,
    AccountCode,
    Debit,
    Credit,
    Description,
}

#[derive(DeriveIden)]
enum PurchaseOrders {
    Table,
    Id,
    Number,
    SupplierId,
    OrderDate,
    ExpectedDate,
    Status,
    TaxRate,
    Subtotal,
    Tax,
    Discount,
    Total,
    Notes,
    CreatedBy,
    CreatedAt,
    SubmittedBy,
    SubmittedAt,
    ApprovedBy,
    ApprovedAt,
    ReceivedBy,
    ReceivedAt,
    CancelledBy,
    CancelledAt,
    CancellationReason,
}

#[derive(DeriveIden)]
enum PurchaseOrderLines {
    Table,
    Id,
    PurchaseOrderId,
    LineNumber,
    ProductCode,
    Description,
    Quantity,
    UnitPrice,
    LineTotal,
}

#[derive(DeriveIden)]
enum FinancialTransactions {
    Table,
    Id,
    Number,
    TransactionDate,
    TransactionType,
    Description,
    Status,
    Total,
    CreatedBy,
    CreatedAt,
    ApprovedBy,
    ApprovedAt,
    RejectedBy,
    RejectedAt,
    RejectionReason,
}

#[derive(DeriveIden)]
enum FinancialTransactionLines {
    Table,
    Id,
    FinancialTransactionId,
    LineNumber,
    AccountCode,
    Amount,
    Description,
}
