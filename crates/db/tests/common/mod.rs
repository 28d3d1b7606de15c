//! Shared setup for database integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

use docledger_core::ledger::{
    FinancialLineInput, FinancialTransactionInput, JournalEntryInput, JournalLineInput,
    PurchaseOrderInput, PurchaseOrderLineInput, SupplierInput, TransactionType,
};
use docledger_core::workflow::{Actor, Role};
use docledger_db::Repositories;
use docledger_db::migration::{Migrator, MigratorTrait};
use docledger_shared::LedgerConfig;

/// In-memory SQLite database with migrations applied.
pub async fn sqlite() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Repositories over a fresh in-memory database.
pub async fn repositories() -> Repositories {
    Repositories::new(sqlite().await, &LedgerConfig::default())
}

pub fn actor(role: Role) -> Actor {
    Actor::new(Uuid::new_v4(), role)
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, day).expect("valid date")
}

pub fn journal_entry(debit: Decimal, credit: Decimal) -> JournalEntryInput {
    JournalEntryInput {
        entry_date: date(1),
        description: "Capital injection".to_string(),
        reference: None,
        lines: vec![
            JournalLineInput {
                account_code: "1000".to_string(),
                debit,
                credit: Decimal::ZERO,
                description: None,
            },
            JournalLineInput {
                account_code: "3000".to_string(),
                debit: Decimal::ZERO,
                credit,
                description: None,
            },
        ],
    }
}

pub fn supplier_input(code: &str) -> SupplierInput {
    SupplierInput {
        code: code.to_string(),
        name: format!("Supplier {code}"),
        contact_name: None,
        phone: None,
        email: None,
        address: None,
    }
}

/// Registers an active supplier and returns its id.
pub async fn supplier(repos: &Repositories, code: &str) -> Uuid {
    repos
        .suppliers
        .create(&actor(Role::Manager), &supplier_input(code))
        .await
        .expect("Failed to create supplier")
        .id
}

pub fn purchase_order(
    supplier_id: Uuid,
    lines: &[(Decimal, Decimal)],
    tax_rate: Option<Decimal>,
) -> PurchaseOrderInput {
    PurchaseOrderInput {
        supplier_id: Some(supplier_id),
        order_date: date(3),
        expected_date: Some(date(10)),
        tax_rate,
        discount: Decimal::ZERO,
        notes: None,
        lines: lines
            .iter()
            .enumerate()
            .map(|(i, (quantity, unit_price))| PurchaseOrderLineInput {
                product_code: Some(format!("SKU-{}", i + 1)),
                description: format!("Item {}", i + 1),
                quantity: *quantity,
                unit_price: *unit_price,
            })
            .collect(),
    }
}

pub fn financial_transaction(amounts: &[Decimal]) -> FinancialTransactionInput {
    FinancialTransactionInput {
        transaction_date: date(5),
        transaction_type: TransactionType::Expense,
        description: "Utilities".to_string(),
        lines: amounts
            .iter()
            .map(|amount| FinancialLineInput {
                account_code: "6200".to_string(),
                amount: *amount,
                description: None,
            })
            .collect(),
    }
}
