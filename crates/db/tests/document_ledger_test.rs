//! Integration tests for document creation and numbering.
//!
//! Runs the repositories against in-memory SQLite with the real migrations.

mod common;

use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};

use docledger_core::workflow::Role;
use docledger_db::entities::{journal_entries, journal_entry_lines, purchase_orders};
use docledger_shared::types::{PageRequest, ReadOutcome};
use docledger_shared::AppError;

use common::{actor, financial_transaction, journal_entry, purchase_order, repositories, supplier};

// ============================================================================
// Journal entries
// ============================================================================

#[tokio::test]
async fn test_balanced_entry_gets_first_number() {
    let repos = repositories().await;

    let entry = repos
        .journal_entries
        .create(&actor(Role::Accountant), &journal_entry(dec!(100000), dec!(100000)))
        .await
        .expect("balanced entry should be created");

    assert_eq!(entry.header.number, "JE000001");
    assert_eq!(entry.header.status, "DRAFT");
    assert_eq!(entry.header.total_debit, dec!(100000));
    assert_eq!(entry.header.total_credit, dec!(100000));
    assert_eq!(entry.lines.len(), 2);
}

#[tokio::test]
async fn test_unbalanced_entry_persists_nothing() {
    let repos = repositories().await;

    let err = repos
        .journal_entries
        .create(&actor(Role::Accountant), &journal_entry(dec!(100000), dec!(90000)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.detail().contains("not balanced"));
    assert!(err.detail().contains("Difference: 10000"));

    let page = repos
        .journal_entries
        .list(&Default::default(), PageRequest::default())
        .await
        .into_data()
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.pagination.total, 0);
}

#[tokio::test]
async fn test_entry_within_tolerance_is_accepted() {
    let repos = repositories().await;

    let result = repos
        .journal_entries
        .create(&actor(Role::Accountant), &journal_entry(dec!(100.00), dec!(100.01)))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_sequential_numbers_are_monotonic() {
    let repos = repositories().await;
    let accountant = actor(Role::Accountant);

    let mut numbers = Vec::new();
    for _ in 0..5 {
        let entry = repos
            .journal_entries
            .create(&accountant, &journal_entry(dec!(10), dec!(10)))
            .await
            .unwrap();
        numbers.push(entry.header.number);
    }

    assert_eq!(
        numbers,
        ["JE000001", "JE000002", "JE000003", "JE000004", "JE000005"]
    );
}

#[tokio::test]
async fn test_concurrent_creators_get_distinct_numbers() {
    let repos = repositories().await;
    let accountant = actor(Role::Accountant);
    let input = journal_entry(dec!(10), dec!(10));

    let results = join_all((0..8).map(|_| repos.journal_entries.create(&accountant, &input))).await;

    let mut numbers: Vec<String> = results
        .into_iter()
        .map(|r| r.expect("concurrent create failed").header.number)
        .collect();
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 8);
    assert_eq!(numbers.first().map(String::as_str), Some("JE000001"));
    assert_eq!(numbers.last().map(String::as_str), Some("JE000008"));
}

#[tokio::test]
async fn test_series_are_independent() {
    let repos = repositories().await;
    let supplier_id = supplier(&repos, "SUP-1").await;

    let entry = repos
        .journal_entries
        .create(&actor(Role::Accountant), &journal_entry(dec!(5), dec!(5)))
        .await
        .unwrap();
    let order = repos
        .purchase_orders
        .create(
            &actor(Role::Staff),
            &purchase_order(supplier_id, &[(dec!(1), dec!(10))], None),
        )
        .await
        .unwrap();
    let txn = repos
        .financial_transactions
        .create(&actor(Role::Staff), &financial_transaction(&[dec!(75)]))
        .await
        .unwrap();

    assert_eq!(entry.header.number, "JE000001");
    assert_eq!(order.header.number, "PO000001");
    assert_eq!(txn.header.number, "TXN000001");
}

#[tokio::test]
async fn test_get_hydrates_lines_in_order() {
    let repos = repositories().await;
    let created = repos
        .journal_entries
        .create(&actor(Role::Accountant), &journal_entry(dec!(42), dec!(42)))
        .await
        .unwrap();

    let outcome = repos.journal_entries.get(created.header.id).await;
    let ReadOutcome::Fresh(Some(entry)) = outcome else {
        panic!("expected fresh entry, got {outcome:?}");
    };

    assert_eq!(entry.header.id, created.header.id);
    let numbers: Vec<i32> = entry.lines.iter().map(|l| l.line_number).collect();
    assert_eq!(numbers, [1, 2]);
    assert_eq!(entry.lines[0].account_code, "1000");
}

// ============================================================================
// Purchase orders
// ============================================================================

#[tokio::test]
async fn test_purchase_order_totals() {
    let repos = repositories().await;
    let supplier_id = supplier(&repos, "SUP-1").await;

    let order = repos
        .purchase_orders
        .create(
            &actor(Role::Staff),
            &purchase_order(
                supplier_id,
                &[(dec!(10), dec!(5000)), (dec!(3), dec!(20000))],
                Some(dec!(0.11)),
            ),
        )
        .await
        .unwrap();

    assert_eq!(order.header.subtotal, dec!(110000));
    assert_eq!(order.header.tax, dec!(12100));
    assert_eq!(order.header.total, dec!(122100));
    assert_eq!(order.header.status, "DRAFT");
    assert_eq!(order.lines[0].line_total, dec!(50000));
    assert_eq!(order.lines[1].line_total, dec!(60000));
}

#[tokio::test]
async fn test_purchase_order_uses_default_tax_rate() {
    let repos = repositories().await;
    let supplier_id = supplier(&repos, "SUP-1").await;

    let order = repos
        .purchase_orders
        .create(
            &actor(Role::Staff),
            &purchase_order(supplier_id, &[(dec!(2), dec!(50))], None),
        )
        .await
        .unwrap();

    assert_eq!(order.header.tax_rate, dec!(0.11));
    assert_eq!(order.header.total, dec!(111));
}

#[tokio::test]
async fn test_purchase_order_amounts_must_fit_money_columns() {
    let repos = repositories().await;
    let supplier_id = supplier(&repos, "SUP-1").await;
    let staff = actor(Role::Staff);

    // Each line total would round to 0.0000 while the subtotal rounds to 0.0001.
    let err = repos
        .purchase_orders
        .create(
            &staff,
            &purchase_order(
                supplier_id,
                &[(dec!(1), dec!(0.00004)), (dec!(1), dec!(0.00004))],
                Some(Decimal::ZERO),
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.detail().contains("more than 4 decimal places"), "{err}");

    let err = repos
        .purchase_orders
        .create(
            &staff,
            &purchase_order(supplier_id, &[(Decimal::MAX, dec!(2))], None),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let order = repos
        .purchase_orders
        .create(
            &staff,
            &purchase_order(supplier_id, &[(dec!(1), dec!(0.0001))], Some(Decimal::ZERO)),
        )
        .await
        .unwrap();
    assert_eq!(order.header.number, "PO000001");
    assert_eq!(order.header.subtotal, order.lines[0].line_total);
}

#[tokio::test]
async fn test_purchase_order_unknown_supplier_rolls_back() {
    let repos = repositories().await;

    let err = repos
        .purchase_orders
        .create(
            &actor(Role::Staff),
            &purchase_order(uuid::Uuid::new_v4(), &[(dec!(1), dec!(1))], None),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // The failed attempt did not consume PO000001.
    let supplier_id = supplier(&repos, "SUP-1").await;
    let order = repos
        .purchase_orders
        .create(
            &actor(Role::Staff),
            &purchase_order(supplier_id, &[(dec!(1), dec!(1))], None),
        )
        .await
        .unwrap();
    assert_eq!(order.header.number, "PO000001");
}

#[tokio::test]
async fn test_purchase_order_inactive_supplier() {
    let repos = repositories().await;
    let supplier_id = supplier(&repos, "SUP-1").await;
    repos
        .suppliers
        .set_active(&actor(Role::Manager), supplier_id, false)
        .await
        .unwrap();

    let err = repos
        .purchase_orders
        .create(
            &actor(Role::Staff),
            &purchase_order(supplier_id, &[(dec!(1), dec!(1))], None),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(order_count(&repos).await, 0);
}

async fn order_count(repos: &docledger_db::Repositories) -> u64 {
    repos
        .purchase_orders
        .list(&Default::default(), PageRequest::default())
        .await
        .into_data()
        .unwrap()
        .pagination
        .total
}

// ============================================================================
// Financial transactions and suppliers
// ============================================================================

#[tokio::test]
async fn test_financial_transaction_total_is_derived() {
    let repos = repositories().await;

    let txn = repos
        .financial_transactions
        .create(
            &actor(Role::Staff),
            &financial_transaction(&[dec!(120.25), dec!(79.75)]),
        )
        .await
        .unwrap();

    assert_eq!(txn.header.total, dec!(200));
    assert_eq!(txn.header.status, "PENDING");
    assert_eq!(txn.header.transaction_type, "expense");
}

#[tokio::test]
async fn test_financial_transaction_rejects_non_positive_amount() {
    let repos = repositories().await;

    let err = repos
        .financial_transactions
        .create(&actor(Role::Staff), &financial_transaction(&[Decimal::ZERO]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_duplicate_supplier_code_is_validation() {
    let repos = repositories().await;
    supplier(&repos, "SUP-1").await;

    let err = repos
        .suppliers
        .create(&actor(Role::Manager), &common::supplier_input("SUP-1"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.detail().contains("SUP-1"));
}

#[tokio::test]
async fn test_rows_match_returned_document() {
    let db = Arc::new(common::sqlite().await);
    let repos = docledger_db::Repositories::new(Arc::clone(&db), &Default::default());

    repos
        .journal_entries
        .create(&actor(Role::Accountant), &journal_entry(dec!(1), dec!(1)))
        .await
        .unwrap();

    assert_eq!(journal_entries::Entity::find().count(db.as_ref()).await.unwrap(), 1);
    assert_eq!(journal_entry_lines::Entity::find().count(db.as_ref()).await.unwrap(), 2);
    assert_eq!(purchase_orders::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}
