//! `SeaORM` entity definitions.

pub mod prelude;

pub mod document_sequences;
pub mod financial_transaction_lines;
pub mod financial_transactions;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod purchase_order_lines;
pub mod purchase_orders;
pub mod suppliers;
