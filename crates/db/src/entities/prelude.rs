//! Entity re-exports.

pub use super::document_sequences::Entity as DocumentSequences;
pub use super::financial_transaction_lines::Entity as FinancialTransactionLines;
pub use super::financial_transactions::Entity as FinancialTransactions;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_entry_lines::Entity as JournalEntryLines;
pub use super::purchase_order_lines::Entity as PurchaseOrderLines;
pub use super::purchase_orders::Entity as PurchaseOrders;
pub use super::suppliers::Entity as Suppliers;
