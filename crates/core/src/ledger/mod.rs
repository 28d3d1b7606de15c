//! Document inputs and invariant validation.
//!
//! - `types` - Caller-supplied inputs per document kind
//! - `validation` - Balance, totals, and required-field rules

pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use types::{
    FinancialLineInput, FinancialTransactionInput, JournalEntryInput, JournalLineInput,
    PurchaseOrderInput, PurchaseOrderLineInput, SupplierInput, TransactionType,
};
pub use validation::{
    check_amount, compute_totals, transaction_total, validate_balance,
    validate_financial_transaction, validate_journal_entry, validate_purchase_order,
    validate_required_fields, BalanceTotals, DocumentTotals, RequiredFields, ValidationError,
    AMOUNT_LIMIT, BALANCE_TOLERANCE, MONEY_SCALE,
};
