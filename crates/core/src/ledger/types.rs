//! Caller-supplied inputs for document creation.
//!
//! Inputs carry only what the caller decides. Derived fields such as purchase
//! order totals or line numbers are never part of an input, so a client that
//! sends them has them ignored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One debit or credit line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalLineInput {
    /// Account the line is recorded against.
    pub account_code: String,
    /// Debit amount (zero on credit lines).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (zero on debit lines).
    #[serde(default)]
    pub credit: Decimal,
    /// Optional line memo.
    #[serde(default)]
    pub description: Option<String>,
}

/// Input for creating a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryInput {
    /// Accounting date of the entry.
    pub entry_date: NaiveDate,
    /// What the entry records.
    pub description: String,
    /// External reference such as an invoice number.
    #[serde(default)]
    pub reference: Option<String>,
    /// Lines in posting order.
    pub lines: Vec<JournalLineInput>,
}

/// One product line of a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLineInput {
    /// Optional product code.
    #[serde(default)]
    pub product_code: Option<String>,
    /// What is being ordered.
    pub description: String,
    /// Ordered quantity.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
}

impl PurchaseOrderLineInput {
    /// Returns `quantity × unit_price`, or `None` when the product overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.unit_price)
    }
}

/// Input for creating a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderInput {
    /// Supplier the order is placed with.
    #[serde(default)]
    pub supplier_id: Option<Uuid>,
    /// Order date.
    pub order_date: NaiveDate,
    /// Expected delivery date.
    #[serde(default)]
    pub expected_date: Option<NaiveDate>,
    /// Tax rate as a fraction (0.11 = 11%). Falls back to the configured default.
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    /// Absolute discount subtracted from the taxed subtotal.
    #[serde(default)]
    pub discount: Decimal,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Ordered products.
    pub lines: Vec<PurchaseOrderLineInput>,
}

/// Financial transaction classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
    /// Transfer between accounts.
    Transfer,
    /// Correction of earlier records.
    Adjustment,
}

impl TransactionType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
            Self::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a financial transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialLineInput {
    /// Account the amount is booked to.
    pub account_code: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Optional line memo.
    #[serde(default)]
    pub description: Option<String>,
}

/// Input for creating a financial transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTransactionInput {
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Classification.
    pub transaction_type: TransactionType,
    /// What the transaction is for.
    pub description: String,
    /// Booked amounts.
    pub lines: Vec<FinancialLineInput>,
}

/// Input for registering a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInput {
    /// Unique supplier code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Contact person.
    #[serde(default)]
    pub contact_name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
}
