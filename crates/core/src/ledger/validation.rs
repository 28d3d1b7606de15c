//! Invariant validation for documents, run before any row is written.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use docledger_shared::AppError;

use super::types::{
    FinancialLineInput, FinancialTransactionInput, JournalEntryInput, JournalLineInput,
    PurchaseOrderInput, PurchaseOrderLineInput, SupplierInput,
};

/// Largest debit/credit difference still treated as balanced (0.01).
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Minimum number of lines in a journal entry.
pub const MIN_JOURNAL_LINES: usize = 2;

/// Decimal places kept by the money columns.
pub const MONEY_SCALE: u32 = 4;

/// Smallest magnitude a `DECIMAL(20,4)` money column cannot hold (10^16).
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0x6FC1_0000, 0x0023_86F2, 0, false, 0);

/// Validation errors raised before a document is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Debits and credits differ by more than the tolerance.
    #[error(
        "Journal entry is not balanced. Debit: {debit}, Credit: {credit}, Difference: {difference}"
    )]
    Unbalanced {
        /// Sum of debit lines.
        debit: Decimal,
        /// Sum of credit lines.
        credit: Decimal,
        /// Absolute difference.
        difference: Decimal,
    },

    /// A required field is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The document has fewer lines than its type needs.
    #[error("{document} requires at least {min} line(s), got {actual}")]
    TooFewLines {
        /// Document label.
        document: &'static str,
        /// Required minimum.
        min: usize,
        /// Lines supplied.
        actual: usize,
    },

    /// A single line is malformed.
    #[error("Line {line}: {reason}")]
    InvalidLine {
        /// 1-based line position.
        line: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Tax rate outside `0..=1` or finer than four decimal places.
    #[error("Tax rate must be between 0 and 1 with at most 4 decimal places, got {0}")]
    InvalidTaxRate(Decimal),

    /// An amount, given or derived, is too large for a money column.
    #[error("{0} exceeds the supported amount range")]
    AmountOutOfRange(&'static str),

    /// An amount, given or derived, has more than four decimal places.
    #[error("{0} has more than 4 decimal places")]
    TooPrecise(&'static str),

    /// Discount below zero.
    #[error("Discount cannot be negative, got {0}")]
    NegativeDiscount(Decimal),

    /// Discount larger than the taxed subtotal.
    #[error("Discount {discount} exceeds order amount {gross}")]
    DiscountExceedsAmount {
        /// Requested discount.
        discount: Decimal,
        /// Subtotal plus tax.
        gross: Decimal,
    },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

// ============================================================================
// Derived amounts
// ============================================================================

/// Debit and credit sums of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceTotals {
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
}

/// Derived purchase order amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    /// `Σ quantity × unit_price`.
    pub subtotal: Decimal,
    /// Rate applied to the subtotal.
    pub tax_rate: Decimal,
    /// `subtotal × tax_rate`.
    pub tax: Decimal,
    /// Absolute discount.
    pub discount: Decimal,
    /// `subtotal + tax − discount`.
    pub total: Decimal,
}

/// Checks that `value` fits a money column unchanged.
///
/// # Errors
///
/// Returns `AmountOutOfRange` or `TooPrecise` naming `field`.
pub fn check_amount(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value.abs() >= AMOUNT_LIMIT {
        return Err(ValidationError::AmountOutOfRange(field));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(ValidationError::TooPrecise(field));
    }
    Ok(value)
}

fn checked_sum(
    field: &'static str,
    values: impl IntoIterator<Item = Decimal>,
) -> Result<Decimal, ValidationError> {
    let sum = values
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .ok_or(ValidationError::AmountOutOfRange(field))?;
    check_amount(field, sum)
}

/// Checks that debits equal credits within [`BALANCE_TOLERANCE`].
///
/// # Errors
///
/// Returns `ValidationError::Unbalanced` naming both sums and their difference,
/// or `AmountOutOfRange` when a sum leaves the money range.
pub fn validate_balance(lines: &[JournalLineInput]) -> Result<BalanceTotals, ValidationError> {
    let total_debit = checked_sum("total debit", lines.iter().map(|l| l.debit))?;
    let total_credit = checked_sum("total credit", lines.iter().map(|l| l.credit))?;
    let difference = (total_debit - total_credit).abs();

    if difference > BALANCE_TOLERANCE {
        return Err(ValidationError::Unbalanced {
            debit: total_debit,
            credit: total_credit,
            difference,
        });
    }

    Ok(BalanceTotals {
        total_debit,
        total_credit,
    })
}

/// Derives purchase order totals. Exact decimal arithmetic, no rounding.
///
/// Every line total and derived amount must fit a money column as computed,
/// so the stored rows satisfy the same equations.
///
/// # Errors
///
/// Returns `InvalidLine`, `AmountOutOfRange` or `TooPrecise` when a derived
/// amount does not fit.
pub fn compute_totals(
    lines: &[PurchaseOrderLineInput],
    tax_rate: Decimal,
    discount: Decimal,
) -> Result<DocumentTotals, ValidationError> {
    let mut line_totals = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let line_total = line
            .line_total()
            .ok_or_else(|| invalid_line(i, "line total exceeds the supported amount range"))?;
        check_amount("line total", line_total).map_err(|err| invalid_line(i, &err.to_string()))?;
        line_totals.push(line_total);
    }

    let subtotal = checked_sum("subtotal", line_totals)?;
    let tax = subtotal
        .checked_mul(tax_rate)
        .ok_or(ValidationError::AmountOutOfRange("tax"))?;
    let tax = check_amount("tax", tax)?;
    let total = subtotal
        .checked_add(tax)
        .and_then(|gross| gross.checked_sub(discount))
        .ok_or(ValidationError::AmountOutOfRange("total"))?;

    Ok(DocumentTotals {
        subtotal,
        tax_rate,
        tax,
        discount,
        total: check_amount("total", total)?,
    })
}

/// Sums the line amounts of a financial transaction.
///
/// # Errors
///
/// Returns `AmountOutOfRange` when the sum leaves the money range.
pub fn transaction_total(lines: &[FinancialLineInput]) -> Result<Decimal, ValidationError> {
    checked_sum("total", lines.iter().map(|l| l.amount))
}

// ============================================================================
// Required fields
// ============================================================================

/// Per-document presence and range checks.
pub trait RequiredFields {
    /// Checks that every required field is present and well-formed.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    fn validate_required_fields(&self) -> Result<(), ValidationError>;
}

/// Runs the required-field checks of `input`.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_required_fields<T: RequiredFields + ?Sized>(input: &T) -> Result<(), ValidationError> {
    input.validate_required_fields()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn invalid_line(index: usize, reason: &str) -> ValidationError {
    ValidationError::InvalidLine {
        line: index + 1,
        reason: reason.to_string(),
    }
}

impl RequiredFields for JournalEntryInput {
    fn validate_required_fields(&self) -> Result<(), ValidationError> {
        if is_blank(&self.description) {
            return Err(ValidationError::MissingField("description"));
        }
        if self.lines.len() < MIN_JOURNAL_LINES {
            return Err(ValidationError::TooFewLines {
                document: "Journal entry",
                min: MIN_JOURNAL_LINES,
                actual: self.lines.len(),
            });
        }
        for (i, line) in self.lines.iter().enumerate() {
            if is_blank(&line.account_code) {
                return Err(invalid_line(i, "account code is required"));
            }
            if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
                return Err(invalid_line(i, "amounts cannot be negative"));
            }
            line_amount(i, "debit", line.debit)?;
            line_amount(i, "credit", line.credit)?;
            let has_debit = line.debit > Decimal::ZERO;
            let has_credit = line.credit > Decimal::ZERO;
            if has_debit == has_credit {
                return Err(invalid_line(
                    i,
                    "exactly one of debit or credit must be positive",
                ));
            }
        }
        Ok(())
    }
}

impl RequiredFields for PurchaseOrderInput {
    fn validate_required_fields(&self) -> Result<(), ValidationError> {
        if self.supplier_id.is_none() {
            return Err(ValidationError::MissingField("supplierId"));
        }
        if self.lines.is_empty() {
            return Err(ValidationError::TooFewLines {
                document: "Purchase order",
                min: 1,
                actual: 0,
            });
        }
        for (i, line) in self.lines.iter().enumerate() {
            if is_blank(&line.description) {
                return Err(invalid_line(i, "description is required"));
            }
            if line.quantity <= Decimal::ZERO {
                return Err(invalid_line(i, "quantity must be positive"));
            }
            if line.unit_price <= Decimal::ZERO {
                return Err(invalid_line(i, "unit price must be positive"));
            }
            line_amount(i, "quantity", line.quantity)?;
            line_amount(i, "unit price", line.unit_price)?;
        }
        if let Some(rate) = self.tax_rate {
            validate_tax_rate(rate)?;
        }
        if self.discount < Decimal::ZERO {
            return Err(ValidationError::NegativeDiscount(self.discount));
        }
        check_amount("discount", self.discount)?;
        Ok(())
    }
}

impl RequiredFields for FinancialTransactionInput {
    fn validate_required_fields(&self) -> Result<(), ValidationError> {
        if is_blank(&self.description) {
            return Err(ValidationError::MissingField("description"));
        }
        if self.lines.is_empty() {
            return Err(ValidationError::TooFewLines {
                document: "Financial transaction",
                min: 1,
                actual: 0,
            });
        }
        for (i, line) in self.lines.iter().enumerate() {
            if is_blank(&line.account_code) {
                return Err(invalid_line(i, "account code is required"));
            }
            if line.amount <= Decimal::ZERO {
                return Err(invalid_line(i, "amount must be positive"));
            }
            line_amount(i, "amount", line.amount)?;
        }
        Ok(())
    }
}

impl RequiredFields for SupplierInput {
    fn validate_required_fields(&self) -> Result<(), ValidationError> {
        if is_blank(&self.code) {
            return Err(ValidationError::MissingField("code"));
        }
        if is_blank(&self.name) {
            return Err(ValidationError::MissingField("name"));
        }
        Ok(())
    }
}

fn line_amount(index: usize, field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    check_amount(field, value)
        .map(|_| ())
        .map_err(|err| invalid_line(index, &err.to_string()))
}

fn validate_tax_rate(rate: Decimal) -> Result<(), ValidationError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE || rate.normalize().scale() > MONEY_SCALE {
        return Err(ValidationError::InvalidTaxRate(rate));
    }
    Ok(())
}

// ============================================================================
// Per-document validation
// ============================================================================

/// Validates a journal entry and returns its debit/credit sums.
///
/// # Errors
///
/// Returns a `ValidationError` on missing fields or an unbalanced entry.
pub fn validate_journal_entry(input: &JournalEntryInput) -> Result<BalanceTotals, ValidationError> {
    validate_required_fields(input)?;
    validate_balance(&input.lines)
}

/// Validates a purchase order and derives its totals.
///
/// `default_tax_rate` applies when the input does not state a rate.
///
/// # Errors
///
/// Returns a `ValidationError` on missing fields, an out-of-range tax rate, or a
/// discount larger than the taxed subtotal.
pub fn validate_purchase_order(
    input: &PurchaseOrderInput,
    default_tax_rate: Decimal,
) -> Result<DocumentTotals, ValidationError> {
    validate_required_fields(input)?;
    let tax_rate = input.tax_rate.unwrap_or(default_tax_rate);
    validate_tax_rate(tax_rate)?;

    let totals = compute_totals(&input.lines, tax_rate, input.discount)?;
    let gross = totals.subtotal + totals.tax;
    if totals.discount > gross {
        return Err(ValidationError::DiscountExceedsAmount {
            discount: totals.discount,
            gross,
        });
    }
    Ok(totals)
}

/// Validates a financial transaction and returns its total.
///
/// # Errors
///
/// Returns a `ValidationError` on missing fields or non-positive amounts.
pub fn validate_financial_transaction(
    input: &FinancialTransactionInput,
) -> Result<Decimal, ValidationError> {
    validate_required_fields(input)?;
    transaction_total(&input.lines)
}
