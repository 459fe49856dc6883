use rust_decimal::{Decimal, RoundingStrategy};

use crate::dto::receipts::ProductInput;
use crate::entity::receipts::PaymentType;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptTotals {
    pub total: Decimal,
    pub change: Decimal,
}

/// Compute the grand total and change due for a receipt. All arithmetic is
/// decimal; the total is rounded to two places, half away from zero.
///
/// Cash payments must cover the total and yield `amount - total` as change.
/// Cashless payments must match the total exactly and never yield change.
pub fn compute_totals(
    products: &[ProductInput],
    payment_type: PaymentType,
    amount: Decimal,
) -> AppResult<ReceiptTotals> {
    if products.is_empty() {
        return Err(AppError::EmptyReceipt);
    }
    if amount.normalize().scale() > 2 {
        return Err(AppError::Validation(
            "payment amount must have at most 2 decimal places".into(),
        ));
    }

    let mut total = Decimal::ZERO;
    for product in products {
        if product.price < Decimal::ZERO {
            return Err(AppError::InvalidLineItem(format!(
                "{}: price must not be negative",
                product.name
            )));
        }
        if product.quantity <= Decimal::ZERO {
            return Err(AppError::InvalidLineItem(format!(
                "{}: quantity must be positive",
                product.name
            )));
        }
        // Stored columns are NUMERIC(12,2)/NUMERIC(12,3); anything finer
        // would round on insert and break the read-back totals.
        if product.price.normalize().scale() > 2 {
            return Err(AppError::InvalidLineItem(format!(
                "{}: price must have at most 2 decimal places",
                product.name
            )));
        }
        if product.quantity.normalize().scale() > 3 {
            return Err(AppError::InvalidLineItem(format!(
                "{}: quantity must have at most 3 decimal places",
                product.name
            )));
        }

        let line = product.price.checked_mul(product.quantity).ok_or_else(|| {
            AppError::InvalidLineItem(format!("{}: line total out of range", product.name))
        })?;
        total = total
            .checked_add(line)
            .ok_or_else(|| AppError::Validation("receipt total out of range".into()))?;
    }
    let total = total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let change = match payment_type {
        PaymentType::Cash => {
            if amount < total {
                return Err(AppError::InsufficientPayment);
            }
            amount - total
        }
        PaymentType::Cashless => {
            if amount != total {
                return Err(AppError::AmountMismatch);
            }
            Decimal::ZERO
        }
    };

    Ok(ReceiptTotals { total, change })
}

/// Per-line subtotal as it appears on the rendered receipt.
pub fn line_total(price: Decimal, quantity: Decimal) -> Decimal {
    (price * quantity).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
