//! RG5329 eligibility and perception amounts for display.
//!
//! The numbers here are advisory. Committed taxes are applied by the ERP
//! when the order is created, so nothing in this module writes back to the
//! order it reads.

use crate::domain::model::{CalculationResult, OrderLine, Rg5329Status};
use crate::domain::ports::OrderSnapshot;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Minimum eligible subtotal, in currency units.
pub const MINIMUM_THRESHOLD: Decimal = dec!(100000);

/// VAT brackets. Matching is exact; no other rate maps to a perception.
pub const RATE_21: Decimal = dec!(21.0);
pub const RATE_105: Decimal = dec!(10.5);

pub const PERCEPTION_21: Decimal = dec!(0.03);
pub const PERCEPTION_105: Decimal = dec!(0.015);

/// Largest line amount a snapshot may carry. Keeps eligible sums well inside
/// `Decimal` range.
pub const MAX_LINE_AMOUNT: Decimal = dec!(1000000000000000000);

/// Perception contributed by one line, as `(3% part, 1.5% part)`.
///
/// A line carrying both brackets contributes its full base to each. `None`
/// when the amounts leave `Decimal` range.
pub fn line_perception(line: &OrderLine) -> Option<(Decimal, Decimal)> {
    let mut tax_21 = Decimal::ZERO;
    let mut tax_105 = Decimal::ZERO;

    for tax in &line.taxes {
        if tax.rate == RATE_21 {
            tax_21 = tax_21.checked_add(line.price_without_tax.checked_mul(PERCEPTION_21)?)?;
        } else if tax.rate == RATE_105 {
            tax_105 = tax_105.checked_add(line.price_without_tax.checked_mul(PERCEPTION_105)?)?;
        }
    }

    Some((tax_21, tax_105))
}

fn out_of_range(lines_count: usize) -> CalculationResult {
    tracing::warn!("RG5329: eligible amounts out of range");
    CalculationResult::not_applicable(
        Rg5329Status::AmountOutOfRange,
        Rg5329Status::AmountOutOfRange.to_string(),
        Decimal::ZERO,
        lines_count,
    )
}

pub fn compute_rg5329<O: OrderSnapshot + ?Sized>(order: &O) -> CalculationResult {
    if order.customer().is_some_and(|c| c.rg5329_exempt) {
        tracing::debug!("RG5329: customer exempt, skipping");
        return CalculationResult::not_applicable(
            Rg5329Status::CustomerExempt,
            Rg5329Status::CustomerExempt.to_string(),
            Decimal::ZERO,
            0,
        );
    }

    let eligible_lines: Vec<&OrderLine> = order
        .lines()
        .iter()
        .filter(|line| line.is_rg5329_eligible())
        .collect();

    if eligible_lines.is_empty() {
        return CalculationResult::not_applicable(
            Rg5329Status::NoEligibleProducts,
            Rg5329Status::NoEligibleProducts.to_string(),
            Decimal::ZERO,
            0,
        );
    }

    let Some(subtotal) = eligible_lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.price_without_tax))
    else {
        return out_of_range(eligible_lines.len());
    };

    tracing::debug!(
        "RG5329: {} eligible lines, subtotal {}",
        eligible_lines.len(),
        subtotal
    );

    if subtotal < MINIMUM_THRESHOLD {
        let reason = format!(
            "{}: RG5329 subtotal {} is under {}",
            Rg5329Status::BelowThreshold,
            subtotal,
            MINIMUM_THRESHOLD
        );
        return CalculationResult::not_applicable(
            Rg5329Status::BelowThreshold,
            reason,
            subtotal,
            eligible_lines.len(),
        );
    }

    let totals = eligible_lines.iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(acc_21, acc_105), line| {
            let (tax_21, tax_105) = line_perception(line)?;
            Some((acc_21.checked_add(tax_21)?, acc_105.checked_add(tax_105)?))
        },
    );
    let Some((tax_21_amount, tax_105_amount)) = totals else {
        return out_of_range(eligible_lines.len());
    };
    let Some(total_tax) = tax_21_amount.checked_add(tax_105_amount) else {
        return out_of_range(eligible_lines.len());
    };

    CalculationResult {
        applicable: true,
        status: Rg5329Status::Applicable,
        reason: None,
        subtotal,
        tax_21_amount,
        tax_105_amount,
        total_tax,
        lines_count: eligible_lines.len(),
    }
}
