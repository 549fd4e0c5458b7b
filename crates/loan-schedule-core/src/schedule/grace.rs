//! Grace period normalization.
//!
//! Callers send the grace period in days or in months without saying
//! which. Values above [`DAYS_THRESHOLD`] are read as days and converted
//! at 30 days a month; anything else is taken as months. The guess lives
//! in [`interpret_grace_period`] alone so it can be swapped out once the
//! upstream contract carries a unit.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{ErrorCode, LoanScheduleError};
use crate::rounding::round_whole;
use crate::schedule::cycle::DAYS_PER_MONTH;
use crate::terms::ReturnType;
use crate::types::{with_metadata, ComputationOutput};
use crate::LoanScheduleResult;

/// Largest value still read as a month count.
pub const DAYS_THRESHOLD: Decimal = dec!(12);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraceUnit {
    Months,
    Days,
}

/// Input for normalizing a grace period on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraceInput {
    pub grace_period: Decimal,
    pub repayment_period: u32,
    #[serde(default)]
    pub return_type: ReturnType,
}

/// A grace period resolved to whole installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedGrace {
    /// Grace installments after normalization.
    pub grace_period: u32,
    /// The value as received.
    pub grace_period_input: Decimal,
    /// How the received value was read.
    pub grace_period_unit: GraceUnit,
}

/// Read an ambiguous grace value as a month count.
pub fn interpret_grace_period(raw: Decimal) -> (Decimal, GraceUnit) {
    if raw > DAYS_THRESHOLD {
        (
            round_whole(raw / Decimal::from(DAYS_PER_MONTH)),
            GraceUnit::Days,
        )
    } else {
        (raw, GraceUnit::Months)
    }
}

/// Normalize and validate a grace period for the given return model.
///
/// Non-fatal adjustments are appended to `warnings`.
pub fn resolve_grace_period(
    raw: Decimal,
    repayment_period: u32,
    return_type: ReturnType,
    warnings: &mut Vec<String>,
) -> LoanScheduleResult<NormalizedGrace> {
    if raw < Decimal::ZERO {
        return Err(LoanScheduleError::invalid(
            ErrorCode::InvalidGracePeriod,
            "grace_period",
            "Grace period cannot be negative",
        ));
    }

    if return_type == ReturnType::RevenueSharing {
        if raw > Decimal::ZERO {
            warnings.push(format!(
                "Revenue-sharing schedules have no grace phase; grace period {raw} reset to 0"
            ));
        }
        return Ok(NormalizedGrace {
            grace_period: 0,
            grace_period_input: raw,
            grace_period_unit: GraceUnit::Months,
        });
    }

    let (months, unit) = interpret_grace_period(raw);
    if unit == GraceUnit::Days {
        warnings.push(format!(
            "Grace period {raw} exceeds {DAYS_THRESHOLD} and was read as days ({months} months)"
        ));
    }

    if months >= Decimal::from(repayment_period) {
        return Err(LoanScheduleError::invalid(
            ErrorCode::InvalidGracePeriod,
            "grace_period",
            format!(
                "Grace period ({months} months) must be shorter than the repayment period ({repayment_period})"
            ),
        ));
    }

    // Rounding 11.5 of 12 up would swallow the last installment
    let whole = round_whole(months).min(Decimal::from(repayment_period - 1));
    if whole != months {
        warnings.push(format!(
            "Grace period of {months} months rounded to {whole} whole installments"
        ));
    }

    let grace_period = whole.to_u32().ok_or_else(|| {
        LoanScheduleError::invalid(
            ErrorCode::InvalidGracePeriod,
            "grace_period",
            format!("Grace period {raw} is out of range"),
        )
    })?;

    Ok(NormalizedGrace {
        grace_period,
        grace_period_input: raw,
        grace_period_unit: unit,
    })
}

/// Normalize a grace period outside of a full schedule run.
pub fn normalize_grace_period(
    input: &GraceInput,
) -> LoanScheduleResult<ComputationOutput<NormalizedGrace>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.repayment_period == 0 {
        return Err(LoanScheduleError::invalid(
            ErrorCode::InvalidRepaymentPeriod,
            "repayment_period",
            "Repayment period must be at least 1 installment",
        ));
    }

    let normalized = resolve_grace_period(
        input.grace_period,
        input.repayment_period,
        input.return_type,
        &mut warnings,
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Grace Period Normalization (>12 read as days at 30/month)",
        input,
        warnings,
        elapsed,
        normalized,
    ))
}
