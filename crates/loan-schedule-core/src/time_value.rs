use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanScheduleError;
use crate::types::{Money, Rate};
use crate::LoanScheduleResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Monthly rate as a decimal fraction from an annual percentage (12 -> 0.01).
pub fn monthly_rate(annual_pct: Rate) -> Decimal {
    annual_pct / PERCENT / MONTHS_PER_YEAR
}

/// Lift a `checked_*` result into an `Overflow` error naming the step.
pub(crate) fn checked(value: Option<Decimal>, context: &str) -> LoanScheduleResult<Decimal> {
    value.ok_or_else(|| LoanScheduleError::Overflow {
        context: context.to_string(),
    })
}

/// A percentage of an amount (`pct` quoted as 1.5 for 1.5%).
pub fn percent_of(amount: Money, pct: Rate) -> LoanScheduleResult<Money> {
    let scaled = checked(amount.checked_mul(pct), "percentage of amount")?;
    Ok(scaled / PERCENT)
}

/// Level installment that retires `principal` over `nper` periods at `rate`.
///
/// Evaluated as `principal * r / (1 - (1+r)^-n)`. Once `(1+r)^n` no longer
/// fits a `Decimal` its reciprocal is below the last representable digit,
/// and the payment is the per-period interest `principal * r`. A zero rate
/// splits the principal evenly; zero periods leave the whole principal due
/// at once.
pub fn level_payment(principal: Money, rate: Decimal, nper: u32) -> LoanScheduleResult<Money> {
    if nper == 0 {
        return Ok(principal);
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let interest = checked(principal.checked_mul(rate), "level payment interest")?;

    let Some(factor) = (Decimal::ONE + rate).checked_powu(u64::from(nper)) else {
        return Ok(interest);
    };
    let denominator = Decimal::ONE - Decimal::ONE / factor;

    if denominator.is_zero() {
        // Rate too small to register at 28 digits; behaves as zero-rate
        return Ok(principal / Decimal::from(nper));
    }

    checked(interest.checked_div(denominator), "level payment")
}
