//! Output rounding for published schedule figures.
//!
//! `Decimal::round_dp` rounds half-to-even; loan documents quote
//! half-away-from-zero, so every finalized figure goes through here.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::Money;

/// Decimal places for every published amount.
pub const MONEY_DP: u32 = 2;

/// Round a finalized amount to cents, half away from zero.
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to a whole number, half away from zero.
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
