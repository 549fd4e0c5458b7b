use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::terms::RepaymentCycle;

/// Days in the notional month used to express sub-monthly cycles.
pub const DAYS_PER_MONTH: u32 = 30;

/// Calendar distance between two consecutive installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStep {
    /// Calendar days. Sub-monthly cycles step by whole days instead of
    /// truncating their month fraction to a whole-month step.
    Days(u32),
    Months(u32),
}

impl RepaymentCycle {
    /// Months covered by one installment (weekly is 7/30).
    pub fn months(self) -> Decimal {
        match self {
            RepaymentCycle::Daily => Decimal::ONE / dec!(30),
            RepaymentCycle::Weekly => dec!(7) / dec!(30),
            RepaymentCycle::BiWeekly => dec!(14) / dec!(30),
            RepaymentCycle::Monthly => Decimal::ONE,
            RepaymentCycle::Quarterly => dec!(3),
            RepaymentCycle::Unrecognized => Decimal::ONE,
        }
    }

    /// The month fraction above resolved to a whole calendar step.
    pub fn step(self) -> CycleStep {
        match self {
            RepaymentCycle::Daily => CycleStep::Days(1),
            RepaymentCycle::Weekly => CycleStep::Days(7),
            RepaymentCycle::BiWeekly => CycleStep::Days(14),
            RepaymentCycle::Monthly | RepaymentCycle::Unrecognized => CycleStep::Months(1),
            RepaymentCycle::Quarterly => CycleStep::Months(3),
        }
    }

    pub fn is_recognized(self) -> bool {
        self != RepaymentCycle::Unrecognized
    }
}

/// Months per installment for a cycle. Unknown cycles count as monthly.
pub fn cycle_months(cycle: RepaymentCycle) -> Decimal {
    cycle.months()
}
