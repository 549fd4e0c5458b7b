use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rounding::round_money;
use crate::schedule::generator::{Installment, SchedulePlan, ScheduleRow};
use crate::terms::ReturnType;
use crate::time_value::checked;
use crate::types::Money;
use crate::{LoanScheduleError, LoanScheduleResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_payment_due: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    /// Representative installment: the steady-state amount after grace,
    /// or the per-installment revenue share.
    pub monthly_payment: Money,
    pub facility_fee: Money,
}

/// The installment a borrower is quoted.
///
/// Revenue sharing quotes the share carried by the first row; interest
/// based quotes the first row at or after the end of grace, falling back
/// to the first row when the schedule is shorter than the grace period.
pub fn representative_payment(plan: &SchedulePlan, rows: &[ScheduleRow]) -> Money {
    match plan.return_type {
        ReturnType::RevenueSharing => rows.first().map(|r| r.interest),
        ReturnType::InterestBased => rows
            .get(plan.grace_installments as usize)
            .or_else(|| rows.first())
            .map(|r| r.payment_due),
    }
    .unwrap_or(Decimal::ZERO)
}

/// Reduce a schedule into its summary.
///
/// Totals come from the unrounded installments and are rounded once;
/// the quoted payment comes from the published rows.
pub fn summarize(
    plan: &SchedulePlan,
    installments: &[Installment],
    rows: &[ScheduleRow],
    facility_fee: Money,
) -> LoanScheduleResult<ScheduleSummary> {
    let (payment_due, interest, principal) = installments.iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        |(due, int, prin), i| {
            Ok::<_, LoanScheduleError>((
                checked(due.checked_add(i.payment_due), "total payment due")?,
                checked(int.checked_add(i.interest), "total interest")?,
                checked(prin.checked_add(i.principal), "total principal")?,
            ))
        },
    )?;

    Ok(ScheduleSummary {
        total_payment_due: round_money(payment_due),
        total_interest: round_money(interest),
        total_principal: round_money(principal),
        monthly_payment: representative_payment(plan, rows),
        facility_fee: round_money(facility_fee),
    })
}
