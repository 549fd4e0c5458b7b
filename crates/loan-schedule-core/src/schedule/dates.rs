use chrono::{Days, Months, NaiveDate};

use crate::error::LoanScheduleError;
use crate::schedule::cycle::CycleStep;
use crate::terms::RepaymentCycle;
use crate::LoanScheduleResult;

/// Add whole months, clamping to the last day when the target month is
/// shorter (Jan 31 + 1 month = Feb 28, or Feb 29 in a leap year).
pub fn add_months(date: NaiveDate, months: u32) -> LoanScheduleResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| LoanScheduleError::DateError(format!("{date} + {months} months")))
}

/// Due date of installment `payment_no` (1-based).
///
/// Always offset from the first payment date, never from the previous
/// row, so a month-end anchor survives a short February.
pub fn due_date(
    first_payment_date: NaiveDate,
    cycle: RepaymentCycle,
    payment_no: u32,
) -> LoanScheduleResult<NaiveDate> {
    let offset = payment_no.saturating_sub(1);
    let out_of_range = || {
        LoanScheduleError::DateError(format!(
            "installment {payment_no} from {first_payment_date}"
        ))
    };

    match cycle.step() {
        CycleStep::Months(per) => {
            let months = per.checked_mul(offset).ok_or_else(out_of_range)?;
            add_months(first_payment_date, months)
        }
        CycleStep::Days(per) => {
            let days = u64::from(per) * u64::from(offset);
            first_payment_date
                .checked_add_days(Days::new(days))
                .ok_or_else(out_of_range)
        }
    }
}
