//! Repayment schedule engine.
//!
//! Validates a [`LoanTerms`] snapshot, normalizes its grace period,
//! folds it into one row per installment and reduces the rows into a
//! summary. The facility fee is priced independently and folded into the
//! summary at the end. Nothing here performs I/O.

pub mod cycle;
pub mod dates;
pub mod fees;
pub mod generator;
pub mod grace;
pub mod summary;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{ErrorCode, LoanScheduleError};
use crate::terms::{
    CustomFee, LoanTerms, LoanTermsOverride, RepaymentCycle, RepaymentStructure, ReturnType,
};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::LoanScheduleResult;

pub use generator::{Installment, SchedulePlan, ScheduleRow, ScheduleRows};
pub use grace::{GraceUnit, NormalizedGrace};
pub use summary::ScheduleSummary;

/// Upper bound on installments (daily repayment over 270+ years).
pub const MAX_REPAYMENT_PERIOD: u32 = 100_000;

/// Echo of the terms as the engine resolved them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    pub loan_amount: Money,
    pub interest_rate: Rate,
    pub repayment_period: u32,
    pub repayment_structure: RepaymentStructure,
    pub repayment_cycle: RepaymentCycle,
    /// Months covered by one installment.
    pub cycle_months: Decimal,
    pub first_payment_date: NaiveDate,
    /// Normalized grace installments.
    pub grace_period: u32,
    pub grace_period_input: Decimal,
    pub grace_period_unit: GraceUnit,
    pub return_type: ReturnType,
    pub custom_fees: Vec<CustomFee>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentScheduleOutput {
    pub schedule: Vec<ScheduleRow>,
    pub summary: ScheduleSummary,
    pub loan_summary: LoanSummary,
}

fn validate_terms(terms: &LoanTerms) -> LoanScheduleResult<()> {
    if terms.loan_amount <= Decimal::ZERO {
        return Err(LoanScheduleError::invalid(
            ErrorCode::InvalidLoanAmount,
            "loan_amount",
            "Loan amount must be positive",
        ));
    }
    if terms.repayment_period == 0 {
        return Err(LoanScheduleError::invalid(
            ErrorCode::InvalidRepaymentPeriod,
            "repayment_period",
            "Repayment period must be at least 1 installment",
        ));
    }
    if terms.repayment_period > MAX_REPAYMENT_PERIOD {
        return Err(LoanScheduleError::invalid(
            ErrorCode::InvalidRepaymentPeriod,
            "repayment_period",
            format!("Repayment period cannot exceed {MAX_REPAYMENT_PERIOD} installments"),
        ));
    }
    if terms.interest_rate < Decimal::ZERO {
        return Err(LoanScheduleError::invalid(
            ErrorCode::InvalidInterestRate,
            "interest_rate",
            "Interest rate cannot be negative",
        ));
    }
    Ok(())
}

fn methodology(plan: &SchedulePlan) -> &'static str {
    match (plan.return_type, plan.structure) {
        (ReturnType::RevenueSharing, _) => {
            "Revenue Share (flat share per installment, principal at maturity)"
        }
        (ReturnType::InterestBased, RepaymentStructure::PrincipalAndInterest) => {
            "Level-Payment Amortization (interest-only grace, final-row correction)"
        }
        (ReturnType::InterestBased, RepaymentStructure::Bullet) => {
            "Bullet Repayment (interest-only, principal at maturity)"
        }
    }
}

/// Project the full repayment schedule for a loan.
pub fn calculate_repayment_schedule(
    terms: &LoanTerms,
) -> LoanScheduleResult<ComputationOutput<RepaymentScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(terms)?;

    let grace = grace::resolve_grace_period(
        terms.grace_period,
        terms.repayment_period,
        terms.return_type,
        &mut warnings,
    )?;

    if !terms.repayment_cycle.is_recognized() {
        warnings.push("Unrecognized repayment cycle; scheduled as monthly".into());
    }
    if terms.return_type == ReturnType::RevenueSharing
        && terms.repayment_structure == RepaymentStructure::Bullet
    {
        warnings.push("repayment_structure is ignored for revenue-sharing loans".into());
    }

    let plan = SchedulePlan {
        loan_amount: terms.loan_amount,
        interest_rate: terms.interest_rate,
        installments: terms.repayment_period,
        grace_installments: grace.grace_period,
        structure: terms.repayment_structure,
        cycle: terms.repayment_cycle,
        first_payment_date: terms.first_payment_date,
        return_type: terms.return_type,
    };

    let mut installments = generator::generate_installments(plan)?;
    if plan.amortizes() {
        generator::correct_final_installment(plan.loan_amount, &mut installments);
    }
    let schedule = generator::publish_rows(&plan, &installments);

    let facility_fee = fees::facility_fee(terms.loan_amount, &terms.custom_fees)?;
    let summary = summary::summarize(&plan, &installments, &schedule, facility_fee)?;

    let loan_summary = LoanSummary {
        loan_amount: terms.loan_amount,
        interest_rate: terms.interest_rate,
        repayment_period: terms.repayment_period,
        repayment_structure: terms.repayment_structure,
        repayment_cycle: terms.repayment_cycle,
        cycle_months: terms.repayment_cycle.months(),
        first_payment_date: terms.first_payment_date,
        grace_period: grace.grace_period,
        grace_period_input: grace.grace_period_input,
        grace_period_unit: grace.grace_period_unit,
        return_type: terms.return_type,
        custom_fees: terms.custom_fees.clone(),
    };

    let output = RepaymentScheduleOutput {
        schedule,
        summary,
        loan_summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology(&plan),
        &serde_json::json!({
            "loan_amount": terms.loan_amount.to_string(),
            "annual_rate_pct": terms.interest_rate.to_string(),
            "installments": terms.repayment_period,
            "grace_installments": grace.grace_period,
            "rate_per_installment": "annual / 12",
            "rounding": "half away from zero, 2 dp, on output",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Project a schedule from base terms with an optional active version
/// layered on top.
pub fn calculate_versioned_schedule(
    base: &LoanTerms,
    active_version: Option<&LoanTermsOverride>,
) -> LoanScheduleResult<ComputationOutput<RepaymentScheduleOutput>> {
    match active_version {
        Some(version) => calculate_repayment_schedule(&base.with_override(version)),
        None => calculate_repayment_schedule(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::FeeType;
    use rust_decimal_macros::dec;

    fn monthly_terms() -> LoanTerms {
        LoanTerms {
            loan_amount: dec!(12000),
            interest_rate: dec!(12),
            repayment_period: 12,
            repayment_structure: RepaymentStructure::PrincipalAndInterest,
            repayment_cycle: RepaymentCycle::Monthly,
            first_payment_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            grace_period: Decimal::ZERO,
            return_type: ReturnType::InterestBased,
            custom_fees: Vec::new(),
        }
    }

    #[test]
    fn test_basic_schedule_shape() {
        let output = calculate_repayment_schedule(&monthly_terms()).unwrap();
        let res = &output.result;
        assert_eq!(res.schedule.len(), 12);
        assert_eq!(res.summary.total_principal, dec!(12000.00));
        assert_eq!(res.summary.monthly_payment, dec!(1066.19));
        assert!(output.warnings.is_empty());
        assert!(output.methodology.starts_with("Level-Payment"));
    }

    #[test]
    fn test_zero_loan_amount_error() {
        let mut terms = monthly_terms();
        terms.loan_amount = Decimal::ZERO;
        let err = calculate_repayment_schedule(&terms).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidLoanAmount);
    }

    #[test]
    fn test_zero_period_error() {
        let mut terms = monthly_terms();
        terms.repayment_period = 0;
        let err = calculate_repayment_schedule(&terms).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRepaymentPeriod);
    }

    #[test]
    fn test_excessive_period_error() {
        let mut terms = monthly_terms();
        terms.repayment_period = MAX_REPAYMENT_PERIOD + 1;
        let err = calculate_repayment_schedule(&terms).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRepaymentPeriod);
    }

    #[test]
    fn test_negative_rate_error() {
        let mut terms = monthly_terms();
        terms.interest_rate = dec!(-1);
        let err = calculate_repayment_schedule(&terms).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInterestRate);
    }

    #[test]
    fn test_unrecognized_cycle_warns() {
        let mut terms = monthly_terms();
        terms.repayment_cycle = RepaymentCycle::Unrecognized;
        let output = calculate_repayment_schedule(&terms).unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.result.loan_summary.cycle_months, Decimal::ONE);
    }

    #[test]
    fn test_loan_summary_echoes_normalized_grace() {
        let mut terms = monthly_terms();
        terms.grace_period = dec!(90);
        let output = calculate_repayment_schedule(&terms).unwrap();
        let echo = &output.result.loan_summary;
        assert_eq!(echo.grace_period, 3);
        assert_eq!(echo.grace_period_input, dec!(90));
        assert_eq!(echo.grace_period_unit, GraceUnit::Days);
    }

    #[test]
    fn test_fees_flow_into_summary() {
        let mut terms = monthly_terms();
        terms.custom_fees = vec![CustomFee {
            name: "Processing".into(),
            amount: dec!(2),
            fee_type: FeeType::Percentage,
        }];
        let output = calculate_repayment_schedule(&terms).unwrap();
        assert_eq!(output.result.summary.facility_fee, dec!(240));
    }

    #[test]
    fn test_versioned_schedule_uses_override() {
        let base = monthly_terms();
        let version = LoanTermsOverride {
            repayment_period: Some(6),
            ..Default::default()
        };
        let output = calculate_versioned_schedule(&base, Some(&version)).unwrap();
        assert_eq!(output.result.schedule.len(), 6);
        let output = calculate_versioned_schedule(&base, None).unwrap();
        assert_eq!(output.result.schedule.len(), 12);
    }

    #[test]
    fn test_output_serializes_with_snake_case_keys() {
        let output = calculate_repayment_schedule(&monthly_terms()).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert!(json["result"]["loan_summary"]["grace_period"].is_number());
        assert_eq!(json["result"]["schedule"][0]["payment_no"], 1);
        assert_eq!(json["result"]["schedule"][0]["due_date"], "2024-01-15");
        assert_eq!(json["result"]["loan_summary"]["return_type"], "interest_based");
    }

    #[test]
    fn test_long_high_rate_term_is_computed() {
        let mut terms = monthly_terms();
        terms.loan_amount = dec!(10000);
        terms.interest_rate = dec!(60);
        terms.repayment_period = 1500;
        let output = calculate_repayment_schedule(&terms).unwrap();
        assert_eq!(output.result.schedule.len(), 1500);
        assert_eq!(output.result.summary.monthly_payment, dec!(500.00));
        assert_eq!(output.result.summary.total_principal, dec!(10000.00));
    }

    #[test]
    fn test_oversized_amounts_report_overflow() {
        let mut terms = monthly_terms();
        terms.return_type = ReturnType::RevenueSharing;
        terms.loan_amount = Decimal::from_i128_with_scale(10i128.pow(27), 0);
        terms.interest_rate = dec!(200);
        let err = calculate_repayment_schedule(&terms).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CalculationOverflow);
    }

    #[test]
    fn test_fractional_grace_just_below_term() {
        let mut terms = monthly_terms();
        terms.grace_period = dec!(11.5);
        let output = calculate_repayment_schedule(&terms).unwrap();
        assert_eq!(output.result.loan_summary.grace_period, 11);
        assert_eq!(output.result.summary.total_principal, dec!(12000.00));
    }
}
