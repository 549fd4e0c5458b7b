use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{ErrorCode, LoanScheduleError};
use crate::rounding::round_money;
use crate::terms::{CustomFee, FeeType};
use crate::time_value::{checked, percent_of};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LoanScheduleResult;

/// Input for pricing the facility fee without building a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityFeeInput {
    pub loan_amount: Money,
    #[serde(default)]
    pub custom_fees: Vec<CustomFee>,
}

/// One fee line as charged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeCharge {
    pub name: String,
    #[serde(rename = "type")]
    pub fee_type: FeeType,
    pub charge: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityFeeOutput {
    pub facility_fee: Money,
    pub flat_total: Money,
    pub percentage_total: Money,
    pub charges: Vec<FeeCharge>,
}

fn validate_fees(fees: &[CustomFee]) -> LoanScheduleResult<()> {
    for fee in fees {
        if fee.amount < Decimal::ZERO {
            return Err(LoanScheduleError::invalid(
                ErrorCode::InvalidFee,
                "custom_fees",
                format!("Fee '{}' cannot be negative", fee.name),
            ));
        }
    }
    Ok(())
}

/// Unrounded charge for one fee against the loan amount.
fn fee_charge(loan_amount: Money, fee: &CustomFee) -> LoanScheduleResult<Money> {
    match fee.fee_type {
        FeeType::Flat => Ok(fee.amount),
        FeeType::Percentage => percent_of(loan_amount, fee.amount),
    }
}

/// Total facility fee: flat amounts plus percentages of the loan amount,
/// summed unrounded and rounded once.
pub fn facility_fee(loan_amount: Money, fees: &[CustomFee]) -> LoanScheduleResult<Money> {
    validate_fees(fees)?;
    let total = fees.iter().try_fold(Decimal::ZERO, |total, f| {
        let charge = fee_charge(loan_amount, f)?;
        checked(total.checked_add(charge), "facility fee total")
    })?;
    Ok(round_money(total))
}

/// Price the facility fee on its own, with a per-fee breakdown.
pub fn calculate_facility_fee(
    input: &FacilityFeeInput,
) -> LoanScheduleResult<ComputationOutput<FacilityFeeOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.loan_amount <= Decimal::ZERO {
        return Err(LoanScheduleError::invalid(
            ErrorCode::InvalidLoanAmount,
            "loan_amount",
            "Loan amount must be positive",
        ));
    }
    validate_fees(&input.custom_fees)?;

    if input.custom_fees.is_empty() {
        warnings.push("No custom fees supplied; facility fee is zero".into());
    }

    let mut flat_total = Decimal::ZERO;
    let mut percentage_total = Decimal::ZERO;
    let mut charges = Vec::with_capacity(input.custom_fees.len());

    for fee in &input.custom_fees {
        let charge = fee_charge(input.loan_amount, fee)?;
        let bucket = match fee.fee_type {
            FeeType::Flat => &mut flat_total,
            FeeType::Percentage => &mut percentage_total,
        };
        *bucket = checked(bucket.checked_add(charge), "facility fee total")?;
        charges.push(FeeCharge {
            name: fee.name.clone(),
            fee_type: fee.fee_type,
            charge: round_money(charge),
        });
    }

    let facility_fee = checked(flat_total.checked_add(percentage_total), "facility fee total")?;
    let output = FacilityFeeOutput {
        facility_fee: round_money(facility_fee),
        flat_total: round_money(flat_total),
        percentage_total: round_money(percentage_total),
        charges,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Facility Fee (flat + percentage of principal)",
        &serde_json::json!({
            "loan_amount": input.loan_amount.to_string(),
            "fee_count": input.custom_fees.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
