use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_schedule_core::schedule::fees::{self, FacilityFeeInput};
use loan_schedule_core::CustomFee;

use crate::commands::parse_fee;
use crate::input;

/// Arguments for facility fee pricing
#[derive(Args)]
pub struct FeesArgs {
    /// Path to a JSON/YAML file with loan_amount and custom_fees
    #[arg(long)]
    pub input: Option<String>,

    /// Principal amount the percentage fees apply to
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Custom fee as NAME:flat|percentage:AMOUNT (repeatable)
    #[arg(long = "fee", value_parser = parse_fee)]
    pub fees: Vec<CustomFee>,
}

pub fn run_fees(args: FeesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fee_input: FacilityFeeInput = match input::load(args.input.as_deref())? {
        Some(doc) => doc,
        None => FacilityFeeInput {
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            custom_fees: args.fees,
        },
    };

    let result = fees::calculate_facility_fee(&fee_input)?;
    Ok(serde_json::to_value(result)?)
}
