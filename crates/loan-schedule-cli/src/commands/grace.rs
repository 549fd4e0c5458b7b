use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_schedule_core::schedule::grace::{self, GraceInput};
use loan_schedule_core::ReturnType;

use crate::commands::parse_term;
use crate::input;

/// Arguments for grace period normalization
#[derive(Args)]
pub struct GraceArgs {
    /// Path to a JSON/YAML file with grace_period, repayment_period, return_type
    #[arg(long)]
    pub input: Option<String>,

    /// Raw grace period as received (days or months)
    #[arg(long)]
    pub grace_period: Option<Decimal>,

    /// Number of installments
    #[arg(long)]
    pub repayment_period: Option<u32>,

    /// interest_based or revenue_sharing
    #[arg(long, value_parser = parse_term::<ReturnType>)]
    pub return_type: Option<ReturnType>,
}

pub fn run_grace(args: GraceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let grace_input: GraceInput = match input::load(args.input.as_deref())? {
        Some(doc) => doc,
        None => GraceInput {
            grace_period: args
                .grace_period
                .ok_or("--grace-period is required (or provide --input)")?,
            repayment_period: args
                .repayment_period
                .ok_or("--repayment-period is required (or provide --input)")?,
            return_type: args.return_type.unwrap_or_default(),
        },
    };

    let result = grace::normalize_grace_period(&grace_input)?;
    Ok(serde_json::to_value(result)?)
}
