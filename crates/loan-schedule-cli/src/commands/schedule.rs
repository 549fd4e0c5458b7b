use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_schedule_core::schedule;
use loan_schedule_core::{
    CustomFee, LoanTerms, LoanTermsOverride, RepaymentCycle, RepaymentStructure, ReturnType,
};

use crate::commands::{parse_fee, parse_term};
use crate::input;

/// Arguments for projecting a repayment schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to a JSON/YAML loan terms file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to an active-version override applied on top of the terms
    #[arg(long = "override")]
    pub version_override: Option<String>,

    /// Principal amount
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent (12.5 = 12.5%)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Number of installments
    #[arg(long)]
    pub repayment_period: Option<u32>,

    /// principal_and_interest or bullet
    #[arg(long, value_parser = parse_term::<RepaymentStructure>)]
    pub structure: Option<RepaymentStructure>,

    /// daily, weekly, bi_weekly, monthly or quarterly
    #[arg(long, value_parser = parse_term::<RepaymentCycle>)]
    pub cycle: Option<RepaymentCycle>,

    /// First due date (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,

    /// Grace period; values above 12 are read as days
    #[arg(long)]
    pub grace_period: Option<Decimal>,

    /// interest_based or revenue_sharing
    #[arg(long, value_parser = parse_term::<ReturnType>)]
    pub return_type: Option<ReturnType>,

    /// Custom fee as NAME:flat|percentage:AMOUNT (repeatable)
    #[arg(long = "fee", value_parser = parse_fee)]
    pub fees: Vec<CustomFee>,
}

fn terms_from_flags(args: &ScheduleArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    let loan_amount = args
        .loan_amount
        .ok_or("--loan-amount is required (or provide --input)")?;
    let interest_rate = args
        .interest_rate
        .ok_or("--interest-rate is required (or provide --input)")?;
    let repayment_period = args
        .repayment_period
        .ok_or("--repayment-period is required (or provide --input)")?;
    let first_payment_date = args
        .first_payment_date
        .ok_or("--first-payment-date is required (or provide --input)")?;

    Ok(LoanTerms {
        loan_amount,
        interest_rate,
        repayment_period,
        repayment_structure: args.structure.unwrap_or_default(),
        repayment_cycle: args.cycle.unwrap_or_default(),
        first_payment_date,
        grace_period: args.grace_period.unwrap_or(Decimal::ZERO),
        return_type: args.return_type.unwrap_or_default(),
        custom_fees: args.fees.clone(),
    })
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = match input::load(args.input.as_deref())? {
        Some(terms) => terms,
        None => terms_from_flags(&args)?,
    };

    let version: Option<LoanTermsOverride> = match args.version_override {
        Some(ref path) => Some(input::file::read_document(path)?),
        None => None,
    };

    let result = schedule::calculate_versioned_schedule(&terms, version.as_ref())?;
    Ok(serde_json::to_value(result)?)
}
