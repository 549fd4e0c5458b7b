//! Loan terms consumed by the schedule engine.
//!
//! Terms arrive either from the base loan record or from an active-version
//! override layered on top of it; the engine only ever sees the merged
//! snapshot.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// How principal is repaid under the interest-based model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentStructure {
    /// Level installments blending interest and principal.
    #[default]
    PrincipalAndInterest,
    /// Interest only; the full principal falls due with the last installment.
    Bullet,
}

/// Installment cadence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentCycle {
    Daily,
    Weekly,
    BiWeekly,
    #[default]
    Monthly,
    Quarterly,
    /// Any cadence this engine does not know yet. Scheduled as monthly.
    #[serde(other)]
    Unrecognized,
}

/// Financial model of the facility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    #[default]
    InterestBased,
    /// Flat revenue share spread across installments, principal at the end.
    RevenueSharing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    Flat,
    /// `amount` is a percentage of the loan amount (1 = 1%).
    Percentage,
}

/// A one-off charge making up the facility fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFee {
    pub name: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub fee_type: FeeType,
}

/// Snapshot of the terms a schedule is projected from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_amount: Money,
    /// Annual percentage, e.g. 12.5 for 12.5% a year.
    pub interest_rate: Rate,
    /// Number of installments.
    pub repayment_period: u32,
    #[serde(default)]
    pub repayment_structure: RepaymentStructure,
    #[serde(default)]
    pub repayment_cycle: RepaymentCycle,
    pub first_payment_date: NaiveDate,
    /// Days or months depending on the caller; see `schedule::grace`.
    #[serde(default)]
    pub grace_period: Decimal,
    #[serde(default)]
    pub return_type: ReturnType,
    #[serde(default)]
    pub custom_fees: Vec<CustomFee>,
}

/// Fields of an active loan version that supersede the base record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanTermsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repayment_period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repayment_structure: Option<RepaymentStructure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repayment_cycle: Option<RepaymentCycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_period: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<ReturnType>,
    /// Replaces the whole fee list when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fees: Option<Vec<CustomFee>>,
}

impl LoanTerms {
    /// New terms with every field the override carries taking precedence.
    pub fn with_override(&self, version: &LoanTermsOverride) -> LoanTerms {
        LoanTerms {
            loan_amount: version.loan_amount.unwrap_or(self.loan_amount),
            interest_rate: version.interest_rate.unwrap_or(self.interest_rate),
            repayment_period: version.repayment_period.unwrap_or(self.repayment_period),
            repayment_structure: version
                .repayment_structure
                .unwrap_or(self.repayment_structure),
            repayment_cycle: version.repayment_cycle.unwrap_or(self.repayment_cycle),
            first_payment_date: version.first_payment_date.unwrap_or(self.first_payment_date),
            grace_period: version.grace_period.unwrap_or(self.grace_period),
            return_type: version.return_type.unwrap_or(self.return_type),
            custom_fees: version
                .custom_fees
                .clone()
                .unwrap_or_else(|| self.custom_fees.clone()),
        }
    }
}

impl LoanTermsOverride {
    pub fn is_empty(&self) -> bool {
        *self == LoanTermsOverride::default()
    }
}
