use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable failure codes surfaced to callers of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidLoanAmount,
    InvalidInterestRate,
    InvalidRepaymentPeriod,
    InvalidGracePeriod,
    InvalidFee,
    DateOutOfRange,
    CalculationOverflow,
    SerializationError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidLoanAmount => "INVALID_LOAN_AMOUNT",
            ErrorCode::InvalidInterestRate => "INVALID_INTEREST_RATE",
            ErrorCode::InvalidRepaymentPeriod => "INVALID_REPAYMENT_PERIOD",
            ErrorCode::InvalidGracePeriod => "INVALID_GRACE_PERIOD",
            ErrorCode::InvalidFee => "INVALID_FEE",
            ErrorCode::DateOutOfRange => "DATE_OUT_OF_RANGE",
            ErrorCode::CalculationOverflow => "CALCULATION_OVERFLOW",
            ErrorCode::SerializationError => "SERIALIZATION_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LoanScheduleError {
    #[error("[{code}] invalid {field}: {reason}")]
    InvalidInput {
        code: ErrorCode,
        field: String,
        reason: String,
    },

    #[error("[DATE_OUT_OF_RANGE] {0}")]
    DateError(String),

    #[error("[CALCULATION_OVERFLOW] {context} overflowed")]
    Overflow { context: String },

    #[error("[SERIALIZATION_ERROR] {0}")]
    SerializationError(String),
}

impl LoanScheduleError {
    pub(crate) fn invalid(code: ErrorCode, field: &str, reason: impl Into<String>) -> Self {
        LoanScheduleError::InvalidInput {
            code,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The machine-readable code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            LoanScheduleError::InvalidInput { code, .. } => *code,
            LoanScheduleError::DateError(_) => ErrorCode::DateOutOfRange,
            LoanScheduleError::Overflow { .. } => ErrorCode::CalculationOverflow,
            LoanScheduleError::SerializationError(_) => ErrorCode::SerializationError,
        }
    }
}

impl From<serde_json::Error> for LoanScheduleError {
    fn from(e: serde_json::Error) -> Self {
        LoanScheduleError::SerializationError(e.to_string())
    }
}
