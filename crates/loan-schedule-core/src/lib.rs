pub mod error;
pub mod rounding;
pub mod terms;
pub mod time_value;
pub mod types;

#[cfg(feature = "schedule")]
pub mod schedule;

pub use error::{ErrorCode, LoanScheduleError};
pub use terms::*;
pub use types::*;

/// Standard result type for all loan-schedule operations
pub type LoanScheduleResult<T> = Result<T, LoanScheduleError>;
