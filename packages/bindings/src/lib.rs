use napi::Result as NapiResult;
use napi_derive::napi;

use loan_schedule_core::schedule::{self, fees, grace};
use loan_schedule_core::{LoanScheduleError, LoanTerms, LoanTermsOverride};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Engine failures lead with their machine-readable code so the service
/// layer can branch on it.
fn engine_error(e: LoanScheduleError) -> napi::Error {
    napi::Error::new(napi::Status::InvalidArg, e.to_string())
}

// ---------------------------------------------------------------------------
// Repayment schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_repayment_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::calculate_repayment_schedule(&input).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Base loan terms with the active version's overrides layered on top.
#[napi]
pub fn calculate_versioned_schedule(
    base_json: String,
    override_json: Option<String>,
) -> NapiResult<String> {
    let base: LoanTerms = serde_json::from_str(&base_json).map_err(to_napi_error)?;
    let version: Option<LoanTermsOverride> = override_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(to_napi_error)?;
    let output =
        schedule::calculate_versioned_schedule(&base, version.as_ref()).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Fees & grace
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_facility_fee(input_json: String) -> NapiResult<String> {
    let input: fees::FacilityFeeInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fees::calculate_facility_fee(&input).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn normalize_grace_period(input_json: String) -> NapiResult<String> {
    let input: grace::GraceInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = grace::normalize_grace_period(&input).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
