pub mod fees;
pub mod grace;
pub mod schedule;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::str::FromStr;

use loan_schedule_core::{CustomFee, FeeType};

/// Parse a snake_case enum flag (e.g. `bi_weekly`) through its serde name.
pub fn parse_term<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|e| format!("'{raw}': {e}"))
}

/// Parse a `--fee` flag of the form `name:flat:100` or `name:percentage:1.5`.
pub fn parse_fee(raw: &str) -> Result<CustomFee, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(amount), Some(kind), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("'{raw}': expected NAME:flat|percentage:AMOUNT"));
    };
    let fee_type: FeeType = parse_term(kind)?;
    let amount = Decimal::from_str(amount).map_err(|e| format!("'{raw}': {e}"))?;
    Ok(CustomFee {
        name: name.to_string(),
        amount,
        fee_type,
    })
}
