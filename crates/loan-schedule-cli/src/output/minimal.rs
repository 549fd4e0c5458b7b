use serde_json::Value;

use crate::output::plain_text;

/// Key figures, in priority order, searched in the result and then in
/// its summary section.
const PRIORITY_KEYS: [&str; 3] = ["monthly_payment", "facility_fee", "grace_period"];

/// Print just the headline figure of the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let summary = result.get("summary");

    for key in PRIORITY_KEYS {
        let found = result
            .get(key)
            .or_else(|| summary.and_then(|s| s.get(key)))
            .filter(|v| !v.is_null());
        if let Some(val) = found {
            println!("{}", plain_text(val));
            return;
        }
    }

    if let Some((key, val)) = result.as_object().and_then(|m| m.iter().next()) {
        println!("{}: {}", key, plain_text(val));
        return;
    }

    println!("{}", plain_text(result));
}
