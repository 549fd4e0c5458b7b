use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use crate::output::plain_text;

/// Print the envelope as tables: the schedule rows (when present), then
/// every other section of the result as field/value pairs.
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{value}");
        return;
    };

    match envelope.get("result") {
        Some(Value::Object(result)) => print_result(result),
        _ => print_fields(envelope),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", plain_text(w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_result(result: &Map<String, Value>) {
    if let Some(Value::Array(rows)) = result.get("schedule") {
        print_rows(rows);
    }

    let mut scalars = Map::new();
    for (key, val) in result {
        match val {
            Value::Object(section) => {
                println!("\n{}", heading(key));
                print_fields(section);
            }
            Value::Array(items) if key != "schedule" => {
                println!("\n{}", heading(key));
                print_rows(items);
            }
            Value::Array(_) => {}
            _ => {
                scalars.insert(key.clone(), val.clone());
            }
        }
    }
    if !scalars.is_empty() {
        print_fields(&scalars);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &plain_text(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(none)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.as_str()));
    for row in rows {
        if let Value::Object(map) = row {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(plain_text).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}

fn heading(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}
