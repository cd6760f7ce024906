use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, format_value, result_of};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match result_of(value) {
        Value::Array(arr) => print_array_table(arr),
        Value::Object(_) => {
            print_field_table(result_of(value));
            print_envelope_notes(value);
        }
        other => println!("{}", format_value(other)),
    }
}

fn print_field_table(result: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(result) {
        builder.push_record([key, format_value(&val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Value) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(first) = arr.first().filter(|v| v.is_object()) else {
        for item in arr {
            println!("{}", format_value(item));
        }
        return;
    };

    let headers: Vec<String> = flatten(first).into_iter().map(|(k, _)| k).collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for item in arr {
        let cells: Vec<(String, Value)> = flatten(item);
        let row: Vec<String> = headers
            .iter()
            .map(|h| {
                cells
                    .iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| format_value(v))
                    .unwrap_or_default()
            })
            .collect();
        builder.push_record(row);
    }

    println!("{}", Table::from(builder));
}
