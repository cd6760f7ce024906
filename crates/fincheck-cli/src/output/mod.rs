pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;
use std::io::{self, Write};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    let mut out = io::stdout().lock();
    let written = serde_json::to_writer_pretty(&mut out, value)
        .map_err(io::Error::from)
        .and_then(|_| writeln!(out));
    if let Err(e) = written {
        eprintln!("JSON serialization error: {}", e);
    }
}

/// The `result` of a computation envelope, or the value itself.
pub fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .filter(|m| m.contains_key("metadata"))
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Nested objects become dotted keys (`creditworthiness.grade`); arrays and
/// scalars are kept as leaf values.
pub fn flatten(value: &Value) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    flatten_into("", value, &mut rows);
    rows
}

fn flatten_into(prefix: &str, value: &Value, rows: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(&path, val, rows);
            }
        }
        other => rows.push((prefix.to_string(), other.clone())),
    }
}

/// Render a leaf for text output.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_flatten_nests_with_dots() {
        let value = json!({
            "creditworthiness": { "grade": "B", "score": 70 },
            "overall_health": "good",
        });
        let keys: Vec<String> = flatten(&value).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["creditworthiness.grade", "creditworthiness.score", "overall_health"]
        );
    }

    #[test]
    fn test_result_of_unwraps_envelope_only() {
        let envelope = json!({ "result": { "a": 1 }, "metadata": {} });
        assert_eq!(result_of(&envelope), &json!({ "a": 1 }));

        let bare = json!({ "result": "kept" });
        assert_eq!(result_of(&bare), &bare);
    }

    #[test]
    fn test_format_value_joins_arrays() {
        assert_eq!(format_value(&json!(["1", "2"])), "1, 2");
        assert_eq!(format_value(&Value::Null), "");
    }
}
