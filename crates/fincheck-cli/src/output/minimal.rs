use serde_json::Value;

use super::{flatten, format_value, result_of};

/// Keys that answer "how did it go" for each command, most specific first.
const PRIORITY_KEYS: [&str; 4] = [
    "creditworthiness.grade",
    "overall_status",
    "summary.columns_detected",
    "id",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(result_of(value)));
}

fn minimal_line(result: &Value) -> String {
    if let Value::Array(arr) = result {
        return arr
            .iter()
            .map(|item| item.get("id").map_or_else(|| format_value(item), format_value))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let fields = flatten(result);
    for key in PRIORITY_KEYS {
        if let Some((_, val)) = fields.iter().find(|(k, v)| k == key && !v.is_null()) {
            return format_value(val);
        }
    }

    match fields.first() {
        Some((key, val)) if !key.is_empty() => format!("{}: {}", key, format_value(val)),
        Some((_, val)) => format_value(val),
        None => String::new(),
    }
}
