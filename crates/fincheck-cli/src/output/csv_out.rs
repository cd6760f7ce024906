use serde_json::Value;
use std::io;

use super::{flatten, format_value, result_of};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let written = match result_of(value) {
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        Value::Object(_) => write_field_csv(&mut wtr, result_of(value)),
        other => wtr.write_record([format_value(other)]),
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV output error: {}", e);
    }
}

/// Two-column CSV: field, value.
fn write_field_csv<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in flatten(result) {
        wtr.write_record([key, format_value(&val)])?;
    }
    Ok(())
}

/// One row per element, headers from the first element.
fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(first) = arr.first() else {
        return Ok(());
    };

    if !first.is_object() {
        for item in arr {
            wtr.write_record([format_value(item)])?;
        }
        return Ok(());
    }

    let headers: Vec<String> = flatten(first).into_iter().map(|(k, _)| k).collect();
    wtr.write_record(&headers)?;
    for item in arr {
        let cells = flatten(item);
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
        wtr.write_record(&row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(f: impl FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        f(&mut wtr).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_field_csv_flattens_result() {
        let result = json!({ "creditworthiness": { "grade": "A" }, "overall_health": "excellent" });
        let out = render(|w| write_field_csv(w, &result));
        assert_eq!(
            out,
            "field,value\ncreditworthiness.grade,A\noverall_health,excellent\n"
        );
    }

    #[test]
    fn test_array_csv_uses_first_row_headers() {
        let rows = json!([{ "id": "retail", "name": "Retail Trade" }, { "id": "education" }]);
        let out = render(|w| write_array_csv(w, rows.as_array().unwrap()));
        assert_eq!(out, "id,name\nretail,Retail Trade\neducation,\n");
    }
}
