use std::fs;
use std::path::Path;

use fincheck_core::ingest::tabular::RawTable;
use fincheck_core::FincheckError;

use super::file::resolve_path;

/// Largest upload accepted, in bytes.
pub const MAX_CSV_BYTES: u64 = 10 * 1024 * 1024;

/// Read a CSV file into a raw table of cell text. Ragged rows are kept as-is.
pub fn read_csv_table(path: &str) -> Result<RawTable, Box<dyn std::error::Error>> {
    let is_csv = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(FincheckError::InvalidInput {
            field: "csv".into(),
            reason: "Unsupported file format. Please upload a CSV file.".into(),
        }
        .into());
    }

    let canonical = resolve_path(path)?;
    let size = fs::metadata(&canonical)?.len();
    if size > MAX_CSV_BYTES {
        return Err(FincheckError::InvalidInput {
            field: "csv".into(),
            reason: "File size exceeds 10MB limit.".into(),
        }
        .into());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!(path, bytes = size, rows = rows.len(), "read csv upload");
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn csv_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_headers_and_rows() {
        let file = csv_file(".csv", "Month,Revenue,Expenses\nJan,100,80\nFeb,120\n");
        let table = read_csv_table(file.path().to_str().unwrap()).unwrap();
        assert_eq!(table.headers, vec!["Month", "Revenue", "Expenses"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["Feb", "120"]);
    }

    #[test]
    fn test_rejects_other_extensions() {
        let file = csv_file(".xlsx", "revenue\n1\n");
        let err = read_csv_table(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn test_rejects_oversized_files() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let line = "1,2,3\n".repeat(1024);
        file.write_all(b"revenue,expenses,loans\n").unwrap();
        while file.as_file().metadata().unwrap().len() <= MAX_CSV_BYTES {
            file.write_all(line.as_bytes()).unwrap();
        }
        let err = read_csv_table(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("10MB"));
    }

    #[test]
    fn test_missing_file_reported() {
        let err = read_csv_table("/nonexistent/upload.csv").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
