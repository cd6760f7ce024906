use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::columns::{detect_columns, ColumnMapping};
use crate::types::{FinancialSeries, Money, SeriesField};
use crate::{FincheckError, FincheckResult};

/// Fewest detected fields an upload needs to be worth scoring.
pub const MIN_DETECTED_COLUMNS: usize = 3;

/// Rows echoed back in the ingestion summary.
pub const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// A header row plus data rows of raw cell text, as read from a spreadsheet.
/// Rows shorter than the header are treated as having empty trailing cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionSummary {
    pub total_rows: usize,
    pub columns_detected: Vec<SeriesField>,
    pub column_mapping: ColumnMapping,
    pub preview: Vec<PreviewRow>,
}

/// One echoed row as `header -> cell` pairs in upload column order.
/// Serializes as a JSON object; repeated headers are kept as repeated keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewRow(pub Vec<(String, String)>);

impl PreviewRow {
    /// Cell under the first column named `header`.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, cell)| cell.as_str())
    }
}

impl Serialize for PreviewRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (header, cell) in &self.0 {
            map.serialize_entry(header, cell)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PreviewRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PreviewRowVisitor;

        impl<'de> Visitor<'de> for PreviewRowVisitor {
            type Value = PreviewRow;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column header to cell text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PreviewRow, A::Error> {
                let mut cells = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, String>()? {
                    cells.push(entry);
                }
                Ok(PreviewRow(cells))
            }
        }

        deserializer.deserialize_map(PreviewRowVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestedData {
    pub summary: IngestionSummary,
    pub financial_data: FinancialSeries,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Turn a raw table into canonical series.
///
/// Each detected column is coerced cell by cell; blank or non-numeric cells
/// are dropped, so series may come out shorter than the table.
pub fn ingest_table(table: &RawTable) -> FincheckResult<IngestedData> {
    if table.rows.is_empty() || table.headers.is_empty() {
        return Err(FincheckError::IngestionFailure(
            "The uploaded file is empty.".into(),
        ));
    }

    let mapping = detect_columns(table.headers.as_slice());
    if mapping.len() < MIN_DETECTED_COLUMNS {
        return Err(FincheckError::IngestionFailure(
            "Could not detect enough financial columns. Please ensure your file has columns \
             for: revenue, expenses, cash flow, receivables, payables, or loans."
                .into(),
        ));
    }

    let mut financial_data = FinancialSeries::default();
    for (field, label) in &mapping {
        let Some(idx) = table.headers.iter().position(|h| h == label) else {
            continue;
        };
        let values: Vec<Money> = table
            .rows
            .iter()
            .filter_map(|row| row.get(idx))
            .filter_map(|cell| parse_cell(cell))
            .collect();
        let dropped = table.rows.len() - values.len();
        if dropped > 0 {
            tracing::debug!(field = %field, column = %label, dropped, "non-numeric cells dropped");
        }
        financial_data.set(*field, values);
    }

    let preview = table
        .rows
        .iter()
        .take(PREVIEW_ROWS)
        .map(|row| {
            PreviewRow(
                table
                    .headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| (h.clone(), row.get(i).cloned().unwrap_or_default()))
                    .collect(),
            )
        })
        .collect();

    tracing::debug!(
        rows = table.rows.len(),
        detected = mapping.len(),
        "ingested financial table"
    );

    Ok(IngestedData {
        summary: IngestionSummary {
            total_rows: table.rows.len(),
            columns_detected: mapping.keys().copied().collect(),
            column_mapping: mapping,
            preview,
        },
        financial_data,
    })
}

/// Numeric coercion of one cell; `None` for anything that is not a number.
pub fn parse_cell(cell: &str) -> Option<Money> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    Decimal::from_str(cell)
        .or_else(|_| Decimal::from_scientific(cell))
        .ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_ingest_three_columns() {
        let t = table(
            &["Month", "Revenue", "Expenses", "Loans"],
            &[&["Jan", "100", "80", "50"], &["Feb", "120", "90", "45"]],
        );
        let data = ingest_table(&t).unwrap();
        assert_eq!(data.summary.total_rows, 2);
        assert_eq!(
            data.summary.columns_detected,
            vec![SeriesField::Revenue, SeriesField::Expenses, SeriesField::Loans]
        );
        assert_eq!(data.financial_data.revenue, vec![dec!(100), dec!(120)]);
        assert_eq!(data.financial_data.loans, vec![dec!(50), dec!(45)]);
        assert!(data.financial_data.emi.is_empty());
    }

    #[test]
    fn test_non_numeric_cells_dropped() {
        let t = table(
            &["revenue", "expenses", "emi"],
            &[&["100", "n/a", "5"], &["", "80", "5"], &["1.5e2", "90", "x"]],
        );
        let data = ingest_table(&t).unwrap();
        assert_eq!(data.financial_data.revenue, vec![dec!(100), dec!(150)]);
        assert_eq!(data.financial_data.expenses, vec![dec!(80), dec!(90)]);
        assert_eq!(data.financial_data.emi, vec![dec!(5), dec!(5)]);
    }

    #[test]
    fn test_two_columns_is_a_failure() {
        let t = table(&["revenue", "expenses", "notes"], &[&["1", "2", "x"]]);
        match ingest_table(&t).unwrap_err() {
            FincheckError::IngestionFailure(msg) => {
                assert!(msg.starts_with("Could not detect enough financial columns."))
            }
            other => panic!("Expected IngestionFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_is_a_failure() {
        let t = table(&["revenue", "expenses", "loans"], &[]);
        match ingest_table(&t).unwrap_err() {
            FincheckError::IngestionFailure(msg) => assert_eq!(msg, "The uploaded file is empty."),
            other => panic!("Expected IngestionFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_preview_limited_to_five_rows() {
        let rows: Vec<Vec<&str>> = (0..8).map(|_| vec!["1", "2", "3"]).collect();
        let row_refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let t = table(&["revenue", "expenses", "loans"], &row_refs);
        let data = ingest_table(&t).unwrap();
        assert_eq!(data.summary.total_rows, 8);
        assert_eq!(data.summary.preview.len(), 5);
        assert_eq!(data.summary.preview[0].get("loans"), Some("3"));
    }

    #[test]
    fn test_short_rows_pad_preview() {
        let t = table(&["revenue", "expenses", "loans"], &[&["1", "2"]]);
        let data = ingest_table(&t).unwrap();
        assert_eq!(data.summary.preview[0].get("loans"), Some(""));
        assert!(data.financial_data.loans.is_empty());
    }

    #[test]
    fn test_preview_keeps_upload_column_order() {
        let t = table(
            &["Revenue", "Expenses", "Month", "Loans", "Revenue"],
            &[&["10", "8", "Jan", "3", "11"]],
        );
        let data = ingest_table(&t).unwrap();
        let row = &data.summary.preview[0];
        assert_eq!(row.0.len(), 5);
        assert_eq!(row.get("Revenue"), Some("10"));
        assert_eq!(
            serde_json::to_string(row).unwrap(),
            r#"{"Revenue":"10","Expenses":"8","Month":"Jan","Loans":"3","Revenue":"11"}"#
        );

        let back: PreviewRow =
            serde_json::from_str(r#"{"Month":"Jan","Amount":"5"}"#).unwrap();
        assert_eq!(
            back.0,
            vec![
                ("Month".to_string(), "Jan".to_string()),
                ("Amount".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(" 42.5 "), Some(dec!(42.5)));
        assert_eq!(parse_cell("-3"), Some(dec!(-3)));
        assert_eq!(parse_cell("2E3"), Some(dec!(2000)));
        assert_eq!(parse_cell("1,000"), None);
        assert_eq!(parse_cell(""), None);
    }
}
