use fincheck_core::ingest::columns::detect_columns;
use fincheck_core::ingest::tabular::{ingest_table, RawTable};
use fincheck_core::scoring::analysis::analyze;
use fincheck_core::scoring::metrics::MetricStatus;
use fincheck_core::{FincheckError, SeriesField};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable {
        headers: headers.iter().map(|s| s.to_string()).collect(),
        rows: rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    }
}

#[test]
fn test_spreadsheet_style_headers() {
    let labels = [
        "Period",
        "Gross Revenue",
        "Operating Expenses",
        "Cash Receipts",
        "Disbursements",
        "Debtors",
        "Creditors",
        "Outstanding Loans",
        "Monthly Payment",
    ];
    let mapping = detect_columns(&labels);
    assert_eq!(mapping.len(), 8);
    assert_eq!(mapping[&SeriesField::CashInflow], "Cash Receipts");
    assert_eq!(mapping[&SeriesField::CashOutflow], "Disbursements");
    assert_eq!(mapping[&SeriesField::Emi], "Monthly Payment");
}

#[test]
fn test_ingested_table_feeds_analysis() {
    let table = raw(
        &["month", "sales", "costs", "cash_in", "cash_out"],
        &[
            &["jan", "100", "50", "100", "70"],
            &["feb", "100", "50", "100", "70"],
            &["mar", "100", "50", "100", "70"],
        ],
    );
    let ingested = ingest_table(&table).unwrap();
    assert_eq!(ingested.summary.columns_detected.len(), 4);
    assert_eq!(ingested.financial_data.cash_outflow, vec![dec!(70); 3]);

    let out = analyze(&ingested.financial_data).result;
    assert_eq!(out.expense_ratio.status, MetricStatus::Excellent);
    assert_eq!(out.cash_flow_stability.score, 100);
    assert_eq!(out.working_capital.status, MetricStatus::Unknown);
}

#[test]
fn test_summary_serializes_like_upload_response() {
    let table = raw(
        &["Revenue", "Expenses", "Loans"],
        &[&["10", "5", "1"]],
    );
    let ingested = ingest_table(&table).unwrap();
    let json = serde_json::to_value(&ingested).unwrap();
    assert_eq!(json["summary"]["total_rows"], 1);
    assert_eq!(
        json["summary"]["columns_detected"],
        serde_json::json!(["revenue", "expenses", "loans"])
    );
    assert_eq!(json["summary"]["column_mapping"]["loans"], "Loans");
    assert_eq!(json["summary"]["preview"][0]["Revenue"], "10");
    assert_eq!(json["financial_data"]["revenue"], serde_json::json!(["10"]));
}

#[test]
fn test_too_few_columns_reported_as_ingestion_failure() {
    let table = raw(&["date", "revenue", "notes"], &[&["2024-01", "100", "ok"]]);
    assert!(matches!(
        ingest_table(&table),
        Err(FincheckError::IngestionFailure(_))
    ));
}
