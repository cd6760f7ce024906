use napi::Result as NapiResult;
use napi_derive::napi;

use fincheck_core::benchmarks::{comparison, table};
use fincheck_core::ingest::{columns, tabular};
use fincheck_core::scoring::analysis;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Accepts an upload request (`{upload_id, financial_data}`); a missing
/// `financial_data` is rejected.
#[napi]
pub fn analyze(input_json: String) -> NapiResult<String> {
    let request: analysis::AnalysisRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = request.run().map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// `analysis_json` is the `result` of `analyze`. Unknown industries are
/// compared against services and flagged in `warnings`.
#[napi]
pub fn compare_to_benchmark(industry: String, analysis_json: String) -> NapiResult<String> {
    let analysis: Option<analysis::AnalysisResult> =
        serde_json::from_str(&analysis_json).map_err(to_napi_error)?;
    let request = comparison::BenchmarkRequest {
        industry,
        analysis_data: analysis,
    };
    let output = request.run().map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn list_benchmarks() -> NapiResult<String> {
    serde_json::to_string(&table::list_benchmarks()).map_err(to_napi_error)
}

#[napi]
pub fn get_benchmark(industry_id: String) -> NapiResult<String> {
    let benchmark = table::get_benchmark(&industry_id).map_err(to_napi_error)?;
    serde_json::to_string(benchmark).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// `labels_json` is a JSON array of column labels.
#[napi]
pub fn detect_columns(labels_json: String) -> NapiResult<String> {
    let labels: Vec<String> = serde_json::from_str(&labels_json).map_err(to_napi_error)?;
    serde_json::to_string(&columns::detect_columns(labels.as_slice())).map_err(to_napi_error)
}

/// `table_json` is `{headers: [..], rows: [[..], ..]}` of raw cell text.
#[napi]
pub fn ingest_table(table_json: String) -> NapiResult<String> {
    let raw: tabular::RawTable = serde_json::from_str(&table_json).map_err(to_napi_error)?;
    let ingested = tabular::ingest_table(&raw).map_err(to_napi_error)?;
    serde_json::to_string(&ingested).map_err(to_napi_error)
}
