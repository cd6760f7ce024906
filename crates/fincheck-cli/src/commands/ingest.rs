use clap::Args;
use serde_json::Value;

use fincheck_core::ingest::tabular::ingest_table;

use crate::input;

/// Arguments for column detection on an upload
#[derive(Args)]
pub struct IngestArgs {
    /// Path to the CSV upload
    #[arg(long)]
    pub csv: String,
}

pub fn run_ingest(args: IngestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = input::csv_in::read_csv_table(&args.csv)?;
    let ingested = ingest_table(&table)?;
    Ok(serde_json::json!({
        "message": "File processed successfully",
        "summary": ingested.summary,
        "financial_data": ingested.financial_data,
    }))
}
