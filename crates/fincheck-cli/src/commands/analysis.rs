use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincheck_core::ingest::tabular::ingest_table;
use fincheck_core::scoring::analysis::{analyze, AnalysisRequest, AnalysisResult};
use fincheck_core::{ComputationOutput, FinancialSeries};

use crate::input;

/// Arguments for a scoring run
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AnalyzeArgs {
    /// Path to JSON input file: a financial series or an upload request
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a CSV upload; columns are detected automatically
    #[arg(long, conflicts_with = "input")]
    pub csv: Option<String>,

    /// Revenue per period, comma separated
    #[arg(long, value_delimiter = ',')]
    pub revenue: Vec<Decimal>,

    /// Expenses per period
    #[arg(long, value_delimiter = ',')]
    pub expenses: Vec<Decimal>,

    /// Cash inflow per period
    #[arg(long, value_delimiter = ',')]
    pub cash_inflow: Vec<Decimal>,

    /// Cash outflow per period
    #[arg(long, value_delimiter = ',')]
    pub cash_outflow: Vec<Decimal>,

    /// Receivables per period
    #[arg(long, value_delimiter = ',', alias = "ar")]
    pub receivables: Vec<Decimal>,

    /// Payables per period
    #[arg(long, value_delimiter = ',', alias = "ap")]
    pub payables: Vec<Decimal>,

    /// Outstanding loans per period
    #[arg(long, value_delimiter = ',')]
    pub loans: Vec<Decimal>,

    /// Loan instalments (EMI) per period
    #[arg(long, value_delimiter = ',')]
    pub emi: Vec<Decimal>,
}

impl AnalyzeArgs {
    fn series(&self) -> FinancialSeries {
        FinancialSeries {
            revenue: self.revenue.clone(),
            expenses: self.expenses.clone(),
            cash_inflow: self.cash_inflow.clone(),
            cash_outflow: self.cash_outflow.clone(),
            receivables: self.receivables.clone(),
            payables: self.payables.clone(),
            loans: self.loans.clone(),
            emi: self.emi.clone(),
        }
    }
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = if let Some(ref path) = args.input {
        analyze_value(input::file::read_json_value(path)?)?
    } else if let Some(ref path) = args.csv {
        analyze_csv(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        analyze_value(data)?
    } else {
        let series = args.series();
        if series.populated_fields().is_empty() {
            return Err(
                "Provide --input, --csv, piped JSON, or at least one series flag such as --revenue"
                    .into(),
            );
        }
        analyze(&series)
    };
    Ok(serde_json::to_value(output)?)
}

/// Score a JSON document that is either a bare financial series or an upload
/// request carrying one under `financial_data`.
pub fn analyze_value(
    value: Value,
) -> Result<ComputationOutput<AnalysisResult>, Box<dyn std::error::Error>> {
    let is_request = value
        .as_object()
        .is_some_and(|m| m.contains_key("financial_data") || m.contains_key("upload_id"));

    if is_request {
        let request: AnalysisRequest = serde_json::from_value(value)?;
        Ok(request.run()?)
    } else {
        let series: FinancialSeries = serde_json::from_value(value)?;
        Ok(analyze(&series))
    }
}

/// Ingest a CSV upload and score the detected series.
pub fn analyze_csv(
    path: &str,
) -> Result<ComputationOutput<AnalysisResult>, Box<dyn std::error::Error>> {
    let table = input::csv_in::read_csv_table(path)?;
    let ingested = ingest_table(&table)?;
    tracing::debug!(
        columns = ?ingested.summary.columns_detected,
        "scoring ingested upload"
    );
    Ok(analyze(&ingested.financial_data))
}
