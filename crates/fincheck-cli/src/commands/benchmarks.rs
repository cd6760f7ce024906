use clap::Args;
use serde_json::Value;

use fincheck_core::benchmarks::comparison::BenchmarkRequest;
use fincheck_core::benchmarks::table::BenchmarkTable;
use fincheck_core::scoring::analysis::AnalysisResult;

use crate::commands::analysis::{analyze_csv, analyze_value};
use crate::input;

/// Arguments for an industry comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Industry id, e.g. retail or food_beverage; unknown ids use services
    #[arg(long)]
    pub industry: String,

    /// Path to an analysis result (bare or as printed by `analyze`)
    #[arg(long, conflicts_with_all = ["input", "csv"])]
    pub analysis: Option<String>,

    /// Path to a financial series to score before comparing
    #[arg(long, conflicts_with = "csv")]
    pub input: Option<String>,

    /// Path to a CSV upload to ingest and score before comparing
    #[arg(long)]
    pub csv: Option<String>,
}

/// Arguments for showing one benchmark
#[derive(Args)]
pub struct BenchmarkArgs {
    /// Industry id
    pub id: String,
}

pub fn run_compare(
    args: CompareArgs,
    table: &BenchmarkTable,
) -> Result<Value, Box<dyn std::error::Error>> {
    let analysis = if let Some(ref path) = args.analysis {
        analysis_from_value(input::file::read_json_value(path)?)?
    } else if let Some(ref path) = args.input {
        analysis_from_value(input::file::read_json_value(path)?)?
    } else if let Some(ref path) = args.csv {
        analyze_csv(path)?.result
    } else if let Some(data) = input::stdin::read_stdin()? {
        analysis_from_value(data)?
    } else {
        return Err("Provide --analysis, --input, --csv, or pipe JSON on stdin".into());
    };

    let request = BenchmarkRequest {
        industry: args.industry,
        analysis_data: Some(analysis),
    };
    let output = request.run_with(table)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_industries(table: &BenchmarkTable) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(table.list())?)
}

pub fn run_benchmark(
    args: BenchmarkArgs,
    table: &BenchmarkTable,
) -> Result<Value, Box<dyn std::error::Error>> {
    let benchmark = table.get(&args.id)?;
    Ok(serde_json::to_value(benchmark)?)
}

/// Accept an analysis result, the envelope `analyze` prints around one, or
/// raw financials that still need scoring.
pub fn analysis_from_value(value: Value) -> Result<AnalysisResult, Box<dyn std::error::Error>> {
    let value = match value {
        Value::Object(mut map) if map.contains_key("result") && map.contains_key("metadata") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    };

    let is_analysis = value
        .as_object()
        .is_some_and(|m| m.contains_key("creditworthiness"));
    if is_analysis {
        Ok(serde_json::from_value(value)?)
    } else {
        Ok(analyze_value(value)?.result)
    }
}
