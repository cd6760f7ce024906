mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::Value;
use std::process;

use commands::analysis::AnalyzeArgs;
use commands::benchmarks::{BenchmarkArgs, CompareArgs};
use commands::ingest::IngestArgs;
use fincheck_core::benchmarks::table::default_table;

/// SME financial health scoring and industry benchmarking
#[derive(Parser)]
#[command(
    name = "fincheck",
    version,
    about = "SME financial health scoring and industry benchmarking",
    long_about = "Scores a small business's periodic financials on cash-flow stability, \
                  expense ratio, working capital and debt burden, grades its \
                  creditworthiness, and compares it against industry benchmarks."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Replacement benchmark table (JSON or YAML)
    #[arg(long, env = "FINCHECK_BENCHMARKS", global = true)]
    benchmarks: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score periodic financials and grade creditworthiness
    Analyze(AnalyzeArgs),
    /// Detect financial columns in a CSV file and extract the series
    Ingest(IngestArgs),
    /// Compare an analysis against an industry benchmark
    Compare(CompareArgs),
    /// List benchmark industries
    Industries,
    /// Show one industry benchmark
    Benchmark(BenchmarkArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    if let Commands::Version = cli.command {
        println!("fincheck {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    match run(cli.command, cli.benchmarks.as_deref()) {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

fn run(command: Commands, benchmarks: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let custom = benchmarks.map(config::load_benchmarks).transpose()?;
    let table = custom.as_ref().unwrap_or_else(|| default_table());

    match command {
        Commands::Analyze(args) => commands::analysis::run_analyze(args),
        Commands::Ingest(args) => commands::ingest::run_ingest(args),
        Commands::Compare(args) => commands::benchmarks::run_compare(args, table),
        Commands::Industries => commands::benchmarks::run_industries(table),
        Commands::Benchmark(args) => commands::benchmarks::run_benchmark(args, table),
        Commands::Version => Ok(Value::String(env!("CARGO_PKG_VERSION").to_string())),
    }
}
