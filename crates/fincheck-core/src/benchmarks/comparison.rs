use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::table::{default_table, BenchmarkTable, IndustryBenchmark, FALLBACK_INDUSTRY};
use crate::scoring::analysis::AnalysisResult;
use crate::scoring::metrics::percent_of;
use crate::{types::*, FincheckError, FincheckResult};

/// Relative differences inside ±5% are reported as on par.
pub const DEAD_ZONE_PCT: Decimal = dec!(5);

// Stand-ins when the analysis carries no figure for a compared metric.
const DEFAULT_EXPENSE_RATIO: Decimal = dec!(75);
const DEFAULT_DEBT_TO_REVENUE: Decimal = dec!(30);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    AboveAverage,
    Average,
    BelowAverage,
}

impl std::fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AboveAverage => "above_average",
            Self::Average => "average",
            Self::BelowAverage => "below_average",
        };
        write!(f, "{}", s)
    }
}

/// One metric measured against its industry reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub actual: Decimal,
    pub benchmark: Decimal,
    pub difference: Decimal,
    pub percentage_diff: Percent,
    pub status: ComparisonStatus,
    pub comparison: String,
    pub is_better: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparisons {
    pub expense_ratio: MetricComparison,
    pub cash_flow_stability: MetricComparison,
    pub working_capital_gap: MetricComparison,
    pub debt_to_revenue: MetricComparison,
}

impl Comparisons {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &MetricComparison)> {
        [
            ("expense_ratio", &self.expense_ratio),
            ("cash_flow_stability", &self.cash_flow_stability),
            ("working_capital_gap", &self.working_capital_gap),
            ("debt_to_revenue", &self.debt_to_revenue),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub industry: String,
    pub industry_name: String,
    pub comparisons: Comparisons,
    pub overall_status: ComparisonStatus,
    pub overall_message: String,
    pub better_metrics: usize,
    pub total_metrics: usize,
}

/// Comparison request as delivered by the front end. A missing analysis is
/// a malformed request, not a neutral comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRequest {
    pub industry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_data: Option<AnalysisResult>,
}

impl BenchmarkRequest {
    /// Compare against the built-in table.
    pub fn run(&self) -> FincheckResult<ComputationOutput<ComparisonResult>> {
        self.run_with(default_table())
    }

    pub fn run_with(
        &self,
        table: &BenchmarkTable,
    ) -> FincheckResult<ComputationOutput<ComparisonResult>> {
        let start = Instant::now();
        let analysis = self
            .analysis_data
            .as_ref()
            .ok_or_else(|| FincheckError::MissingPayload {
                field: "analysis_data".into(),
            })?;

        let mut warnings = Vec::new();
        let (benchmark, fell_back) = table.resolve(&self.industry);
        if fell_back {
            warnings.push(format!(
                "Industry '{}' not found; compared against '{FALLBACK_INDUSTRY}'.",
                self.industry
            ));
        }
        let output = compare_with(benchmark, analysis);

        let elapsed = start.elapsed().as_micros() as u64;
        let assumptions = serde_json::json!({
            "benchmark_table": table.version(),
            "dead_zone_pct": DEAD_ZONE_PCT.to_string(),
            "working_capital_gap": "absolute value of the business's gap",
            "lower_is_better": ["expense_ratio", "working_capital_gap", "debt_to_revenue"],
        });

        Ok(with_metadata(
            "Industry benchmark comparison",
            &assumptions,
            warnings,
            elapsed,
            output,
        ))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Measure `actual` against `benchmark`.
///
/// Inside the ±5% dead zone the status is `average` whatever the direction;
/// `is_better` still reports the raw direction.
pub fn compare_metric(actual: Decimal, benchmark: Decimal, higher_is_better: bool) -> MetricComparison {
    let difference = actual.saturating_sub(benchmark);
    let percentage_diff = if benchmark.is_zero() {
        Decimal::ZERO
    } else {
        percent_of(difference, benchmark)
    };

    let is_better = if higher_is_better {
        difference > Decimal::ZERO
    } else {
        difference < Decimal::ZERO
    };

    let (status, comparison) = if percentage_diff.abs() < DEAD_ZONE_PCT {
        (ComparisonStatus::Average, "on par with")
    } else if is_better {
        (ComparisonStatus::AboveAverage, "better than")
    } else {
        (ComparisonStatus::BelowAverage, "below")
    };

    MetricComparison {
        actual: actual.round_dp(2),
        benchmark,
        difference: difference.round_dp(2),
        percentage_diff: percentage_diff.round_dp(1),
        status,
        comparison: comparison.to_string(),
        is_better,
    }
}

/// Compare an analysis with the built-in benchmarks for `industry_id`,
/// falling back to the services industry for unknown ids.
pub fn compare_to_benchmark(industry_id: &str, analysis: &AnalysisResult) -> ComparisonResult {
    default_table().compare(industry_id, analysis)
}

impl BenchmarkTable {
    pub fn compare(&self, industry_id: &str, analysis: &AnalysisResult) -> ComparisonResult {
        let (benchmark, fell_back) = self.resolve(industry_id);
        if fell_back {
            tracing::debug!(
                requested = industry_id,
                fallback = FALLBACK_INDUSTRY,
                "unknown industry"
            );
        }
        compare_with(benchmark, analysis)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn compare_with(benchmark: &IndustryBenchmark, analysis: &AnalysisResult) -> ComparisonResult {
    let expense_actual = analysis
        .expense_ratio
        .ratio
        .unwrap_or(DEFAULT_EXPENSE_RATIO);
    let cash_flow_actual = Decimal::from(analysis.cash_flow_stability.score);
    // Gap direction is not comparable across business sizes; compare magnitude.
    let working_capital_actual = analysis.working_capital.gap.unwrap_or(Decimal::ZERO).abs();
    let debt_actual = analysis
        .debt_burden
        .debt_to_revenue
        .unwrap_or(DEFAULT_DEBT_TO_REVENUE);

    let comparisons = Comparisons {
        expense_ratio: compare_metric(expense_actual, benchmark.expense_ratio, false),
        cash_flow_stability: compare_metric(cash_flow_actual, benchmark.cash_flow_stability, true),
        working_capital_gap: compare_metric(
            working_capital_actual,
            benchmark.working_capital_gap,
            false,
        ),
        debt_to_revenue: compare_metric(debt_actual, benchmark.debt_to_revenue, false),
    };

    let total_metrics = comparisons.iter().count();
    let better_metrics = comparisons.iter().filter(|(_, c)| c.is_better).count();

    let (overall_status, overall_message) = if better_metrics >= 3 {
        (
            ComparisonStatus::AboveAverage,
            format!(
                "Your business outperforms the {} industry average in {} out of {} key metrics.",
                benchmark.name, better_metrics, total_metrics
            ),
        )
    } else if better_metrics >= 2 {
        (
            ComparisonStatus::Average,
            format!(
                "Your business is performing at par with the {} industry average.",
                benchmark.name
            ),
        )
    } else {
        (
            ComparisonStatus::BelowAverage,
            format!(
                "Your business is underperforming compared to the {} industry average. \
                 Focus on improvement areas.",
                benchmark.name
            ),
        )
    };

    tracing::debug!(
        industry = %benchmark.id,
        better_metrics,
        status = %overall_status,
        "compared against industry benchmark"
    );

    ComparisonResult {
        industry: benchmark.id.clone(),
        industry_name: benchmark.name.clone(),
        comparisons,
        overall_status,
        overall_message,
        better_metrics,
        total_metrics,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::analysis::analyze;

    #[test]
    fn test_dead_zone_is_average_either_direction() {
        for actual in [dec!(95.1), dec!(100), dec!(104.9)] {
            let c = compare_metric(actual, dec!(100), true);
            assert_eq!(c.status, ComparisonStatus::Average, "actual {actual}");
            assert_eq!(c.comparison, "on par with");
        }
    }

    #[test]
    fn test_outside_dead_zone_follows_direction() {
        let above = compare_metric(dec!(105), dec!(100), true);
        assert_eq!(above.status, ComparisonStatus::AboveAverage);
        assert_eq!(above.comparison, "better than");

        let below = compare_metric(dec!(95), dec!(100), true);
        assert_eq!(below.status, ComparisonStatus::BelowAverage);
        assert_eq!(below.comparison, "below");
    }

    #[test]
    fn test_lower_is_better_inverts_direction() {
        let c = compare_metric(dec!(50), dec!(70), false);
        assert!(c.is_better);
        assert_eq!(c.status, ComparisonStatus::AboveAverage);
    }

    #[test]
    fn test_is_better_reported_inside_dead_zone() {
        let c = compare_metric(dec!(102), dec!(100), true);
        assert_eq!(c.status, ComparisonStatus::Average);
        assert!(c.is_better);
    }

    #[test]
    fn test_expense_ratio_vs_technology() {
        let c = compare_metric(dec!(90), dec!(70), false);
        assert_eq!(c.percentage_diff, dec!(28.6));
        assert_eq!(c.difference, dec!(20));
        assert_eq!(c.status, ComparisonStatus::BelowAverage);
        assert!(!c.is_better);
    }

    #[test]
    fn test_out_of_range_difference_saturates() {
        let c = compare_metric(Decimal::MAX, dec!(0.001), false);
        assert_eq!(c.percentage_diff, Decimal::MAX);
        assert_eq!(c.status, ComparisonStatus::BelowAverage);
        assert!(!c.is_better);

        let c = compare_metric(Decimal::MIN, dec!(10), true);
        assert_eq!(c.difference, Decimal::MIN);
        assert_eq!(c.percentage_diff, Decimal::MIN);
        assert_eq!(c.status, ComparisonStatus::BelowAverage);
        assert!(!c.is_better);
    }

    #[test]
    fn test_zero_benchmark_gives_zero_percentage() {
        let c = compare_metric(dec!(10), Decimal::ZERO, false);
        assert_eq!(c.percentage_diff, Decimal::ZERO);
        assert_eq!(c.status, ComparisonStatus::Average);
        assert!(!c.is_better);
    }

    #[test]
    fn test_missing_ratios_use_stand_ins() {
        // Zero revenue: debt burden carries no debt_to_revenue figure.
        let data = FinancialSeries {
            revenue: vec![Decimal::ZERO],
            expenses: vec![dec!(10)],
            ..Default::default()
        };
        let analysis = analyze(&data).result;
        let result = compare_to_benchmark("services", &analysis);
        assert_eq!(result.comparisons.debt_to_revenue.actual, dec!(30));
        assert_eq!(result.comparisons.expense_ratio.actual, dec!(100));
        assert_eq!(result.comparisons.working_capital_gap.actual, Decimal::ZERO);
    }

    #[test]
    fn test_request_without_analysis_is_rejected() {
        let request = BenchmarkRequest {
            industry: "retail".into(),
            analysis_data: None,
        };
        match request.run().unwrap_err() {
            FincheckError::MissingPayload { field } => assert_eq!(field, "analysis_data"),
            other => panic!("Expected MissingPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_request_warns_on_fallback() {
        let analysis = analyze(&FinancialSeries::default()).result;
        let request = BenchmarkRequest {
            industry: "Quantum Widgets".into(),
            analysis_data: Some(analysis),
        };
        let out = request.run().unwrap();
        assert_eq!(out.result.industry, "services");
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.assumptions["benchmark_table"], "builtin-1");
    }
}
