use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::bands::{render, Band, Ladder, Verdict};
use crate::types::*;

/// Score reported when a required series is missing.
pub const NEUTRAL_SCORE: Score = 50;

/// Highest score any metric can report.
pub const MAX_SCORE: Score = 100;

/// Cap on debt-to-revenue inside the combined debt ratio.
const DEBT_TO_REVENUE_CAP: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Unknown,
    Excellent,
    Healthy,
    Moderate,
    Warning,
    Critical,
    AtRisk,
}

impl std::fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Excellent => "excellent",
            Self::Healthy => "healthy",
            Self::Moderate => "moderate",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::AtRisk => "at_risk",
        };
        write!(f, "{}", s)
    }
}

/// One normalized sub-score. Extras only appear for the metrics that
/// derive them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricResult {
    pub score: Score,
    pub status: MetricStatus,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_service_ratio: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_to_revenue: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability_ratio: Option<Decimal>,
}

impl MetricResult {
    fn new(score: Score, status: MetricStatus, explanation: impl Into<String>) -> Self {
        MetricResult {
            score,
            status,
            explanation: explanation.into(),
            ratio: None,
            gap: None,
            debt_service_ratio: None,
            debt_to_revenue: None,
            stability_ratio: None,
        }
    }

    /// Neutral midpoint returned when a required series is empty.
    pub fn insufficient(explanation: impl Into<String>) -> Self {
        Self::new(NEUTRAL_SCORE, MetricStatus::Unknown, explanation)
    }

    pub fn is_insufficient(&self) -> bool {
        self.status == MetricStatus::Unknown
    }
}

// ---------------------------------------------------------------------------
// Threshold ladders
// ---------------------------------------------------------------------------

static CASH_FLOW_BANDS: [Band<(MetricStatus, &str)>; 2] = [
    Band::at_least(
        dec!(70),
        (
            MetricStatus::Healthy,
            "Your cash flow is stable with consistent positive net flows.",
        ),
    ),
    Band::at_least(
        dec!(50),
        (
            MetricStatus::Moderate,
            "Your cash flow shows some variability. Consider building cash reserves.",
        ),
    ),
];

static CASH_FLOW_LADDER: Ladder<(MetricStatus, &str)> = Ladder::new(
    &CASH_FLOW_BANDS,
    (
        MetricStatus::AtRisk,
        "Your cash flow is unstable. Immediate attention to cash management is needed.",
    ),
);

static EXPENSE_RATIO_BANDS: [Band<Verdict<MetricStatus>>; 4] = [
    Band::below(
        dec!(60),
        Verdict::new(
            100,
            MetricStatus::Excellent,
            "Excellent expense management! Your expenses are {value}% of revenue.",
        ),
    ),
    Band::below(
        dec!(75),
        Verdict::new(
            80,
            MetricStatus::Healthy,
            "Good expense control. Expenses at {value}% of revenue.",
        ),
    ),
    Band::below(
        dec!(90),
        Verdict::new(
            60,
            MetricStatus::Moderate,
            "Expenses at {value}% of revenue. Look for cost optimization opportunities.",
        ),
    ),
    Band::below(
        dec!(100),
        Verdict::new(
            40,
            MetricStatus::Warning,
            "High expenses at {value}% of revenue. Profitability is at risk.",
        ),
    ),
];

static EXPENSE_RATIO_LADDER: Ladder<Verdict<MetricStatus>> = Ladder::new(
    &EXPENSE_RATIO_BANDS,
    Verdict::new(
        20,
        MetricStatus::Critical,
        "Expenses exceed revenue at {value}%. Urgent cost reduction needed.",
    ),
);

static WORKING_CAPITAL_BANDS: [Band<Verdict<MetricStatus>>; 3] = [
    Band::below(
        Decimal::ZERO,
        Verdict::new(
            90,
            MetricStatus::Excellent,
            "You collect faster than you pay. Strong working capital position.",
        ),
    ),
    Band::below(
        dec!(0.5),
        Verdict::new(
            70,
            MetricStatus::Healthy,
            "Balanced working capital. Collections and payments are well managed.",
        ),
    ),
    Band::below(
        Decimal::ONE,
        Verdict::new(
            50,
            MetricStatus::Moderate,
            "Working capital gap is widening. Consider faster collection strategies.",
        ),
    ),
];

static WORKING_CAPITAL_LADDER: Ladder<Verdict<MetricStatus>> = Ladder::new(
    &WORKING_CAPITAL_BANDS,
    Verdict::new(
        30,
        MetricStatus::AtRisk,
        "Significant working capital gap. May face cash flow issues.",
    ),
);

static DEBT_BURDEN_BANDS: [Band<Verdict<MetricStatus>>; 4] = [
    Band::below(
        dec!(15),
        Verdict::new(
            95,
            MetricStatus::Excellent,
            "Very low debt burden. Strong financial position.",
        ),
    ),
    Band::below(
        dec!(30),
        Verdict::new(
            80,
            MetricStatus::Healthy,
            "Manageable debt levels. Good capacity for growth.",
        ),
    ),
    Band::below(
        dec!(50),
        Verdict::new(
            60,
            MetricStatus::Moderate,
            "Moderate debt burden. Be cautious with additional borrowing.",
        ),
    ),
    Band::below(
        dec!(70),
        Verdict::new(
            40,
            MetricStatus::Warning,
            "High debt burden. Focus on debt reduction.",
        ),
    ),
];

static DEBT_BURDEN_LADDER: Ladder<Verdict<MetricStatus>> = Ladder::new(
    &DEBT_BURDEN_BANDS,
    Verdict::new(
        20,
        MetricStatus::Critical,
        "Very high debt burden. Debt restructuring may be needed.",
    ),
);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Cash flow stability from period inflows and outflows.
///
/// Net flow is taken pairwise, so trailing periods of the longer series are
/// dropped. Dispersion is measured over the full inflow series.
pub fn score_cash_flow(inflow: &[Money], outflow: &[Money]) -> MetricResult {
    if inflow.is_empty() || outflow.is_empty() {
        return MetricResult::insufficient("Insufficient cash flow data");
    }

    // A period's net flow is positive exactly when inflow exceeds outflow.
    let paired = inflow.len().min(outflow.len());
    let positive = inflow.iter().zip(outflow).filter(|(i, o)| i > o).count();
    let positive_periods = Decimal::from(positive as u64);
    let periods = Decimal::from(paired as u64);
    let stability_ratio = positive_periods / periods;

    let cv = coefficient_of_variation(inflow).min(Decimal::ONE);
    // Scale before dividing so whole-period fractions stay exact (1/3 * 60 = 20).
    let score =
        to_score(positive_periods * dec!(60) / periods + (Decimal::ONE - cv) * dec!(40));

    let (status, explanation) = *CASH_FLOW_LADDER.evaluate(Decimal::from(score));
    let mut result = MetricResult::new(score, status, explanation);
    result.stability_ratio = Some(stability_ratio.round_dp(4));
    result
}

/// Total expenses as a percentage of total revenue.
pub fn score_expense_ratio(revenue: &[Money], expenses: &[Money]) -> MetricResult {
    if revenue.is_empty() || expenses.is_empty() {
        let mut result = MetricResult::insufficient("Insufficient data");
        result.ratio = Some(Decimal::ZERO);
        return result;
    }

    let total_revenue = sum(revenue);
    if total_revenue.is_zero() {
        let mut result = MetricResult::new(0, MetricStatus::Critical, "No revenue recorded");
        result.ratio = Some(dec!(100));
        return result;
    }

    let ratio = percent_of(sum(expenses), total_revenue);
    let verdict = EXPENSE_RATIO_LADDER.evaluate(ratio);

    let mut result = MetricResult::new(
        verdict.score,
        verdict.status,
        render(verdict.template, ratio),
    );
    result.ratio = Some(ratio.round_dp(2));
    result
}

/// Average receivables against average payables.
pub fn score_working_capital(receivables: &[Money], payables: &[Money]) -> MetricResult {
    if receivables.is_empty() || payables.is_empty() {
        let mut result = MetricResult::insufficient("Insufficient data");
        result.gap = Some(Decimal::ZERO);
        return result;
    }

    let avg_receivables = mean(receivables);
    let avg_payables = mean(payables);
    let gap = avg_receivables.saturating_sub(avg_payables);

    let gap_ratio = if avg_payables > Decimal::ZERO {
        saturating_div(gap, avg_payables)
    } else {
        Decimal::ZERO
    };

    let verdict = WORKING_CAPITAL_LADDER.evaluate(gap_ratio);
    let mut result = MetricResult::new(verdict.score, verdict.status, verdict.template);
    result.gap = Some(gap.round_dp(2));
    result
}

/// Debt service (EMI) and outstanding loans relative to revenue.
///
/// Missing loan or EMI series count as zero; only revenue is required.
pub fn score_debt_burden(revenue: &[Money], loans: &[Money], emi: &[Money]) -> MetricResult {
    if revenue.is_empty() {
        let mut result = MetricResult::insufficient("Insufficient data");
        result.ratio = Some(Decimal::ZERO);
        return result;
    }

    let total_revenue = sum(revenue);
    if total_revenue.is_zero() {
        let mut result =
            MetricResult::new(0, MetricStatus::Critical, "No revenue to service debt");
        result.ratio = Some(dec!(100));
        return result;
    }

    let debt_service_ratio = percent_of(sum(emi), total_revenue);
    let debt_to_revenue = percent_of(sum(loans), total_revenue);
    let combined = debt_service_ratio
        .saturating_mul(dec!(0.6))
        .saturating_add(debt_to_revenue.min(DEBT_TO_REVENUE_CAP) * dec!(0.4));

    let verdict = DEBT_BURDEN_LADDER.evaluate(combined);
    let mut result = MetricResult::new(verdict.score, verdict.status, verdict.template);
    result.ratio = Some(combined.round_dp(2));
    result.debt_service_ratio = Some(debt_service_ratio.round_dp(2));
    result.debt_to_revenue = Some(debt_to_revenue.round_dp(2));
    result
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Sum that pins at `Decimal::MAX`/`MIN` instead of overflowing.
fn sum(values: &[Money]) -> Money {
    values
        .iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
}

/// Arithmetic mean; zero for an empty slice.
fn mean(values: &[Money]) -> Money {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    sum(values) / Decimal::from(values.len() as u64)
}

/// `numerator / denominator`, pinned to the signed extreme when the quotient
/// is out of range. `denominator` must be non-zero.
pub(crate) fn saturating_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or_else(|| {
        if numerator.is_sign_negative() == denominator.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

/// `part` as a percentage of `whole`, scaled before dividing where it fits.
/// `whole` must be non-zero.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Percent {
    match part.checked_mul(dec!(100)) {
        Some(scaled) => saturating_div(scaled, whole),
        None => saturating_div(part, whole).saturating_mul(dec!(100)),
    }
}

/// Population standard deviation over mean. A non-positive mean has no
/// meaningful dispersion and is treated as maximally volatile (1), as is a
/// series whose spread is too wide to represent.
fn coefficient_of_variation(values: &[Money]) -> Decimal {
    dispersion(values).unwrap_or(Decimal::ONE)
}

fn dispersion(values: &[Money]) -> Option<Decimal> {
    let n = Decimal::from(values.len() as u64);
    let avg = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?
        .checked_div(n)?;
    if avg <= Decimal::ZERO {
        return None;
    }
    let squares = values.iter().try_fold(Decimal::ZERO, |acc, v| {
        let deviation = v.checked_sub(avg)?;
        acc.checked_add(deviation.checked_mul(deviation)?)
    })?;
    let std_dev = squares.checked_div(n)?.sqrt().unwrap_or(Decimal::ZERO);
    std_dev.checked_div(avg)
}

/// Clamp to [0, 100] and truncate toward zero.
fn to_score(raw: Decimal) -> Score {
    raw.max(Decimal::ZERO)
        .min(Decimal::from(MAX_SCORE))
        .trunc()
        .to_u32()
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
