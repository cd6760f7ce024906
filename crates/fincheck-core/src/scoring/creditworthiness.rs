use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::bands::{Band, Ladder};
use super::metrics::{MetricResult, MAX_SCORE, NEUTRAL_SCORE};
use crate::types::*;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The four sub-scores that feed the composite grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    CashFlowStability,
    ExpenseRatio,
    WorkingCapital,
    DebtBurden,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::CashFlowStability,
        MetricKind::ExpenseRatio,
        MetricKind::WorkingCapital,
        MetricKind::DebtBurden,
    ];

    /// Weight of this metric in the composite score.
    pub const fn weight(&self) -> Decimal {
        match self {
            Self::CashFlowStability => dec!(0.25),
            Self::ExpenseRatio => dec!(0.20),
            Self::WorkingCapital => dec!(0.20),
            Self::DebtBurden => dec!(0.35),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CashFlowStability => "cash_flow_stability",
            Self::ExpenseRatio => "expense_ratio",
            Self::WorkingCapital => "working_capital",
            Self::DebtBurden => "debt_burden",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl std::fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::VeryPoor => "very_poor",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditResult {
    pub score: Score,
    pub grade: Grade,
    pub status: CreditStatus,
    pub explanation: String,
}

// ---------------------------------------------------------------------------
// Grade ladder
// ---------------------------------------------------------------------------

type GradeOutcome = (Grade, CreditStatus, &'static str);

static GRADE_BANDS: [Band<GradeOutcome>; 4] = [
    Band::at_least(
        dec!(80),
        (
            Grade::A,
            CreditStatus::Excellent,
            "Excellent creditworthiness. Eligible for best loan terms.",
        ),
    ),
    Band::at_least(
        dec!(65),
        (
            Grade::B,
            CreditStatus::Good,
            "Good creditworthiness. Eligible for competitive loan products.",
        ),
    ),
    Band::at_least(
        dec!(50),
        (
            Grade::C,
            CreditStatus::Fair,
            "Fair creditworthiness. Some loan products may be available.",
        ),
    ),
    Band::at_least(
        dec!(35),
        (
            Grade::D,
            CreditStatus::Poor,
            "Below average creditworthiness. Limited financing options.",
        ),
    ),
];

static GRADE_LADDER: Ladder<GradeOutcome> = Ladder::new(
    &GRADE_BANDS,
    (
        Grade::E,
        CreditStatus::VeryPoor,
        "Poor creditworthiness. Consider improving finances before applying for credit.",
    ),
);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Combine sub-scores into a composite score and letter grade.
///
/// A metric missing from `scores` contributes the neutral score (50), so
/// partial input never fails.
pub fn aggregate_creditworthiness(scores: &BTreeMap<MetricKind, MetricResult>) -> CreditResult {
    let weighted: Decimal = MetricKind::ALL
        .iter()
        .map(|kind| {
            let score = scores.get(kind).map_or(NEUTRAL_SCORE, |m| m.score);
            Decimal::from(score) * kind.weight()
        })
        .sum();

    let score = weighted
        .max(Decimal::ZERO)
        .min(Decimal::from(MAX_SCORE))
        .trunc()
        .to_u32()
        .unwrap_or(0);

    let (grade, status, explanation) = *GRADE_LADDER.evaluate(Decimal::from(score));

    CreditResult {
        score,
        grade,
        status,
        explanation: explanation.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::metrics::MetricStatus;

    fn metric(score: Score) -> MetricResult {
        MetricResult {
            score,
            status: MetricStatus::Moderate,
            explanation: String::new(),
            ratio: None,
            gap: None,
            debt_service_ratio: None,
            debt_to_revenue: None,
            stability_ratio: None,
        }
    }

    fn all_at(scores: [Score; 4]) -> BTreeMap<MetricKind, MetricResult> {
        MetricKind::ALL
            .into_iter()
            .zip(scores)
            .map(|(k, s)| (k, metric(s)))
            .collect()
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: Decimal = MetricKind::ALL.iter().map(|k| k.weight()).sum();
        assert_eq!(total, Decimal::ONE);
    }

    #[test]
    fn test_all_neutral_is_grade_c() {
        let result = aggregate_creditworthiness(&all_at([50, 50, 50, 50]));
        assert_eq!(result.score, 50);
        assert_eq!(result.grade, Grade::C);
        assert_eq!(result.status, CreditStatus::Fair);
    }

    #[test]
    fn test_empty_input_defaults_to_neutral() {
        let result = aggregate_creditworthiness(&BTreeMap::new());
        assert_eq!(result.score, 50);
        assert_eq!(result.grade, Grade::C);
    }

    #[test]
    fn test_missing_metric_counts_as_fifty() {
        let mut scores = all_at([100, 100, 100, 100]);
        scores.remove(&MetricKind::DebtBurden);
        // 25 + 20 + 20 + 50*0.35 = 82.5 => 82
        let result = aggregate_creditworthiness(&scores);
        assert_eq!(result.score, 82);
        assert_eq!(result.grade, Grade::A);
    }

    #[test]
    fn test_weighted_sum_truncates() {
        // 70*0.25 + 80*0.2 + 70*0.2 + 95*0.35 = 17.5 + 16 + 14 + 33.25 = 80.75
        let result = aggregate_creditworthiness(&all_at([70, 80, 70, 95]));
        assert_eq!(result.score, 80);
        assert_eq!(result.grade, Grade::A);
    }

    #[test]
    fn test_grade_boundaries() {
        let cases = [
            (80, Grade::A, CreditStatus::Excellent),
            (79, Grade::B, CreditStatus::Good),
            (65, Grade::B, CreditStatus::Good),
            (64, Grade::C, CreditStatus::Fair),
            (50, Grade::C, CreditStatus::Fair),
            (49, Grade::D, CreditStatus::Poor),
            (35, Grade::D, CreditStatus::Poor),
            (34, Grade::E, CreditStatus::VeryPoor),
            (0, Grade::E, CreditStatus::VeryPoor),
        ];
        for (score, grade, status) in cases {
            let result = aggregate_creditworthiness(&all_at([score; 4]));
            assert_eq!(result.score, score);
            assert_eq!(result.grade, grade, "score {score}");
            assert_eq!(result.status, status, "score {score}");
        }
    }

    #[test]
    fn test_metric_kind_map_keys_deserialize() {
        let json = r#"{"debt_burden": {"score": 20, "status": "critical", "explanation": ""}}"#;
        let scores: BTreeMap<MetricKind, MetricResult> = serde_json::from_str(json).unwrap();
        // 50*0.65 + 20*0.35 = 32.5 + 7 = 39.5
        let result = aggregate_creditworthiness(&scores);
        assert_eq!(result.score, 39);
        assert_eq!(result.grade, Grade::D);
    }
}
