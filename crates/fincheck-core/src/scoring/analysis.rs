use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use super::creditworthiness::{
    aggregate_creditworthiness, CreditResult, CreditStatus, MetricKind,
};
use super::metrics::{
    score_cash_flow, score_debt_burden, score_expense_ratio, score_working_capital,
    MetricResult,
};
use crate::{types::*, FincheckError, FincheckResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Full output contract of one scoring run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub cash_flow_stability: MetricResult,
    pub expense_ratio: MetricResult,
    pub working_capital: MetricResult,
    pub debt_burden: MetricResult,
    pub creditworthiness: CreditResult,
    pub overall_health: CreditStatus,
}

impl AnalysisResult {
    pub fn metric(&self, kind: MetricKind) -> &MetricResult {
        match kind {
            MetricKind::CashFlowStability => &self.cash_flow_stability,
            MetricKind::ExpenseRatio => &self.expense_ratio,
            MetricKind::WorkingCapital => &self.working_capital,
            MetricKind::DebtBurden => &self.debt_burden,
        }
    }
}

/// Request envelope as delivered by the upload front end. Either field may
/// be absent on the wire; scoring requires `financial_data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_data: Option<FinancialSeries>,
}

impl AnalysisRequest {
    pub fn run(&self) -> FincheckResult<ComputationOutput<AnalysisResult>> {
        let data = self
            .financial_data
            .as_ref()
            .ok_or_else(|| FincheckError::MissingPayload {
                field: "financial_data".into(),
            })?;
        Ok(analyze(data))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score every dimension, then grade the business.
pub fn analyze(data: &FinancialSeries) -> ComputationOutput<AnalysisResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if !data.cash_inflow.is_empty()
        && !data.cash_outflow.is_empty()
        && data.cash_inflow.len() != data.cash_outflow.len()
    {
        let kept = data.cash_inflow.len().min(data.cash_outflow.len());
        warnings.push(format!(
            "cash_inflow has {} periods and cash_outflow has {}; only the first {} are paired.",
            data.cash_inflow.len(),
            data.cash_outflow.len(),
            kept
        ));
    }

    let cash_flow_stability = score_cash_flow(&data.cash_inflow, &data.cash_outflow);
    let expense_ratio = score_expense_ratio(&data.revenue, &data.expenses);
    let working_capital = score_working_capital(&data.receivables, &data.payables);
    let debt_burden = score_debt_burden(&data.revenue, &data.loans, &data.emi);

    let scores: BTreeMap<MetricKind, MetricResult> = [
        (MetricKind::CashFlowStability, cash_flow_stability.clone()),
        (MetricKind::ExpenseRatio, expense_ratio.clone()),
        (MetricKind::WorkingCapital, working_capital.clone()),
        (MetricKind::DebtBurden, debt_burden.clone()),
    ]
    .into_iter()
    .collect();

    for (kind, metric) in &scores {
        if metric.is_insufficient() {
            warnings.push(format!(
                "{kind}: insufficient data; neutral score {} used.",
                metric.score
            ));
        }
    }

    let creditworthiness = aggregate_creditworthiness(&scores);
    tracing::debug!(
        score = creditworthiness.score,
        grade = %creditworthiness.grade,
        warnings = warnings.len(),
        "scored financial health"
    );

    let output = AnalysisResult {
        cash_flow_stability,
        expense_ratio,
        working_capital,
        debt_burden,
        overall_health: creditworthiness.status,
        creditworthiness,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "weights": MetricKind::ALL
            .iter()
            .map(|k| (k.as_str(), k.weight().to_string()))
            .collect::<BTreeMap<_, _>>(),
        "missing_series": "neutral score 50",
        "cash_flow_pairing": "pairwise; trailing periods of the longer series dropped",
        "debt_to_revenue_cap": "100% inside the combined debt ratio",
    });

    with_metadata(
        "Weighted SME financial health scorecard",
        &assumptions,
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
