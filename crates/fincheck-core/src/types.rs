use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Ratios expressed as percentages (50 = 50%), as reported to consumers.
pub type Percent = Decimal;

/// Normalized health score on the 0–100 scale.
pub type Score = u32;

/// The eight canonical series a scoring run consumes, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesField {
    Revenue,
    Expenses,
    CashInflow,
    CashOutflow,
    Receivables,
    Payables,
    Loans,
    Emi,
}

impl SeriesField {
    pub const ALL: [SeriesField; 8] = [
        SeriesField::Revenue,
        SeriesField::Expenses,
        SeriesField::CashInflow,
        SeriesField::CashOutflow,
        SeriesField::Receivables,
        SeriesField::Payables,
        SeriesField::Loans,
        SeriesField::Emi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Expenses => "expenses",
            Self::CashInflow => "cash_inflow",
            Self::CashOutflow => "cash_outflow",
            Self::Receivables => "receivables",
            Self::Payables => "payables",
            Self::Loans => "loans",
            Self::Emi => "emi",
        }
    }
}

impl std::fmt::Display for SeriesField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-period financial data for one business. Missing series deserialize
/// as empty and are treated as "insufficient data", never as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialSeries {
    pub revenue: Vec<Money>,
    pub expenses: Vec<Money>,
    pub cash_inflow: Vec<Money>,
    pub cash_outflow: Vec<Money>,
    pub receivables: Vec<Money>,
    pub payables: Vec<Money>,
    pub loans: Vec<Money>,
    pub emi: Vec<Money>,
}

impl FinancialSeries {
    pub fn get(&self, field: SeriesField) -> &[Money] {
        match field {
            SeriesField::Revenue => &self.revenue,
            SeriesField::Expenses => &self.expenses,
            SeriesField::CashInflow => &self.cash_inflow,
            SeriesField::CashOutflow => &self.cash_outflow,
            SeriesField::Receivables => &self.receivables,
            SeriesField::Payables => &self.payables,
            SeriesField::Loans => &self.loans,
            SeriesField::Emi => &self.emi,
        }
    }

    pub fn set(&mut self, field: SeriesField, values: Vec<Money>) {
        let slot = match field {
            SeriesField::Revenue => &mut self.revenue,
            SeriesField::Expenses => &mut self.expenses,
            SeriesField::CashInflow => &mut self.cash_inflow,
            SeriesField::CashOutflow => &mut self.cash_outflow,
            SeriesField::Receivables => &mut self.receivables,
            SeriesField::Payables => &mut self.payables,
            SeriesField::Loans => &mut self.loans,
            SeriesField::Emi => &mut self.emi,
        };
        *slot = values;
    }

    /// Fields holding at least one value.
    pub fn populated_fields(&self) -> Vec<SeriesField> {
        SeriesField::ALL
            .into_iter()
            .filter(|f| !self.get(*f).is_empty())
            .collect()
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
