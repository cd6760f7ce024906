use std::collections::BTreeMap;

use crate::types::SeriesField;

/// Canonical field -> the input label it was detected in, in canonical order.
pub type ColumnMapping = BTreeMap<SeriesField, String>;

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

/// Recognised spellings per canonical field. A normalized label matches when
/// it equals an alias or contains one, so short aliases such as `ar` also hit
/// labels like `year`.
pub fn aliases(field: SeriesField) -> &'static [&'static str] {
    match field {
        SeriesField::Revenue => &["revenue", "sales", "income", "total_revenue", "gross_revenue"],
        SeriesField::Expenses => &[
            "expenses",
            "costs",
            "expenditure",
            "total_expenses",
            "operating_expenses",
        ],
        SeriesField::CashInflow => &["cash_inflow", "cash_in", "receipts", "collections", "inflow"],
        SeriesField::CashOutflow => &[
            "cash_outflow",
            "cash_out",
            "payments",
            "disbursements",
            "outflow",
        ],
        SeriesField::Receivables => &[
            "receivables",
            "accounts_receivable",
            "ar",
            "debtors",
            "trade_receivables",
        ],
        SeriesField::Payables => &[
            "payables",
            "accounts_payable",
            "ap",
            "creditors",
            "trade_payables",
        ],
        SeriesField::Loans => &["loans", "debt", "borrowings", "loan_balance", "outstanding_loans"],
        SeriesField::Emi => &[
            "emi",
            "loan_payment",
            "installment",
            "monthly_payment",
            "repayment",
        ],
    }
}

/// Lower-case and replace spaces with underscores.
pub fn normalize_label(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Map input column labels onto canonical fields.
///
/// Fields are visited in canonical order; for each, the first label in input
/// order that matches wins. One label may satisfy several fields.
pub fn detect_columns<S: AsRef<str>>(labels: &[S]) -> ColumnMapping {
    let normalized: Vec<String> = labels.iter().map(|l| normalize_label(l.as_ref())).collect();

    let mut mapping = ColumnMapping::new();
    for field in SeriesField::ALL {
        let candidates = aliases(field);
        let hit = normalized
            .iter()
            .position(|label| candidates.iter().any(|alias| label.contains(alias)));
        if let Some(idx) = hit {
            mapping.insert(field, labels[idx].as_ref().to_string());
        }
    }
    mapping
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
