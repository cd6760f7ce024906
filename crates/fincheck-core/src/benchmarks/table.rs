//! Industry benchmark tables.
//!
//! A [`BenchmarkTable`] is immutable once built. The built-in table is
//! constructed on first use and shared read-only for the life of the
//! process; callers that need different reference figures build their own
//! table (for example from a JSON or YAML file) and pass it explicitly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::{types::*, FincheckError, FincheckResult};

/// Industry used when a comparison names an industry the table lacks.
pub const FALLBACK_INDUSTRY: &str = "services";

/// Version label of the built-in table.
pub const BUILTIN_VERSION: &str = "builtin-1";

// id, name, [expense_ratio, cash_flow_stability, working_capital_gap, debt_to_revenue, profit_margin]
const BUILTIN_ROWS: [(&str, &str, [Decimal; 5]); 10] = [
    ("retail", "Retail Trade", [dec!(75), dec!(65), dec!(30), dec!(40), dec!(8)]),
    ("manufacturing", "Manufacturing", [dec!(80), dec!(55), dec!(45), dec!(50), dec!(10)]),
    ("services", "Professional Services", [dec!(65), dec!(70), dec!(20), dec!(25), dec!(15)]),
    ("technology", "Technology", [dec!(70), dec!(60), dec!(15), dec!(20), dec!(20)]),
    ("healthcare", "Healthcare", [dec!(72), dec!(75), dec!(35), dec!(35), dec!(12)]),
    ("construction", "Construction", [dec!(85), dec!(45), dec!(50), dec!(55), dec!(6)]),
    ("food_beverage", "Food & Beverage", [dec!(78), dec!(55), dec!(25), dec!(45), dec!(7)]),
    ("logistics", "Logistics & Transport", [dec!(82), dec!(50), dec!(40), dec!(60), dec!(5)]),
    ("education", "Education", [dec!(70), dec!(80), dec!(10), dec!(15), dec!(18)]),
    ("agriculture", "Agriculture", [dec!(75), dec!(40), dec!(55), dec!(50), dec!(8)]),
];

static BUILTIN: LazyLock<BenchmarkTable> = LazyLock::new(BenchmarkTable::builtin);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Industry-average reference metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryBenchmark {
    pub id: String,
    pub name: String,
    pub expense_ratio: Percent,
    pub cash_flow_stability: Decimal,
    pub working_capital_gap: Decimal,
    pub debt_to_revenue: Percent,
    pub profit_margin: Percent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustrySummary {
    pub id: String,
    pub name: String,
}

/// Wire shape of a benchmark table file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkTableFile {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    pub industries: Vec<IndustryBenchmark>,
}

/// Validated, indexed set of industry benchmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BenchmarkTableFile", into = "BenchmarkTableFile")]
pub struct BenchmarkTable {
    version: String,
    as_of: Option<NaiveDate>,
    industries: Vec<IndustryBenchmark>,
    index: HashMap<String, usize>,
    fallback: usize,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl BenchmarkTable {
    /// Validate and index a set of benchmarks.
    ///
    /// Ids are normalized (see [`normalize_industry_id`]); the table must be
    /// non-empty, ids unique, and the fallback industry present.
    pub fn new(
        version: impl Into<String>,
        as_of: Option<NaiveDate>,
        industries: Vec<IndustryBenchmark>,
    ) -> FincheckResult<Self> {
        if industries.is_empty() {
            return Err(FincheckError::InvalidBenchmarkTable(
                "At least one industry is required.".into(),
            ));
        }

        let mut normalized = Vec::with_capacity(industries.len());
        let mut index = HashMap::with_capacity(industries.len());
        for (i, mut industry) in industries.into_iter().enumerate() {
            industry.id = normalize_industry_id(&industry.id);
            if industry.id.is_empty() {
                return Err(FincheckError::InvalidBenchmarkTable(format!(
                    "Industry at position {i} has an empty id."
                )));
            }
            if index.insert(industry.id.clone(), i).is_some() {
                return Err(FincheckError::InvalidBenchmarkTable(format!(
                    "Duplicate industry id '{}'.",
                    industry.id
                )));
            }
            normalized.push(industry);
        }

        let fallback = *index.get(FALLBACK_INDUSTRY).ok_or_else(|| {
            FincheckError::InvalidBenchmarkTable(format!(
                "Fallback industry '{FALLBACK_INDUSTRY}' is missing."
            ))
        })?;

        Ok(BenchmarkTable {
            version: version.into(),
            as_of,
            industries: normalized,
            index,
            fallback,
        })
    }

    /// The reference figures shipped with the engine.
    pub fn builtin() -> Self {
        let industries: Vec<IndustryBenchmark> = BUILTIN_ROWS
            .iter()
            .map(|(id, name, [er, cfs, wcg, dtr, pm])| IndustryBenchmark {
                id: id.to_string(),
                name: name.to_string(),
                expense_ratio: *er,
                cash_flow_stability: *cfs,
                working_capital_gap: *wcg,
                debt_to_revenue: *dtr,
                profit_margin: *pm,
            })
            .collect();

        let index: HashMap<String, usize> = industries
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id.clone(), i))
            .collect();
        let fallback = index.get(FALLBACK_INDUSTRY).copied().unwrap_or(0);

        BenchmarkTable {
            version: BUILTIN_VERSION.to_string(),
            as_of: None,
            industries,
            index,
            fallback,
        }
    }

    pub fn from_json(json: &str) -> FincheckResult<Self> {
        let file: BenchmarkTableFile = serde_json::from_str(json)?;
        Self::try_from(file)
    }
}

impl TryFrom<BenchmarkTableFile> for BenchmarkTable {
    type Error = FincheckError;

    fn try_from(file: BenchmarkTableFile) -> FincheckResult<Self> {
        BenchmarkTable::new(file.version, file.as_of, file.industries)
    }
}

impl From<BenchmarkTable> for BenchmarkTableFile {
    fn from(table: BenchmarkTable) -> Self {
        BenchmarkTableFile {
            version: table.version,
            as_of: table.as_of,
            industries: table.industries,
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

impl BenchmarkTable {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    pub fn len(&self) -> usize {
        self.industries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.industries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndustryBenchmark> {
        self.industries.iter()
    }

    /// Ids and display names in table order.
    pub fn list(&self) -> Vec<IndustrySummary> {
        self.industries
            .iter()
            .map(|b| IndustrySummary {
                id: b.id.clone(),
                name: b.name.clone(),
            })
            .collect()
    }

    /// Exact lookup after id normalization; no fallback.
    pub fn get(&self, industry_id: &str) -> FincheckResult<&IndustryBenchmark> {
        let id = normalize_industry_id(industry_id);
        self.index
            .get(&id)
            .map(|&i| &self.industries[i])
            .ok_or(FincheckError::UnknownIndustry(id))
    }

    /// Lookup that falls back to [`FALLBACK_INDUSTRY`]. The flag is true when
    /// the fallback was used.
    pub fn resolve(&self, industry_id: &str) -> (&IndustryBenchmark, bool) {
        match self.get(industry_id) {
            Ok(benchmark) => (benchmark, false),
            Err(_) => (&self.industries[self.fallback], true),
        }
    }
}

/// Lower-case and replace spaces with underscores ("Food Beverage" ->
/// "food_beverage"). Surrounding whitespace is ignored.
pub fn normalize_industry_id(industry_id: &str) -> String {
    industry_id.trim().to_lowercase().replace(' ', "_")
}

/// The shared built-in table.
pub fn default_table() -> &'static BenchmarkTable {
    &BUILTIN
}

/// Ids and names of the built-in industries.
pub fn list_benchmarks() -> Vec<IndustrySummary> {
    default_table().list()
}

/// One built-in industry, or [`FincheckError::UnknownIndustry`].
pub fn get_benchmark(industry_id: &str) -> FincheckResult<&'static IndustryBenchmark> {
    default_table().get(industry_id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
