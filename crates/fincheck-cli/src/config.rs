use std::path::Path;

use fincheck_core::benchmarks::table::{BenchmarkTable, BenchmarkTableFile};

use crate::input;

/// Load a replacement benchmark table. `.yaml`/`.yml` files are read as
/// YAML, anything else as JSON. The table is validated before use.
pub fn load_benchmarks(path: &str) -> Result<BenchmarkTable, Box<dyn std::error::Error>> {
    let is_yaml = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let file: BenchmarkTableFile = if is_yaml {
        let contents = input::file::read_text(path)?;
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", path, e))?
    } else {
        input::file::read_json(path)?
    };

    let table = BenchmarkTable::try_from(file)?;
    tracing::debug!(
        path,
        version = table.version(),
        industries = table.len(),
        "loaded benchmark table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML_TABLE: &str = "\
version: test-1
as_of: 2025-01-31
industries:
  - id: services
    name: Services
    expense_ratio: '60'
    cash_flow_stability: '70'
    working_capital_gap: '20'
    debt_to_revenue: '25'
    profit_margin: '15'
  - id: Craft Brewing
    name: Craft Brewing
    expense_ratio: '80'
    cash_flow_stability: '50'
    working_capital_gap: '30'
    debt_to_revenue: '45'
    profit_margin: '9'
";

    #[test]
    fn test_yaml_table_loads_and_normalizes_ids() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(YAML_TABLE.as_bytes()).unwrap();

        let table = load_benchmarks(file.path().to_str().unwrap()).unwrap();
        assert_eq!(table.version(), "test-1");
        assert_eq!(table.len(), 2);
        assert!(table.get("craft_brewing").is_ok());
    }

    #[test]
    fn test_table_without_fallback_rejected() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"version": "x", "industries": []}"#).unwrap();

        let err = load_benchmarks(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("At least one industry"));
    }
}
