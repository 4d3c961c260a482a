//! Load batches of scenarios from CSV
//!
//! Columns: `scenario,baseline_debt,baseline_gdp,current_deficit,
//! spending_commitment,revenue_impact,duration_months,sectors` with sectors
//! separated by `;`. Cells are read as text so the normalizer sees them with
//! their original formatting.

use super::data::SimulationInput;
use super::normalizer::{self, fields};
use super::raw::RawInput;
use crate::error::EngineError;
use csv::Reader;
use std::path::Path;

/// Errors raised while loading a scenario file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read scenarios: {0}")]
    Csv(#[from] csv::Error),

    #[error("scenario `{scenario}` (row {row}) is invalid: {source}")]
    Invalid {
        row: usize,
        scenario: String,
        #[source]
        source: EngineError,
    },
}

/// A named, validated scenario
#[derive(Debug, Clone, PartialEq)]
pub struct NamedScenario {
    pub name: String,
    pub input: SimulationInput,
}

/// Raw CSV row; every cell is optional so absent values surface as
/// missing-field errors from the normalizer. Unrecognised columns are refused.
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct CsvRow {
    scenario: String,
    baseline_debt: Option<String>,
    baseline_gdp: Option<String>,
    current_deficit: Option<String>,
    spending_commitment: Option<String>,
    revenue_impact: Option<String>,
    duration_months: Option<String>,
    #[serde(default)]
    sectors: Option<String>,
}

impl CsvRow {
    fn to_raw(&self) -> RawInput {
        let mut raw = RawInput::new();
        let cells = [
            (fields::BASELINE_DEBT, &self.baseline_debt),
            (fields::BASELINE_GDP, &self.baseline_gdp),
            (fields::CURRENT_DEFICIT, &self.current_deficit),
            (fields::SPENDING_COMMITMENT, &self.spending_commitment),
            (fields::REVENUE_IMPACT, &self.revenue_impact),
            (fields::DURATION_MONTHS, &self.duration_months),
            (fields::SECTORS, &self.sectors),
        ];

        for (field, cell) in cells {
            if let Some(text) = cell.as_deref().filter(|t| !t.trim().is_empty()) {
                raw.set(field, text);
            }
        }
        raw
    }
}

/// Load and validate all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<NamedScenario>, LoadError> {
    let reader = Reader::from_path(path)?;
    collect_scenarios(reader)
}

/// Load scenarios from any reader (e.g., string buffer, request body)
pub fn load_scenarios_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<NamedScenario>, LoadError> {
    collect_scenarios(Reader::from_reader(reader))
}

fn collect_scenarios<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<NamedScenario>, LoadError> {
    let mut scenarios = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        let input = normalizer::normalize(&row.to_raw()).map_err(|source| LoadError::Invalid {
            row: index + 1,
            scenario: row.scenario.clone(),
            source,
        })?;

        scenarios.push(NamedScenario {
            name: row.scenario,
            input,
        });
    }

    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIOS: &str = "\
scenario,baseline_debt,baseline_gdp,current_deficit,spending_commitment,revenue_impact,duration_months,sectors
ubi_pilot,\"$24,500\",\"18,200\",5.4%,$4.2B,-1.5%,60,Social Welfare;Treasury
tax_reform,24500,18200,5.4,0,2.0,24,
";

    #[test]
    fn test_load_scenarios_from_reader() {
        let scenarios = load_scenarios_from_reader(SCENARIOS.as_bytes()).unwrap();
        assert_eq!(scenarios.len(), 2);

        let ubi = &scenarios[0];
        assert_eq!(ubi.name, "ubi_pilot");
        assert_eq!(ubi.input.baseline.baseline_debt, 24_500.0);
        assert_eq!(ubi.input.shock.sectors, vec!["Social Welfare", "Treasury"]);

        let reform = &scenarios[1];
        assert_eq!(reform.input.shock.revenue_impact, 2.0);
        assert!(reform.input.shock.sectors.is_empty());
    }

    #[test]
    fn test_invalid_row_reports_scenario() {
        let data = "\
scenario,baseline_debt,baseline_gdp,current_deficit,spending_commitment,revenue_impact,duration_months,sectors
broken,24500,0,5.4,1.0,0,12,
";
        match load_scenarios_from_reader(data.as_bytes()) {
            Err(LoadError::Invalid { row, scenario, source }) => {
                assert_eq!(row, 1);
                assert_eq!(scenario, "broken");
                assert!(matches!(source, EngineError::DivisionDegeneracy { .. }));
            }
            other => panic!("expected invalid row, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_column_rejected() {
        let data = "\
scenario,baseline_debt,baseline_gdp,current_deficit,spending_commitment,revenue_impact,duration_months,sector
typo,24500,18200,5.4,1.0,0,48,Health;Treasury
";
        assert!(matches!(
            load_scenarios_from_reader(data.as_bytes()),
            Err(LoadError::Csv(_))
        ));
    }

    #[test]
    fn test_missing_cell_is_missing_field() {
        let data = "\
scenario,baseline_debt,baseline_gdp,current_deficit,spending_commitment,revenue_impact,duration_months,sectors
gap,24500,18200,,1.0,0,12,
";
        match load_scenarios_from_reader(data.as_bytes()) {
            Err(LoadError::Invalid { source, .. }) => {
                assert_eq!(source, EngineError::missing(fields::CURRENT_DEFICIT));
            }
            other => panic!("expected invalid row, got {:?}", other),
        }
    }
}
