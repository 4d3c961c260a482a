//! Simulation result and its assembly from the pipeline stages

use crate::inputs::PolicyShock;
use crate::projection::{CategoryComparison, MetricRow, ProjectionResult, YearlyProjectionPoint};
use crate::scoring::{RiskCategory, ScoreCard};
use crate::warnings::{Warning, WarningReport};
use serde::{Deserialize, Serialize};

/// Echo of the normalized shock plus the metric table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub spending_commitment: f64,
    pub revenue_impact: f64,
    pub duration_months: u32,
    pub sectors: Vec<String>,
    pub metrics: Vec<MetricRow>,
}

/// Complete, immutable output of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub fiscal_strain_score: u8,
    pub risk_category: RiskCategory,

    /// Year-1 stress deficit (currency billions)
    pub projected_deficit_absolute: f64,

    /// Percent vs baseline deficit
    pub projected_deficit_increase: f64,

    /// 1..=5, or None when reserves last beyond the horizon
    pub reserve_depletion_year: Option<u8>,

    pub debt_to_gdp_projection: Vec<YearlyProjectionPoint>,
    pub baseline_vs_stress: Vec<CategoryComparison>,
    pub delta: f64,
    pub early_warnings: Vec<Warning>,
    pub breakdown: Breakdown,
}

/// Package stage outputs into a result. Performs no computation of its own.
pub fn assemble(
    shock: &PolicyShock,
    projection: ProjectionResult,
    score: ScoreCard,
    report: WarningReport,
) -> SimulationResult {
    SimulationResult {
        fiscal_strain_score: score.fiscal_strain_score,
        risk_category: score.risk_category,
        projected_deficit_absolute: projection.projected_deficit_absolute,
        projected_deficit_increase: projection.projected_deficit_increase,
        reserve_depletion_year: report.reserve_depletion_year,
        debt_to_gdp_projection: projection.debt_to_gdp_projection,
        baseline_vs_stress: projection.baseline_vs_stress,
        delta: projection.delta,
        early_warnings: report.warnings,
        breakdown: Breakdown {
            spending_commitment: shock.spending_commitment,
            revenue_impact: shock.revenue_impact,
            duration_months: shock.duration_months,
            sectors: shock.sectors.clone(),
            metrics: projection.metrics,
        },
    }
}

impl SimulationResult {
    /// Final year debt-to-GDP ratio
    pub fn terminal_debt_to_gdp(&self) -> Option<f64> {
        self.debt_to_gdp_projection.last().map(|p| p.debt_to_gdp_ratio)
    }

    pub fn has_warnings(&self) -> bool {
        !self.early_warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{BaselineMacro, SimulationInput};
    use crate::projection::ProjectionEngine;
    use crate::warnings;

    #[test]
    fn test_assemble_copies_stage_outputs() {
        let shock = PolicyShock {
            spending_commitment: 2.0,
            revenue_impact: 0.5,
            duration_months: 24,
            sectors: vec!["Health".to_string()],
        };
        let input = SimulationInput::new(BaselineMacro::reference(), shock.clone());
        let projection = ProjectionEngine::default().project(&input);
        let report = warnings::detect(&input, &projection);
        let score = ScoreCard::evaluate(2.0, 0.5, 18_200.0);

        let result = assemble(&shock, projection.clone(), score, report.clone());

        assert_eq!(result.fiscal_strain_score, 50);
        assert_eq!(result.risk_category, RiskCategory::Moderate);
        assert_eq!(result.debt_to_gdp_projection, projection.debt_to_gdp_projection);
        assert_eq!(result.baseline_vs_stress, projection.baseline_vs_stress);
        assert_eq!(result.reserve_depletion_year, report.reserve_depletion_year);
        assert_eq!(result.early_warnings, report.warnings);
        assert_eq!(result.breakdown.sectors, shock.sectors);
        assert_eq!(result.breakdown.metrics, projection.metrics);
        assert_eq!(result.terminal_debt_to_gdp(), projection.debt_to_gdp_projection.last().map(|p| p.debt_to_gdp_ratio));
    }

    #[test]
    fn test_beyond_horizon_serializes_as_null() {
        let shock = PolicyShock::inactive();
        let input = SimulationInput::new(
            BaselineMacro {
                baseline_debt: 100.0,
                baseline_gdp: 1000.0,
                current_deficit: 0.0,
            },
            shock.clone(),
        );
        let projection = ProjectionEngine::default().project(&input);
        let report = warnings::detect(&input, &projection);
        let result = assemble(&shock, projection, ScoreCard::evaluate(0.0, 0.0, 1000.0), report);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["reserve_depletion_year"].is_null());
        assert_eq!(json["risk_category"], "LOW");
        assert!(!result.has_warnings());
    }
}
