//! Core projection engine: yearly debt roll-forward under stress and baseline

use super::series::{
    final_debt, peak_debt_to_gdp, Category, CategoryComparison, MetricRow, ProjectionResult,
    YearRow, YearlyProjectionPoint,
};
use super::state::FiscalState;
use super::{round2, BASE_REVENUE_SHARE, DEFAULT_BASE_YEAR, PROJECTION_YEARS};
use crate::inputs::{BaselineMacro, PolicyShock, SimulationInput};

/// Configuration for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Calendar label of projection year 1
    pub base_year: i32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            base_year: DEFAULT_BASE_YEAR,
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project the stress path and its no-shock counterfactual
    pub fn project(&self, input: &SimulationInput) -> ProjectionResult {
        let baseline = &input.baseline;
        let stress = self.project_path(baseline, &input.shock);
        let counterfactual = self.project_path(baseline, &input.shock.counterfactual());

        let debt_to_gdp_projection = stress
            .iter()
            .map(|row| YearlyProjectionPoint {
                year: row.calendar_year,
                debt_to_gdp_ratio: round2(row.debt_to_gdp),
            })
            .collect();

        let year_one = YearOne::new(baseline, &stress[0], &counterfactual[0]);
        let baseline_vs_stress = year_one.comparisons();

        let delta = round2(
            baseline_vs_stress
                .iter()
                .filter(|c| matches!(c.category, Category::Revenue | Category::Expense))
                .map(CategoryComparison::variance)
                .sum(),
        );

        let metrics = Self::metrics(&year_one, &stress, &counterfactual);

        ProjectionResult {
            projected_deficit_absolute: round2(year_one.stress_deficit),
            projected_deficit_increase: round2(
                percent_change(year_one.baseline_deficit, year_one.stress_deficit).unwrap_or(0.0),
            ),
            stress,
            baseline: counterfactual,
            debt_to_gdp_projection,
            baseline_vs_stress,
            delta,
            metrics,
        }
    }

    /// Roll a single path forward over the fixed horizon
    fn project_path(&self, baseline: &BaselineMacro, shock: &PolicyShock) -> Vec<YearRow> {
        let mut state = FiscalState::from_baseline(baseline);
        let mut rows = Vec::with_capacity(PROJECTION_YEARS as usize);

        for year in 1..=PROJECTION_YEARS {
            let row = self.calculate_year(baseline, shock, &mut state, year);
            rows.push(row);
        }

        rows
    }

    /// deficit(y) = deficit% * GDP + spending * active(y) - revenue% * GDP * active(y)
    fn calculate_year(
        &self,
        baseline: &BaselineMacro,
        shock: &PolicyShock,
        state: &mut FiscalState,
        year: u32,
    ) -> YearRow {
        let active = shock.active_fraction(year);
        let structural_deficit = baseline.deficit_amount();
        let added_spending = shock.spending_commitment * active;
        let revenue_change = shock.revenue_impact_amount(baseline.baseline_gdp) * active;
        let deficit = structural_deficit + added_spending - revenue_change;

        state.advance_year(deficit);

        YearRow {
            projection_year: year,
            calendar_year: self.config.base_year + (year as i32 - 1),
            active_fraction: active,
            structural_deficit,
            added_spending,
            revenue_change,
            deficit,
            cumulative_deficit: state.cumulative_deficit,
            debt: state.debt,
            debt_to_gdp: state.debt_to_gdp(),
        }
    }

    /// Breakdown table: year-1 flows plus end-of-horizon stocks
    fn metrics(year_one: &YearOne, stress: &[YearRow], counterfactual: &[YearRow]) -> Vec<MetricRow> {
        vec![
            metric_row("Operating Expenses", year_one.baseline_expense, year_one.stress_expense),
            metric_row("Revenue", year_one.baseline_revenue, year_one.stress_revenue),
            metric_row("Deficit", year_one.baseline_deficit, year_one.stress_deficit),
            metric_row(
                &format!("Debt (Year {})", PROJECTION_YEARS),
                final_debt(counterfactual),
                final_debt(stress),
            ),
            metric_row("Peak Debt-to-GDP", peak_debt_to_gdp(counterfactual), peak_debt_to_gdp(stress)),
        ]
    }
}

/// Year-1 flows on both paths
struct YearOne {
    baseline_revenue: f64,
    stress_revenue: f64,
    baseline_expense: f64,
    stress_expense: f64,
    baseline_deficit: f64,
    stress_deficit: f64,
    baseline_ratio: f64,
    stress_ratio: f64,
}

impl YearOne {
    fn new(baseline: &BaselineMacro, stress: &YearRow, counterfactual: &YearRow) -> Self {
        let baseline_revenue = baseline.baseline_gdp * BASE_REVENUE_SHARE;
        let baseline_expense = baseline_revenue + counterfactual.deficit;

        Self {
            baseline_revenue,
            stress_revenue: baseline_revenue + stress.revenue_change,
            baseline_expense,
            stress_expense: baseline_expense + stress.added_spending,
            baseline_deficit: counterfactual.deficit,
            stress_deficit: stress.deficit,
            baseline_ratio: counterfactual.debt_to_gdp,
            stress_ratio: stress.debt_to_gdp,
        }
    }

    fn comparisons(&self) -> Vec<CategoryComparison> {
        Category::ALL
            .iter()
            .map(|&category| {
                let (baseline_value, stress_value) = match category {
                    Category::Revenue => (self.baseline_revenue, self.stress_revenue),
                    Category::Expense => (self.baseline_expense, self.stress_expense),
                    Category::Deficit => (self.baseline_deficit, self.stress_deficit),
                    Category::DebtLoad => (self.baseline_ratio, self.stress_ratio),
                };
                CategoryComparison {
                    category,
                    baseline_value: round2(baseline_value),
                    stress_value: round2(stress_value),
                }
            })
            .collect()
    }
}

fn metric_row(label: &str, baseline: f64, stress: f64) -> MetricRow {
    MetricRow {
        label: label.to_string(),
        baseline: round2(baseline),
        stress: round2(stress),
        change_pct: percent_change(baseline, stress).map(round2),
    }
}

/// (stress - baseline) / |baseline| * 100, None when baseline is zero
fn percent_change(baseline: f64, stress: f64) -> Option<f64> {
    if baseline == 0.0 {
        None
    } else {
        Some((stress - baseline) / baseline.abs() * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_input(shock: PolicyShock) -> SimulationInput {
        SimulationInput::new(BaselineMacro::reference(), shock)
    }

    fn ubi_shock() -> PolicyShock {
        PolicyShock {
            spending_commitment: 4.2,
            revenue_impact: -1.5,
            duration_months: 60,
            sectors: vec!["Social Welfare".to_string(), "Treasury".to_string()],
        }
    }

    #[test]
    fn test_projection_has_five_consecutive_years() {
        let engine = ProjectionEngine::new(ProjectionConfig { base_year: 2030 });
        let result = engine.project(&reference_input(ubi_shock()));

        assert_eq!(result.debt_to_gdp_projection.len(), 5);
        let years: Vec<_> = result.debt_to_gdp_projection.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2030, 2031, 2032, 2033, 2034]);
        assert_eq!(result.stress.len(), 5);
        assert_eq!(result.baseline.len(), 5);
    }

    #[test]
    fn test_reference_scenario_year_one() {
        let result = ProjectionEngine::default().project(&reference_input(ubi_shock()));

        // 982.8 structural + 4.2 spending + 273.0 lost revenue
        assert_relative_eq!(result.stress[0].deficit, 1260.0, epsilon = 1e-9);
        assert_relative_eq!(result.projected_deficit_absolute, 1260.0);
        assert_relative_eq!(result.projected_deficit_increase, 28.21);
        assert_relative_eq!(result.debt_to_gdp_projection[0].debt_to_gdp_ratio, 141.54);

        let revenue = result.comparison(Category::Revenue).unwrap();
        assert_relative_eq!(revenue.baseline_value, 3640.0);
        assert_relative_eq!(revenue.stress_value, 3367.0);

        let expense = result.comparison(Category::Expense).unwrap();
        assert_relative_eq!(expense.baseline_value, 4622.8);
        assert_relative_eq!(expense.stress_value, 4627.0);

        let deficit = result.comparison(Category::Deficit).unwrap();
        assert_relative_eq!(deficit.baseline_value, 982.8);
        assert_relative_eq!(deficit.stress_value, 1260.0);

        let debt_load = result.comparison(Category::DebtLoad).unwrap();
        assert_relative_eq!(debt_load.baseline_value, 140.02);
        assert_relative_eq!(debt_load.stress_value, 141.54);

        assert_relative_eq!(result.delta, -268.8);
    }

    #[test]
    fn test_categories_fixed_order() {
        let result = ProjectionEngine::default().project(&reference_input(ubi_shock()));
        let order: Vec<_> = result.baseline_vs_stress.iter().map(|c| c.category).collect();
        assert_eq!(order, Category::ALL.to_vec());
    }

    #[test]
    fn test_debt_accumulates_each_year() {
        let result = ProjectionEngine::default().project(&reference_input(ubi_shock()));
        for (i, row) in result.stress.iter().enumerate() {
            let expected = 24_500.0 + 1260.0 * (i as f64 + 1.0);
            assert_relative_eq!(row.debt, expected, epsilon = 1e-6);
        }
        assert_relative_eq!(result.debt_to_gdp_projection[4].debt_to_gdp_ratio, 169.23);
    }

    #[test]
    fn test_zero_duration_matches_baseline() {
        let mut shock = ubi_shock();
        shock.duration_months = 0;
        let result = ProjectionEngine::default().project(&reference_input(shock));

        for (stress, baseline) in result.stress.iter().zip(&result.baseline) {
            assert_eq!(stress.debt, baseline.debt);
        }
        assert_eq!(result.delta, 0.0);
        assert_eq!(result.projected_deficit_increase, 0.0);
    }

    #[test]
    fn test_partial_final_year_tapers() {
        let mut shock = ubi_shock();
        shock.duration_months = 18;
        let result = ProjectionEngine::default().project(&reference_input(shock));

        assert_relative_eq!(result.stress[1].active_fraction, 0.5);
        assert_relative_eq!(result.stress[1].deficit, 982.8 + 0.5 * 277.2, epsilon = 1e-9);
        assert_relative_eq!(result.stress[2].deficit, 982.8, epsilon = 1e-9);
    }

    #[test]
    fn test_short_policy_scales_year_one_rows() {
        let mut shock = ubi_shock();
        shock.duration_months = 6;
        let result = ProjectionEngine::default().project(&reference_input(shock));

        // Half of year 1 is active: +2.1 spending, -136.5 revenue
        let revenue = result.comparison(Category::Revenue).unwrap();
        assert_relative_eq!(revenue.baseline_value, 3640.0);
        assert_relative_eq!(revenue.stress_value, 3503.5);

        let expense = result.comparison(Category::Expense).unwrap();
        assert_relative_eq!(expense.baseline_value, 4622.8);
        assert_relative_eq!(expense.stress_value, 4624.9);

        let deficit = result.comparison(Category::Deficit).unwrap();
        assert_relative_eq!(deficit.stress_value, 1121.4);
        assert_relative_eq!(
            deficit.stress_value,
            expense.stress_value - revenue.stress_value,
            epsilon = 1e-9
        );

        assert_relative_eq!(result.delta, -134.4);
        assert_relative_eq!(result.projected_deficit_absolute, 1121.4);
        assert_relative_eq!(result.stress[1].deficit, 982.8, epsilon = 1e-9);
    }

    #[test]
    fn test_revenue_sign_not_clamped() {
        let mut gain = ubi_shock();
        gain.spending_commitment = 0.0;
        gain.revenue_impact = 2.0;
        let result = ProjectionEngine::default().project(&reference_input(gain));

        // A revenue gain narrows the deficit below the structural level
        assert!(result.stress[0].deficit < result.baseline[0].deficit);
        assert_relative_eq!(result.stress[0].deficit, 982.8 - 364.0, epsilon = 1e-9);
        assert!(result.delta > 0.0);
    }

    #[test]
    fn test_metrics_table() {
        let result = ProjectionEngine::default().project(&reference_input(ubi_shock()));
        let labels: Vec<_> = result.metrics.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Operating Expenses", "Revenue", "Deficit", "Debt (Year 5)", "Peak Debt-to-GDP"]
        );
        assert_relative_eq!(result.metrics[3].stress, 30_800.0);
        assert!(result.metrics.iter().all(|m| m.change_pct.is_some()));
    }

    #[test]
    fn test_surplus_baseline_change_uses_magnitude() {
        let input = SimulationInput::new(
            BaselineMacro {
                baseline_debt: 1000.0,
                baseline_gdp: 2000.0,
                current_deficit: -1.0,
            },
            PolicyShock {
                spending_commitment: 10.0,
                revenue_impact: 0.0,
                duration_months: 12,
                sectors: Vec::new(),
            },
        );
        let result = ProjectionEngine::default().project(&input);

        // Surplus of 20 shrinks to 10: deficit rises by half the surplus magnitude
        assert_relative_eq!(result.projected_deficit_absolute, -10.0);
        assert_relative_eq!(result.projected_deficit_increase, 50.0);
    }
}
