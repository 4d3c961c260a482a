//! Fiscal state carried between projection years

use crate::inputs::BaselineMacro;

/// Debt position at the end of a projection year
#[derive(Debug, Clone)]
pub struct FiscalState {
    /// Last completed projection year (0 = start)
    pub projection_year: u32,

    /// Outstanding debt D(y)
    pub debt: f64,

    /// Sum of deficits since the start, D(y) - D(0)
    pub cumulative_deficit: f64,

    /// Denominator for ratios; constant over the horizon
    pub gdp: f64,
}

impl FiscalState {
    /// D(0) = baseline debt
    pub fn from_baseline(baseline: &BaselineMacro) -> Self {
        Self {
            projection_year: 0,
            debt: baseline.baseline_debt,
            cumulative_deficit: 0.0,
            gdp: baseline.baseline_gdp,
        }
    }

    /// Roll debt forward one year: D(y) = D(y-1) + deficit(y)
    pub fn advance_year(&mut self, deficit: f64) {
        self.projection_year += 1;
        self.debt += deficit;
        self.cumulative_deficit += deficit;
    }

    /// Debt as percent of GDP
    pub fn debt_to_gdp(&self) -> f64 {
        self.debt / self.gdp * 100.0
    }
}
