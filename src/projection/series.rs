//! Output structures for fiscal projections

use serde::{Deserialize, Serialize};

/// One projected year on a single path (stress or baseline)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    /// Projection year (1-indexed)
    pub projection_year: u32,

    /// Calendar label
    pub calendar_year: i32,

    /// Share of the year the policy was live
    pub active_fraction: f64,

    // Flows (currency billions)
    pub structural_deficit: f64,
    pub added_spending: f64,
    pub revenue_change: f64,
    pub deficit: f64,

    // Stocks
    pub cumulative_deficit: f64,
    pub debt: f64,

    /// Debt as percent of GDP, unrounded
    pub debt_to_gdp: f64,
}

/// Published debt-to-GDP point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjectionPoint {
    pub year: i32,
    /// Percent, 2 decimals
    pub debt_to_gdp_ratio: f64,
}

/// Fixed comparison categories, in publication order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Revenue,
    Expense,
    Deficit,
    DebtLoad,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Revenue,
        Category::Expense,
        Category::Deficit,
        Category::DebtLoad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Revenue => "REVENUE",
            Category::Expense => "EXPENSE",
            Category::Deficit => "DEFICIT",
            Category::DebtLoad => "DEBT_LOAD",
        }
    }
}

/// Year-1 baseline vs stress figure for one category.
/// DEBT_LOAD is a percent of GDP, the rest are currency billions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryComparison {
    pub category: Category,
    pub baseline_value: f64,
    pub stress_value: f64,
}

impl CategoryComparison {
    pub fn variance(&self) -> f64 {
        self.stress_value - self.baseline_value
    }
}

/// Row of the parameter breakdown metric table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub label: String,
    pub baseline: f64,
    pub stress: f64,
    /// Percent change vs baseline; None when the baseline is zero
    pub change_pct: Option<f64>,
}

/// Complete projection for one input pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Stress path, one row per projection year
    pub stress: Vec<YearRow>,

    /// No-shock counterfactual path
    pub baseline: Vec<YearRow>,

    pub debt_to_gdp_projection: Vec<YearlyProjectionPoint>,
    pub baseline_vs_stress: Vec<CategoryComparison>,

    /// Net stress-minus-baseline variance over REVENUE and EXPENSE
    pub delta: f64,

    /// Stress deficit in year 1 (currency billions)
    pub projected_deficit_absolute: f64,

    /// Year-1 stress deficit vs baseline deficit, percent
    pub projected_deficit_increase: f64,

    pub metrics: Vec<MetricRow>,
}

impl ProjectionResult {
    pub fn comparison(&self, category: Category) -> Option<&CategoryComparison> {
        self.baseline_vs_stress.iter().find(|c| c.category == category)
    }
}

/// Highest debt-to-GDP ratio on a path
pub fn peak_debt_to_gdp(rows: &[YearRow]) -> f64 {
    rows.iter()
        .map(|r| r.debt_to_gdp)
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Debt at the end of a path
pub fn final_debt(rows: &[YearRow]) -> f64 {
    rows.last().map(|r| r.debt).unwrap_or(0.0)
}
