//! Five-year debt projection under a policy shock and its no-shock baseline

mod state;
mod engine;
mod series;

pub use state::FiscalState;
pub use engine::{ProjectionEngine, ProjectionConfig};
pub use series::{
    final_debt, peak_debt_to_gdp, Category, CategoryComparison, MetricRow, ProjectionResult,
    YearRow, YearlyProjectionPoint,
};

// ============================================================================
// Model Constants
// ============================================================================
// Fixed so that every call site of the pipeline runs identical arithmetic.

/// Projection horizon in years
pub const PROJECTION_YEARS: u32 = 5;

/// Baseline tax revenue as a share of GDP
pub const BASE_REVENUE_SHARE: f64 = 0.20;

/// Reserve buffer as a share of GDP
pub const RESERVE_BUFFER_SHARE: f64 = 0.10;

/// Calendar label of year 1 when no base year is configured
pub const DEFAULT_BASE_YEAR: i32 = 2024;

/// Round to 2 decimals, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
