//! Early-warning rules evaluated against a projection
//!
//! Rules run in a fixed order (liquidity, revenue miss, implementation delay)
//! and are independent: any subset may fire.

use crate::inputs::{BaselineMacro, SimulationInput};
use crate::projection::{ProjectionResult, RESERVE_BUFFER_SHARE};
use serde::{Deserialize, Serialize};

/// Liquidity warning fires when reserves are depleted in this year or earlier
pub const LIQUIDITY_WARNING_YEAR: u8 = 3;

/// Minimum revenue contraction (percent) that counts as a miss
pub const REVENUE_MISS_THRESHOLD: f64 = 1.0;

/// Minimum duration for a multi-sector rollout to be flagged
pub const DELAY_DURATION_MONTHS: u32 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    Liquidity,
    RevenueMiss,
    ImplementationDelay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub title: String,
    pub description: String,
}

/// Detector output
#[derive(Debug, Clone, PartialEq)]
pub struct WarningReport {
    /// First year the reserve buffer is consumed; None = beyond horizon
    pub reserve_depletion_year: Option<u8>,
    pub warnings: Vec<Warning>,
}

/// Reserve buffer in currency billions
pub fn reserve_buffer(baseline: &BaselineMacro) -> f64 {
    RESERVE_BUFFER_SHARE * baseline.baseline_gdp
}

/// Smallest projection year whose cumulative deficit exceeds the buffer
pub fn reserve_depletion_year(baseline: &BaselineMacro, projection: &ProjectionResult) -> Option<u8> {
    let buffer = reserve_buffer(baseline);
    projection
        .stress
        .iter()
        .find(|row| row.debt - baseline.baseline_debt > buffer)
        .map(|row| row.projection_year as u8)
}

/// Evaluate all rules in order
pub fn detect(input: &SimulationInput, projection: &ProjectionResult) -> WarningReport {
    let depletion = reserve_depletion_year(&input.baseline, projection);
    let mut warnings = Vec::new();

    if let Some(warning) = liquidity(&input.baseline, projection, depletion) {
        warnings.push(warning);
    }
    if let Some(warning) = revenue_miss(input) {
        warnings.push(warning);
    }
    if let Some(warning) = implementation_delay(input) {
        warnings.push(warning);
    }

    WarningReport {
        reserve_depletion_year: depletion,
        warnings,
    }
}

fn liquidity(
    baseline: &BaselineMacro,
    projection: &ProjectionResult,
    depletion: Option<u8>,
) -> Option<Warning> {
    let year = depletion.filter(|&y| y <= LIQUIDITY_WARNING_YEAR)?;
    let row = projection.stress.get(year as usize - 1)?;

    Some(Warning {
        kind: WarningKind::Liquidity,
        title: "Liquidity crunch predicted".to_string(),
        description: format!(
            "Cumulative deficit of ${:.1}B exceeds the ${:.1}B reserve buffer in year {} ({}).",
            row.cumulative_deficit,
            reserve_buffer(baseline),
            year,
            row.calendar_year,
        ),
    })
}

fn revenue_miss(input: &SimulationInput) -> Option<Warning> {
    let impact = input.shock.revenue_impact;
    if impact >= 0.0 || impact.abs() < REVENUE_MISS_THRESHOLD {
        return None;
    }

    Some(Warning {
        kind: WarningKind::RevenueMiss,
        title: "Revenue forecast miss".to_string(),
        description: format!(
            "Tax base contraction of {}% removes ${:.1}B of annual revenue while the policy is active.",
            impact,
            input.shock.revenue_impact_amount(input.baseline.baseline_gdp).abs(),
        ),
    })
}

fn implementation_delay(input: &SimulationInput) -> Option<Warning> {
    let shock = &input.shock;
    if shock.duration_months < DELAY_DURATION_MONTHS || !shock.is_multi_sector() {
        return None;
    }

    Some(Warning {
        kind: WarningKind::ImplementationDelay,
        title: "Implementation delay risk".to_string(),
        description: format!(
            "{}-month rollout across {} sectors ({}) is difficult to sequence administratively.",
            shock.duration_months,
            shock.sectors.len(),
            shock.sectors.join(", "),
        ),
    })
}
