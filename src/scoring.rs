//! Fiscal strain score and risk tier
//!
//! `score` is the function shared between the canonical run and interactive
//! what-if previews. Its constants, operation order and rounding mode are
//! fixed; changing any of them breaks agreement between the two call sites.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Strain carried by any policy before shock penalties
pub const BASE_STRAIN: f64 = 40.0;

/// Score points per billion of spending commitment
pub const SPENDING_WEIGHT: f64 = 5.0;

/// Score points per billion of lost revenue
pub const REVENUE_WEIGHT: f64 = 3.0;

/// Scores above this are HIGH
pub const HIGH_THRESHOLD: u8 = 70;

/// Scores above this (and at most HIGH_THRESHOLD) are MODERATE
pub const MODERATE_THRESHOLD: u8 = 40;

/// Discrete risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "LOW",
            RiskCategory::Moderate => "MODERATE",
            RiskCategory::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score plus its tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub fiscal_strain_score: u8,
    pub risk_category: RiskCategory,
}

impl ScoreCard {
    pub fn evaluate(spending_commitment: f64, revenue_impact: f64, baseline_gdp: f64) -> Self {
        let fiscal_strain_score = score(spending_commitment, revenue_impact, baseline_gdp);
        Self {
            fiscal_strain_score,
            risk_category: risk_category(fiscal_strain_score),
        }
    }
}

/// clamp(round(40 + 5|spending| + 3|min(0, revenue%/100 * GDP)|), 0, 100)
///
/// Only revenue contractions add strain; revenue gains never pull the score
/// below the spending-driven level.
pub fn score(spending_commitment: f64, revenue_impact: f64, baseline_gdp: f64) -> u8 {
    let revenue_loss = (revenue_impact / 100.0 * baseline_gdp).min(0.0);
    let raw = BASE_STRAIN + SPENDING_WEIGHT * spending_commitment.abs() + REVENUE_WEIGHT * revenue_loss.abs();

    raw.round().clamp(0.0, 100.0) as u8
}

/// score > 70 is HIGH, 40 < score <= 70 is MODERATE, otherwise LOW
pub fn risk_category(score: u8) -> RiskCategory {
    if score > HIGH_THRESHOLD {
        RiskCategory::High
    } else if score > MODERATE_THRESHOLD {
        RiskCategory::Moderate
    } else {
        RiskCategory::Low
    }
}
