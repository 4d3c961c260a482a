//! Rule-based mitigation recommendations for a simulation result

use crate::result::SimulationResult;
use crate::scoring::HIGH_THRESHOLD;
use crate::warnings::REVENUE_MISS_THRESHOLD;
use serde::{Deserialize, Serialize};

/// At most this many recommendations are returned
pub const MAX_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// Metric a recommendation is expected to improve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMetric {
    StrainScore,
    Revenue,
    Deficit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub metric: TargetMetric,
}

/// Recommendations derived from the result alone, in priority order
pub fn recommend(result: &SimulationResult) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let shock = &result.breakdown;

    if result.fiscal_strain_score > HIGH_THRESHOLD {
        recs.push(Recommendation {
            title: "Implement phased spending rollout".to_string(),
            description: format!(
                "Spending of ${:.1}B drives a strain score of {}. Distributing it over three phases lowers the peak fiscal load.",
                shock.spending_commitment, result.fiscal_strain_score
            ),
            impact: Impact::High,
            metric: TargetMetric::StrainScore,
        });
    }

    if shock.revenue_impact < -REVENUE_MISS_THRESHOLD {
        recs.push(Recommendation {
            title: "Offset revenue decline with broadened tax base".to_string(),
            description: format!(
                "The {}% revenue contraction can be partially offset by extending the tax base to adjacent sectors.",
                shock.revenue_impact
            ),
            impact: Impact::Medium,
            metric: TargetMetric::Revenue,
        });
    }

    recs.push(Recommendation {
        title: "Establish fiscal circuit breakers".to_string(),
        description: "Automatic spending freezes at predefined debt-to-GDP thresholds prevent runaway deficits."
            .to_string(),
        impact: Impact::High,
        metric: TargetMetric::Deficit,
    });

    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}
