//! Typed macro baseline and policy shock inputs

use serde::{Deserialize, Serialize};

/// Months in one projection year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest policy duration accepted from raw input (50 years)
pub const MAX_DURATION_MONTHS: u32 = 600;

/// Macro-fiscal baseline the shock is applied to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineMacro {
    /// Outstanding public debt (currency, billions)
    pub baseline_debt: f64,

    /// Nominal GDP (currency, billions); always > 0 once normalized
    pub baseline_gdp: f64,

    /// Current deficit as percent of GDP (negative = surplus)
    pub current_deficit: f64,
}

impl BaselineMacro {
    /// Reference economy used by the run-simulation contract when the caller
    /// omits baseline figures
    pub fn reference() -> Self {
        Self {
            baseline_debt: 24_500.0,
            baseline_gdp: 18_200.0,
            current_deficit: 5.4,
        }
    }

    /// Current deficit in currency billions
    pub fn deficit_amount(&self) -> f64 {
        self.current_deficit / 100.0 * self.baseline_gdp
    }
}

/// Policy-induced deltas applied to the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyShock {
    /// Added spending (currency billions per year, >= 0)
    pub spending_commitment: f64,

    /// Percent change to the tax base (signed; negative = contraction)
    pub revenue_impact: f64,

    /// Policy lifetime in months
    pub duration_months: u32,

    /// Affected sectors, in the order supplied
    pub sectors: Vec<String>,
}

impl PolicyShock {
    /// A shock that never activates; projecting it yields the no-policy baseline
    pub fn inactive() -> Self {
        Self {
            spending_commitment: 0.0,
            revenue_impact: 0.0,
            duration_months: 0,
            sectors: Vec::new(),
        }
    }

    /// Counterfactual with the fiscal deltas removed but timing kept
    pub fn counterfactual(&self) -> Self {
        Self {
            spending_commitment: 0.0,
            revenue_impact: 0.0,
            duration_months: self.duration_months,
            sectors: self.sectors.clone(),
        }
    }

    /// Share of projection year `year` (1-indexed) during which the policy is live.
    ///
    /// 1.0 for fully covered years, a linear fraction for the year the policy
    /// expires in, 0.0 afterwards. Year 0 precedes the horizon and is never active.
    pub fn active_fraction(&self, year: u32) -> f64 {
        if year == 0 {
            return 0.0;
        }

        let year_end = year * MONTHS_PER_YEAR;
        let year_start = year_end - MONTHS_PER_YEAR;

        if year_end <= self.duration_months {
            1.0
        } else if self.duration_months > year_start {
            (self.duration_months - year_start) as f64 / MONTHS_PER_YEAR as f64
        } else {
            0.0
        }
    }

    /// Revenue change in currency billions against a given GDP
    pub fn revenue_impact_amount(&self, baseline_gdp: f64) -> f64 {
        self.revenue_impact / 100.0 * baseline_gdp
    }

    pub fn is_multi_sector(&self) -> bool {
        self.sectors.len() > 1
    }
}

/// Complete, immutable input to one pipeline invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub baseline: BaselineMacro,
    pub shock: PolicyShock,
}

impl SimulationInput {
    pub fn new(baseline: BaselineMacro, shock: PolicyShock) -> Self {
        Self { baseline, shock }
    }
}
