//! The simulation pipeline and what-if re-evaluation
//!
//! raw input -> normalizer -> projection -> (scoring, warnings) -> result.
//! The canonical run and every what-if preview go through `Simulator::simulate`,
//! which sanitizes typed input before projecting. There is no second copy of
//! the arithmetic or of the validation rules.

use crate::error::EngineResult;
use crate::inputs::{self, RawInput, SimulationInput};
use crate::projection::{ProjectionConfig, ProjectionEngine};
use crate::result::{self, SimulationResult};
use crate::scoring::ScoreCard;
use crate::warnings;
use log::debug;
use serde::{Deserialize, Serialize};

/// Edits applied on top of a canonical input for an interactive preview.
/// `None` keeps the canonical value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WhatIf {
    pub baseline_debt: Option<f64>,
    pub baseline_gdp: Option<f64>,
    pub current_deficit: Option<f64>,
    pub spending_commitment: Option<f64>,
    pub revenue_impact: Option<f64>,
    pub duration_months: Option<u32>,
    pub sectors: Option<Vec<String>>,
}

impl WhatIf {
    pub fn is_empty(&self) -> bool {
        *self == WhatIf::default()
    }

    /// Copy of `canonical` with the edited fields replaced
    pub fn apply_to(&self, canonical: &SimulationInput) -> SimulationInput {
        let mut edited = canonical.clone();
        let baseline = &mut edited.baseline;
        let shock = &mut edited.shock;

        let numbers = [
            (&mut baseline.baseline_debt, self.baseline_debt),
            (&mut baseline.baseline_gdp, self.baseline_gdp),
            (&mut baseline.current_deficit, self.current_deficit),
            (&mut shock.spending_commitment, self.spending_commitment),
            (&mut shock.revenue_impact, self.revenue_impact),
        ];
        for (slot, value) in numbers {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(months) = self.duration_months {
            shock.duration_months = months;
        }
        if let Some(sectors) = &self.sectors {
            shock.sectors = sectors.clone();
        }
        edited
    }
}

/// Pipeline runner
///
/// # Example
/// ```ignore
/// let simulator = Simulator::default();
/// let canonical = simulator.simulate(&input)?;
///
/// // Slider moved: preview without touching the canonical result
/// let edits = WhatIf { spending_commitment: Some(2.0), ..Default::default() };
/// let preview = simulator.what_if(&input, &edits)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    engine: ProjectionEngine,
}

impl Simulator {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    /// Run the full pipeline on a typed input
    pub fn simulate(&self, input: &SimulationInput) -> EngineResult<SimulationResult> {
        let input = inputs::sanitize(input)?;
        Ok(self.run(&input))
    }

    /// Normalize raw scalars, then run the pipeline
    pub fn simulate_raw(&self, raw: &RawInput) -> EngineResult<SimulationResult> {
        let input = inputs::normalize(raw)?;
        self.simulate(&input)
    }

    /// Apply edits to a canonical input and produce a new, independent result
    pub fn what_if(&self, canonical: &SimulationInput, edits: &WhatIf) -> EngineResult<SimulationResult> {
        let edited = apply(canonical, edits)?;
        Ok(self.run(&edited))
    }

    /// Run many inputs with the same configuration
    pub fn run_batch(&self, inputs: &[SimulationInput]) -> Vec<EngineResult<SimulationResult>> {
        inputs.iter().map(|input| self.simulate(input)).collect()
    }

    /// Pipeline body; `input` has already been sanitized
    fn run(&self, input: &SimulationInput) -> SimulationResult {
        let projection = self.engine.project(input);
        let score = ScoreCard::evaluate(
            input.shock.spending_commitment,
            input.shock.revenue_impact,
            input.baseline.baseline_gdp,
        );
        let report = warnings::detect(input, &projection);

        debug!(
            "simulated: score={} risk={} depletion={:?} warnings={}",
            score.fiscal_strain_score,
            score.risk_category,
            report.reserve_depletion_year,
            report.warnings.len()
        );

        result::assemble(&input.shock, projection, score, report)
    }
}

/// Edited input, held to the same contract as a canonical run
pub fn apply(canonical: &SimulationInput, edits: &WhatIf) -> EngineResult<SimulationInput> {
    inputs::sanitize(&edits.apply_to(canonical))
}

/// Run the pipeline with the default configuration
pub fn simulate(input: &SimulationInput) -> EngineResult<SimulationResult> {
    Simulator::default().simulate(input)
}
