//! Request/response contracts around the pipeline: submit, run, fetch, preview

use crate::error::EngineError;
use crate::extraction::{ExtractedPolicy, Extractor};
use crate::inputs::{BaselineMacro, PolicyShock, SimulationInput};
use crate::result::SimulationResult;
use crate::simulation::{Simulator, WhatIf};
use crate::store::ResultStore;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("no policy submitted under id `{0}`")]
    UnknownPolicy(String),

    #[error("no simulation result stored for `{0}`")]
    NoStoredResult(String),
}

/// Response to a document submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub policy_id: String,
    pub extracted_shock: PolicyShock,
    pub extracted_baseline: Option<BaselineMacro>,
}

/// Canonical (persisted) and preview (never persisted) entry points
pub struct FiscalService<E: Extractor, S: ResultStore> {
    extractor: E,
    store: S,
    simulator: Simulator,
    next_id: u64,
}

impl<E: Extractor, S: ResultStore> FiscalService<E, S> {
    pub fn new(extractor: E, store: S, simulator: Simulator) -> Self {
        Self {
            extractor,
            store,
            simulator,
            next_id: 1,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Extract a shock from a document and register it under a new id
    pub fn submit_policy(&mut self, document: &str) -> Result<Submission, ServiceError> {
        let extracted = self.extractor.extract(document)?;
        let policy_id = self.register(extracted.clone());
        info!("submitted policy {} ({} sectors)", policy_id, extracted.shock.sectors.len());

        Ok(Submission {
            policy_id,
            extracted_shock: extracted.shock,
            extracted_baseline: extracted.baseline,
        })
    }

    /// Register an already-structured shock, bypassing extraction
    pub fn register_shock(&mut self, shock: PolicyShock) -> String {
        self.register(ExtractedPolicy {
            shock,
            baseline: None,
        })
    }

    /// Canonical run: simulate against the submitted shock and persist
    pub fn run_simulation(
        &mut self,
        policy_id: &str,
        baseline: BaselineMacro,
    ) -> Result<SimulationResult, ServiceError> {
        let input = self.input_for(policy_id, baseline)?;
        let result = self.simulator.simulate(&input)?;

        info!(
            "simulation {}: score={} risk={}",
            policy_id, result.fiscal_strain_score, result.risk_category
        );
        self.store.save_result(policy_id, result.clone());
        Ok(result)
    }

    /// Previously persisted result, unmodified
    pub fn get_results(&self, policy_id: &str) -> Result<SimulationResult, ServiceError> {
        self.store
            .result(policy_id)
            .ok_or_else(|| ServiceError::NoStoredResult(policy_id.to_string()))
    }

    /// Preview with edits; the stored canonical result is not touched
    pub fn what_if(
        &self,
        policy_id: &str,
        baseline: BaselineMacro,
        edits: &WhatIf,
    ) -> Result<SimulationResult, ServiceError> {
        let input = self.input_for(policy_id, baseline)?;
        Ok(self.simulator.what_if(&input, edits)?)
    }

    fn input_for(&self, policy_id: &str, baseline: BaselineMacro) -> Result<SimulationInput, ServiceError> {
        let submission = self
            .store
            .submission(policy_id)
            .ok_or_else(|| ServiceError::UnknownPolicy(policy_id.to_string()))?;
        Ok(SimulationInput::new(baseline, submission.shock))
    }

    fn register(&mut self, extracted: ExtractedPolicy) -> String {
        let policy_id = format!("FS-{:06}", self.next_id);
        self.next_id += 1;
        self.store.save_submission(&policy_id, extracted);
        policy_id
    }
}
