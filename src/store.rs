//! Persistence seam for submitted policies and simulation results

use crate::extraction::ExtractedPolicy;
use crate::result::SimulationResult;
use std::collections::HashMap;

/// Storage for submissions and canonical results, keyed by opaque policy id.
///
/// Implement this trait to back the service with a database.
pub trait ResultStore {
    fn save_submission(&mut self, policy_id: &str, submission: ExtractedPolicy);

    fn submission(&self, policy_id: &str) -> Option<ExtractedPolicy>;

    /// Store a canonical result, replacing any earlier run for the same id
    fn save_result(&mut self, policy_id: &str, result: SimulationResult);

    fn result(&self, policy_id: &str) -> Option<SimulationResult>;
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    submissions: HashMap<String, ExtractedPolicy>,
    results: HashMap<String, SimulationResult>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }
}

impl ResultStore for InMemoryStore {
    fn save_submission(&mut self, policy_id: &str, submission: ExtractedPolicy) {
        self.submissions.insert(policy_id.to_string(), submission);
    }

    fn submission(&self, policy_id: &str) -> Option<ExtractedPolicy> {
        self.submissions.get(policy_id).cloned()
    }

    fn save_result(&mut self, policy_id: &str, result: SimulationResult) {
        self.results.insert(policy_id.to_string(), result);
    }

    fn result(&self, policy_id: &str) -> Option<SimulationResult> {
        self.results.get(policy_id).cloned()
    }
}
