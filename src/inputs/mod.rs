//! Simulation inputs: typed data model, raw scalars and the parameter normalizer

mod data;
mod raw;
pub mod normalizer;
pub mod loader;

pub use data::{BaselineMacro, PolicyShock, SimulationInput, MAX_DURATION_MONTHS, MONTHS_PER_YEAR};
pub use raw::{RawInput, RawValue};
pub use normalizer::{normalize, normalize_baseline, normalize_shock, sanitize, validate};
pub use loader::{load_scenarios, load_scenarios_from_reader, LoadError, NamedScenario};
