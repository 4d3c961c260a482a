//! Fiscal Stress - deterministic five-year fiscal stress simulation
//!
//! This library provides:
//! - Parameter normalization from formatted raw input
//! - Debt-to-GDP projection under a policy shock and its no-shock baseline
//! - Strain scoring and risk tiers
//! - Early-warning detection
//! - What-if re-evaluation through the same pipeline as the canonical run
//!
//! The pipeline has no I/O, clock or randomness: identical inputs always yield
//! byte-identical results.

pub mod error;
pub mod inputs;
pub mod projection;
pub mod scoring;
pub mod warnings;
pub mod result;
pub mod simulation;
pub mod extraction;
pub mod store;
pub mod service;
pub mod advisor;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};
pub use inputs::{BaselineMacro, PolicyShock, RawInput, SimulationInput};
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
pub use result::SimulationResult;
pub use scoring::{RiskCategory, ScoreCard};
pub use simulation::{Simulator, WhatIf};
pub use warnings::{Warning, WarningKind};
