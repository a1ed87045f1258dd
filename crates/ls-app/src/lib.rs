//! Shared application service layer for loopsim.
//!
//! This crate provides a unified interface for front-ends (CLI, dashboards),
//! centralizing scenario loading and validation, run execution, performance
//! metrics, and series extraction for rendering collaborators.
//!
//! A run is a pure function from configuration to data: front-ends re-invoke
//! [`run_scenario`] on every configuration change rather than mutating any
//! shared simulation state.

pub mod error;
pub mod metrics;
pub mod query;
pub mod run_service;
pub mod scenario;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use metrics::{compute_loop_metrics, LoopMetrics, DEFAULT_TOLERANCE};
pub use query::{extract_series, list_channels, measured_series};
pub use run_service::{run_batch, run_scenario, Channel, RunOutcome};
pub use scenario::{load_scenario, PlantChoice, SaturationChoice, Scenario};
