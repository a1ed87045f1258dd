//! Query helpers for extracting series from completed runs.
//!
//! Rendering collaborators work in `(time, value)` pairs; these helpers are
//! the seam between the kernel's data and whatever draws it.

use crate::error::{AppError, AppResult};
use crate::run_service::RunOutcome;

/// List the channel names available in an outcome.
pub fn list_channels(outcome: &RunOutcome) -> Vec<&'static str> {
    outcome.channels.iter().map(|c| c.name).collect()
}

/// Extract a named channel as a `(time, value)` series.
pub fn extract_series(outcome: &RunOutcome, channel: &str) -> AppResult<Vec<(f64, f64)>> {
    let chan = outcome.channel(channel).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Unknown channel: {} (available: {})",
            channel,
            list_channels(outcome).join(", ")
        ))
    })?;

    Ok(outcome
        .time
        .iter()
        .copied()
        .zip(chan.values.iter().copied())
        .collect())
}

/// The series the controller tracked, for metric overlays.
pub fn measured_series(outcome: &RunOutcome) -> AppResult<Vec<(f64, f64)>> {
    extract_series(outcome, outcome.measured)
}
