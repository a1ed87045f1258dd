//! Error types for simulation operations.

use ls_core::CoreError;
use thiserror::Error;

/// Errors encountered while setting up a closed-loop run.
///
/// Divergent trajectories are not errors: a run either rejects its
/// configuration up front or completes and returns data.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Numeric(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
