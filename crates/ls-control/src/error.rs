//! Error types for controller configuration.

use ls_core::CoreError;
use thiserror::Error;

/// Result type for controller operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when configuring a controller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Numeric validation failure (non-finite gain or limit).
    #[error(transparent)]
    Numeric(#[from] CoreError),

    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
