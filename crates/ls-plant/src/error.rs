//! Error types for plant model operations.

use ls_core::CoreError;
use thiserror::Error;

/// Result type for plant model operations.
pub type PlantResult<T> = Result<T, PlantError>;

/// Errors that can occur when constructing or querying plant models.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlantError {
    /// Numeric validation failure (non-finite or non-positive constant).
    #[error(transparent)]
    Numeric(#[from] CoreError),

    /// Invalid physical parameter.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Catalog lookup failed.
    #[error("Unknown plant: {name}")]
    UnknownPlant { name: String },
}
