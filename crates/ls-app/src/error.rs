//! Error types for the ls-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for front-ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Plant error: {0}")]
    Plant(String),

    #[error("Controller error: {0}")]
    Control(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ls-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<ls_plant::PlantError> for AppError {
    fn from(err: ls_plant::PlantError) -> Self {
        AppError::Plant(err.to_string())
    }
}

impl From<ls_control::ControlError> for AppError {
    fn from(err: ls_control::ControlError) -> Self {
        AppError::Control(err.to_string())
    }
}

impl From<ls_sim::SimError> for AppError {
    fn from(err: ls_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Scenario(err.to_string())
    }
}
