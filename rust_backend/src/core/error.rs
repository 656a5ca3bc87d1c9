//! Error types for catalog loading and simulation runs.

use polars::prelude::PolarsError;

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Error type for simulation operations
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The release catalog is malformed or violates its ordering invariants.
    #[error("Data error: {0}")]
    DataError(String),

    /// A date precedes the catalog or a version is not in it.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A policy parameter was rejected before any computation ran.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl SimulationError {
    pub fn is_data_error(&self) -> bool {
        matches!(self, SimulationError::DataError(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SimulationError::NotFound(_))
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, SimulationError::ConfigurationError(_))
    }
}

impl From<PolarsError> for SimulationError {
    fn from(e: PolarsError) -> Self {
        SimulationError::DataError(e.to_string())
    }
}

impl From<std::io::Error> for SimulationError {
    fn from(e: std::io::Error) -> Self {
        SimulationError::DataError(e.to_string())
    }
}
