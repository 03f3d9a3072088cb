//! Error types for solver operations.

use shm_core::ShmError;
use thiserror::Error;

/// Errors that can occur before any state is solved.
///
/// Once configuration is accepted the solver has no failure paths: numeric
/// trouble degrades single fields to "no value".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid solver configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Core error: {0}")]
    Core(#[from] ShmError),
}

pub type SolverResult<T> = Result<T, SolverError>;
