//! Error types for the service layer.

/// Application error type that wraps errors from the backend crates
/// and provides a unified error interface for the CLI and the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("Project error: {0}")]
    Project(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for service operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Whether the caller, not the service, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }
}

impl From<shm_project::ShapeError> for AppError {
    fn from(err: shm_project::ShapeError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<shm_project::ProjectError> for AppError {
    fn from(err: shm_project::ProjectError) -> Self {
        match err {
            shm_project::ProjectError::Shape(shape) => shape.into(),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<shm_solver::SolverError> for AppError {
    fn from(err: shm_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}
