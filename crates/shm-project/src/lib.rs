//! shm-project: request/response file format and input-shape validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ShapeError, parse_request_value};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Invalid request: {0}")]
    Shape(#[from] ShapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a JSON request body.
pub fn parse_json(body: &str) -> Result<SolveRequest, ShapeError> {
    if body.trim().is_empty() {
        return Err(ShapeError::EmptyBody);
    }
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ShapeError::Malformed {
            format: "JSON",
            message: e.to_string(),
        })?;
    parse_request_value(&value)
}

/// Parse a YAML request document.
pub fn parse_yaml(body: &str) -> Result<SolveRequest, ShapeError> {
    if body.trim().is_empty() {
        return Err(ShapeError::EmptyBody);
    }
    let value: serde_json::Value =
        serde_yaml::from_str(body).map_err(|e| ShapeError::Malformed {
            format: "YAML",
            message: e.to_string(),
        })?;
    parse_request_value(&value)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Load a request file; `.yaml`/`.yml` are read as YAML, anything else as JSON.
pub fn load_request(path: &Path) -> ProjectResult<SolveRequest> {
    let content = std::fs::read_to_string(path)?;
    let request = if is_yaml(path) {
        parse_yaml(&content)?
    } else {
        parse_json(&content)?
    };
    Ok(request)
}

/// Save a request file in the format implied by its extension.
pub fn save_request(path: &Path, request: &SolveRequest) -> ProjectResult<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(request)?
    } else {
        serde_json::to_string_pretty(request)?
    };
    std::fs::write(path, content)?;
    Ok(())
}
