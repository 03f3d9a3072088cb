//! Request handling: parse, solve, and shape the response.

use std::panic::{AssertUnwindSafe, catch_unwind};

use shm_core::Family;
use shm_project::{SolveRequest, SolveResponse, StateResultDef, parse_json};
use shm_solver::{StateOutcome, solve_sequence};
use tracing::{error, info, warn};

use crate::compile::{compile_config, compile_states};
use crate::error::{AppError, AppResult};
use crate::explain::explanation;

/// Message returned when solving fails for a reason the caller cannot fix.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Outcome class of a handled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    ClientError,
    ServerError,
}

impl Status {
    /// Matching HTTP status code for transports that need one.
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::ClientError => 400,
            Status::ServerError => 500,
        }
    }
}

/// Response plus its status.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: Status,
    pub response: SolveResponse,
}

/// Solved request together with the per-state solver detail.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub system: Family,
    pub outcomes: Vec<StateOutcome>,
}

/// Solve a validated request.
pub fn run_request(request: &SolveRequest) -> AppResult<RunOutput> {
    let config = compile_config(&request.options)?;
    let states = compile_states(request);
    let outcomes = solve_sequence(&states, request.system, &config)?;
    Ok(RunOutput {
        system: request.system,
        outcomes,
    })
}

/// Shape solver output into the response document.
pub fn to_response(output: &RunOutput) -> SolveResponse {
    let text = explanation(output.system);
    let results = output
        .outcomes
        .iter()
        .map(|outcome| StateResultDef {
            values: outcome.state,
            warnings: outcome.warnings.iter().map(ToString::to_string).collect(),
            explanation: text.to_string(),
        })
        .collect();
    SolveResponse {
        system: Some(output.system),
        results,
        error: None,
    }
}

/// Handle a JSON request body.
pub fn handle_json(body: &str) -> Reply {
    match parse_json(body) {
        Ok(request) => handle_request(&request),
        Err(err) => {
            warn!(error = %err, "rejected request");
            Reply {
                status: Status::ClientError,
                response: SolveResponse::failure(None, err.to_string()),
            }
        }
    }
}

/// Handle an already parsed request. Never panics.
pub fn handle_request(request: &SolveRequest) -> Reply {
    let system = request.system;
    let result = catch_unwind(AssertUnwindSafe(|| run_request(request)));
    match result {
        Ok(Ok(output)) => {
            info!(%system, states = output.outcomes.len(), "request solved");
            Reply {
                status: Status::Ok,
                response: to_response(&output),
            }
        }
        Ok(Err(err)) if err.is_client_error() => {
            warn!(error = %err, "rejected request");
            Reply {
                status: Status::ClientError,
                response: SolveResponse::failure(Some(system), client_message(err)),
            }
        }
        Ok(Err(err)) => {
            error!(error = %err, "solve failed");
            server_error(system)
        }
        Err(_) => {
            error!(%system, "solver panicked");
            server_error(system)
        }
    }
}

fn client_message(err: AppError) -> String {
    match err {
        AppError::InvalidInput(message) => message,
        other => other.to_string(),
    }
}

fn server_error(system: Family) -> Reply {
    Reply {
        status: Status::ServerError,
        response: SolveResponse::failure(Some(system), INTERNAL_ERROR_MESSAGE),
    }
}
