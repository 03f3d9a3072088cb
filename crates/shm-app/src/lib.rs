//! Shared application service layer.
//!
//! Turns validated requests into solver input, runs the pipeline, and
//! shapes results into responses. The request boundary
//! ([`handle_json`]/[`handle_request`]) never panics and never returns an
//! error: failures become responses with a status.

pub mod compile;
pub mod error;
pub mod explain;
pub mod solve_service;

pub use compile::{compile_config, compile_states};
pub use error::{AppError, AppResult};
pub use explain::explanation;
pub use solve_service::{
    Reply, RunOutput, Status, handle_json, handle_request, run_request, to_response,
};
