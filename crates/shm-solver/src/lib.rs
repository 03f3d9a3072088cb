//! Inference engine for ideal simple harmonic oscillators.
//!
//! Each state of a request is normalized, seeded from the previous solved
//! state through the family's scaling law, driven to a fixed point by a
//! fixed battery of identities, and finally audited for mutually
//! inconsistent values.

pub mod config;
pub mod consistency;
pub mod error;
pub mod fixed_point;
pub mod propagate;
pub mod rules;
pub mod sequence;

pub use config::SolverConfig;
pub use consistency::{Inconsistency, check_consistency};
pub use error::{SolverError, SolverResult};
pub use fixed_point::{Derivation, SolveReport, Stage, solve_state};
pub use propagate::{Propagation, propagate};
pub use rules::{RULES, Rule};
pub use sequence::{StateOutcome, solve_sequence};
