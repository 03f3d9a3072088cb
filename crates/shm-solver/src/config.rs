//! Solver configuration.

use crate::error::{SolverError, SolverResult};
use shm_core::units::constants::STANDARD_GRAVITY_MPS2;
use shm_core::{Real, Tolerances, ensure_finite};

/// Pass budget. Every effective pass fills at least one of the 17 fields,
/// so 18 passes always reach the fixed point.
pub const DEFAULT_MAX_PASSES: usize = 20;

/// Relative mismatch above which a redundant relation is reported.
pub const CONSISTENCY_REL_TOL: Real = 0.01;

/// Floor for the expected magnitude in the mismatch test.
pub const CONSISTENCY_ABS_FLOOR: Real = 1e-9;

/// Solver configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Maximum fixed-point passes per state
    pub max_passes: usize,
    /// Tolerance for the consistency checker
    pub consistency: Tolerances,
    /// Gravity applied to pendulum states without `g` (m/s²)
    pub standard_gravity: Real,
    /// Treat consecutive states as two instants of one motion and estimate
    /// `omega` from their (x, v) pairs
    pub two_instant_omega: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            consistency: Tolerances {
                abs: CONSISTENCY_ABS_FLOOR,
                rel: CONSISTENCY_REL_TOL,
            },
            standard_gravity: STANDARD_GRAVITY_MPS2,
            two_instant_omega: false,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if self.max_passes == 0 {
            return Err(SolverError::InvalidConfig {
                what: "max_passes must be at least 1".to_string(),
            });
        }
        let rel = ensure_finite(self.consistency.rel, "consistency tolerance")?;
        if rel <= 0.0 {
            return Err(SolverError::InvalidConfig {
                what: format!("consistency tolerance must be positive, got {rel}"),
            });
        }
        let abs = ensure_finite(self.consistency.abs, "consistency floor")?;
        if abs < 0.0 {
            return Err(SolverError::InvalidConfig {
                what: format!("consistency floor must not be negative, got {abs}"),
            });
        }
        let g = ensure_finite(self.standard_gravity, "standard gravity")?;
        if g <= 0.0 {
            return Err(SolverError::InvalidConfig {
                what: format!("standard gravity must be positive, got {g}"),
            });
        }
        Ok(())
    }
}
