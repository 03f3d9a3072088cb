//! Per-request pipeline over an ordered sequence of states.

use crate::config::SolverConfig;
use crate::consistency::{Inconsistency, check_consistency};
use crate::error::SolverResult;
use crate::fixed_point::{Derivation, solve_state};
use crate::propagate::propagate;
use shm_core::{Family, State};
use shm_input::{Normalizer, RawState, Unresolved};
use tracing::debug;

/// Everything known about one input state after solving.
#[derive(Clone, Debug, PartialEq)]
pub struct StateOutcome {
    pub state: State,
    pub warnings: Vec<Inconsistency>,
    /// Propagated fields first, then fields derived by the rule battery.
    pub derivations: Vec<Derivation>,
    /// Cells that degraded to "no value" during normalization.
    pub unresolved: Vec<Unresolved>,
    pub passes: usize,
    pub converged: bool,
}

/// Solve `states` in order.
///
/// State `i` sees the carry table built from states `0..=i` and the solved
/// values of state `i - 1`; it never sees later states.
pub fn solve_sequence(
    states: &[RawState],
    family: Family,
    config: &SolverConfig,
) -> SolverResult<Vec<StateOutcome>> {
    config.validate()?;

    let mut normalizer = Normalizer::new(config.standard_gravity);
    let mut outcomes: Vec<StateOutcome> = Vec::with_capacity(states.len());

    for (index, raw) in states.iter().enumerate() {
        let normalized = normalizer.normalize(raw, family);

        let (seeded, mut derivations) = match outcomes.last() {
            Some(prev) => {
                let propagated = propagate(&prev.state, &normalized.state, family, config);
                (propagated.state, propagated.derivations)
            }
            None => (normalized.state, Vec::new()),
        };

        let report = solve_state(&seeded, family, config);
        derivations.extend(report.derivations);
        let warnings = check_consistency(&report.state, family, config.consistency);

        debug!(
            index,
            %family,
            known = report.state.known_count(),
            passes = report.passes,
            warnings = warnings.len(),
            "state solved"
        );

        outcomes.push(StateOutcome {
            state: report.state,
            warnings,
            derivations,
            unresolved: normalized.unresolved,
            passes: report.passes,
            converged: report.converged,
        });
    }

    Ok(outcomes)
}
