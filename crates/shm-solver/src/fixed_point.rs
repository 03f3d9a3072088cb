//! Fixed-point solver: apply the rule battery until nothing changes.

use crate::config::SolverConfig;
use crate::rules::battery;
use shm_core::{Family, Quantity, State};
use tracing::{debug, trace};

/// Where a derived value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Filled from the previous state by the family's scaling law.
    Propagation,
    /// Filled by the rule battery in the given 1-based pass.
    Pass(usize),
}

/// One field filled by the engine rather than given in input.
#[derive(Clone, Debug, PartialEq)]
pub struct Derivation {
    pub quantity: Quantity,
    pub rule: &'static str,
    pub stage: Stage,
}

/// Fixed-point iteration result.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveReport {
    /// Solved state
    pub state: State,
    /// Passes run, including the final pass that changed nothing
    pub passes: usize,
    /// Whether a pass without change was observed within the budget
    pub converged: bool,
    /// Fields filled, in the order they were filled
    pub derivations: Vec<Derivation>,
}

/// Run one ordered scan over the battery.
///
/// Produces a new record; rules later in the scan see values filled earlier
/// in the same pass.
pub fn apply_pass(
    state: &State,
    family: Family,
    pass: usize,
    derivations: &mut Vec<Derivation>,
) -> State {
    let mut next = *state;
    for rule in battery(family) {
        if next.is_set(rule.target) {
            continue;
        }
        if let Some(value) = rule.derive(&next) {
            next.fill(rule.target, value);
            trace!(quantity = %rule.target, rule = rule.name, value, pass, "derived");
            derivations.push(Derivation {
                quantity: rule.target,
                rule: rule.name,
                stage: Stage::Pass(pass),
            });
        }
    }
    next
}

/// Solve one state to its fixed point.
///
/// Given fields are never changed. Solving an already solved state returns
/// it unchanged after a single pass.
pub fn solve_state(state: &State, family: Family, config: &SolverConfig) -> SolveReport {
    let mut current = *state;
    let mut derivations = Vec::new();

    for pass in 1..=config.max_passes {
        let filled_before = derivations.len();
        let next = apply_pass(&current, family, pass, &mut derivations);
        if derivations.len() == filled_before {
            debug!(passes = pass, known = current.known_count(), "fixed point reached");
            return SolveReport {
                state: current,
                passes: pass,
                converged: true,
                derivations,
            };
        }
        current = next;
    }

    debug!(
        passes = config.max_passes,
        known = current.known_count(),
        "pass budget exhausted before fixed point"
    );
    SolveReport {
        state: current,
        passes: config.max_passes,
        converged: false,
        derivations,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_state() -> impl Strategy<Value = State> {
        prop::collection::vec(prop::option::of(-50.0_f64..50.0_f64), Quantity::COUNT).prop_map(
            |values| {
                let mut state = State::new();
                for (q, v) in Quantity::ALL.into_iter().zip(values) {
                    if let Some(v) = v {
                        state.fill(q, v);
                    }
                }
                state
            },
        )
    }

    fn arb_family() -> impl Strategy<Value = Family> {
        prop_oneof![Just(Family::Spring), Just(Family::Pendulum)]
    }

    proptest! {
        #[test]
        fn solving_is_idempotent(state in arb_state(), family in arb_family()) {
            let config = SolverConfig::default();
            let once = solve_state(&state, family, &config);
            prop_assert!(once.converged);
            let twice = solve_state(&once.state, family, &config);
            prop_assert_eq!(twice.state, once.state);
        }

        #[test]
        fn given_values_survive(state in arb_state(), family in arb_family()) {
            let solved = solve_state(&state, family, &SolverConfig::default()).state;
            for (q, v) in state.known() {
                prop_assert_eq!(solved.get(q), Some(v));
            }
        }

        #[test]
        fn solving_is_deterministic(state in arb_state(), family in arb_family()) {
            let config = SolverConfig::default();
            let a = solve_state(&state, family, &config);
            let b = solve_state(&state, family, &config);
            prop_assert_eq!(a, b);
        }
    }
}
