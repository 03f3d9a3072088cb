//! Cross-state propagation through each family's scaling law.
//!
//! Runs on state `i` after normalization and before solving, against the
//! fully solved state `i - 1`. It answers "how does one quantity respond
//! when another is changed": a new pendulum length implies a new period, a
//! new mass on the same kind of spring implies a new stiffness or period.

use crate::config::SolverConfig;
use crate::fixed_point::{Derivation, Stage};
use core::f64::consts::TAU;
use shm_core::{Family, Quantity as Q, Real, State, checked_div, checked_sqrt, finite};
use tracing::debug;

/// Current state with propagated fields filled in.
#[derive(Clone, Debug, PartialEq)]
pub struct Propagation {
    pub state: State,
    pub derivations: Vec<Derivation>,
}

/// Fill fields of `current` that follow from `prev` (already solved).
pub fn propagate(
    prev: &State,
    current: &State,
    family: Family,
    config: &SolverConfig,
) -> Propagation {
    let mut out = Propagation {
        state: *current,
        derivations: Vec::new(),
    };

    match family {
        Family::Pendulum => pendulum(prev, &mut out),
        Family::Spring => spring(prev, &mut out),
    }

    if config.two_instant_omega {
        two_instant(prev, &mut out);
    }

    out
}

impl Propagation {
    fn fill(&mut self, quantity: Q, value: Option<Real>, rule: &'static str) {
        let Some(value) = value.and_then(finite) else {
            return;
        };
        if self.state.fill(quantity, value) {
            debug!(%quantity, value, rule, "propagated from previous state");
            self.derivations.push(Derivation {
                quantity,
                rule,
                stage: Stage::Propagation,
            });
        }
    }
}

// T² ∝ L/g, so L ∝ g·T².
fn pendulum(prev: &State, out: &mut Propagation) {
    let cur = out.state;
    let scaled = prev.get(Q::Length).zip(prev.get(Q::Period));
    // g_i / g_{i-1}; current g falls back to the previous one.
    let gravity_ratio = match (prev.get(Q::Gravity), cur.get(Q::Gravity)) {
        (Some(g0), Some(g1)) => checked_div(g1, g0),
        _ => Some(1.0),
    };

    match (cur.get(Q::Length), cur.get(Q::Period)) {
        (None, Some(t1)) => {
            let Some((l0, t0)) = scaled else { return };
            let value = checked_div(t1, t0)
                .zip(gravity_ratio)
                .map(|(ratio, g)| l0 * ratio.powi(2) * g);
            out.fill(Q::Length, value, "L = L₀·(T/T₀)²·(g/g₀)");
        }
        (Some(l1), None) => match scaled {
            Some((l0, t0)) => {
                let value = checked_div(l1, l0)
                    .zip(gravity_ratio)
                    .and_then(|(ratio, g)| checked_sqrt(checked_div(ratio, g)?))
                    .map(|root| t0 * root);
                out.fill(Q::Period, value, "T = T₀·√((L/L₀)·(g₀/g))");
            }
            None => {
                let value = cur
                    .get(Q::Gravity)
                    .and_then(|g1| checked_sqrt(checked_div(l1, g1)?))
                    .map(|root| TAU * root);
                out.fill(Q::Period, value, "T = 2π·√(L/g)");
            }
        },
        _ => {}
    }
}

/// Period of a state from T, else omega, else f.
fn period_of(s: &State) -> Option<Real> {
    s.get(Q::Period)
        .or_else(|| checked_div(TAU, s.get(Q::Omega)?))
        .or_else(|| checked_div(1.0, s.get(Q::Frequency)?))
}

// T² = const·m/k, with const taken from the previous state.
fn spring(prev: &State, out: &mut Propagation) {
    let Some(constant) = spring_constant(prev) else {
        return;
    };
    let cur = out.state;
    let period = period_of(&cur);

    match (cur.get(Q::Mass), cur.get(Q::Stiffness), period) {
        (Some(m1), None, Some(t1)) => {
            let value = checked_div(constant * m1, t1.powi(2));
            out.fill(Q::Stiffness, value, "k = const·m/T²");
        }
        (None, Some(k1), Some(t1)) => {
            let value = checked_div(t1.powi(2) * k1, constant);
            out.fill(Q::Mass, value, "m = T²·k/const");
        }
        (Some(m1), Some(k1), None) => {
            let value = checked_div(constant * m1, k1).and_then(checked_sqrt);
            out.fill(Q::Period, value, "T = √(const·m/k)");
        }
        _ => {}
    }
}

/// `T² · k / m` of a state that has both mass and stiffness.
fn spring_constant(s: &State) -> Option<Real> {
    let (m, k) = s.get(Q::Mass).zip(s.get(Q::Stiffness))?;
    let t = period_of(s)?;
    checked_div(t.powi(2) * k, m).filter(|c| *c > 0.0)
}

// Two instants of one motion: v² = omega²·(A² − x²) at both, so
// omega² = (v₀² − v₁²) / (x₁² − x₀²).
fn two_instant(prev: &State, out: &mut Propagation) {
    let cur = out.state;
    if cur.is_set(Q::Omega) || cur.is_set(Q::Period) || cur.is_set(Q::Frequency) {
        return;
    }
    let (Some(x0), Some(v0)) = (prev.get(Q::Displacement), prev.get(Q::Velocity)) else {
        return;
    };
    let (Some(x1), Some(v1)) = (cur.get(Q::Displacement), cur.get(Q::Velocity)) else {
        return;
    };
    let omega_sq = checked_div(v0.powi(2) - v1.powi(2), x1.powi(2) - x0.powi(2));
    let value = omega_sq.filter(|w| *w > 0.0).and_then(checked_sqrt);
    out.fill(Q::Omega, value, "omega = √((v₀² − v₁²)/(x₁² − x₀²))");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(prev: State, current: State, family: Family) -> Propagation {
        propagate(&prev, &current, family, &SolverConfig::default())
    }

    #[test]
    fn pendulum_period_from_new_length() {
        let prev = State::new()
            .with(Q::Length, 2.0)
            .with(Q::Period, 2.5)
            .with(Q::Gravity, 9.81);
        let cur = State::new().with(Q::Length, 8.0).with(Q::Gravity, 9.81);
        let out = run(prev, cur, Family::Pendulum);
        assert!((out.state.get(Q::Period).unwrap() - 5.0).abs() < 1e-12);
        assert_eq!(out.derivations.len(), 1);
        assert_eq!(out.derivations[0].stage, Stage::Propagation);
    }

    #[test]
    fn pendulum_length_from_new_period_and_gravity() {
        let prev = State::new()
            .with(Q::Length, 1.0)
            .with(Q::Period, 2.0)
            .with(Q::Gravity, 9.81);
        // Same period under a quarter of the gravity needs a quarter of the length.
        let cur = State::new()
            .with(Q::Period, 2.0)
            .with(Q::Gravity, 9.81 / 4.0);
        let out = run(prev, cur, Family::Pendulum);
        assert!((out.state.get(Q::Length).unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn pendulum_period_from_length_under_new_gravity() {
        let prev = State::new()
            .with(Q::Length, 1.0)
            .with(Q::Period, 2.0)
            .with(Q::Gravity, 9.81);
        // Same length under a quarter of the gravity doubles the period.
        let cur = State::new()
            .with(Q::Length, 1.0)
            .with(Q::Gravity, 9.81 / 4.0);
        let out = run(prev, cur, Family::Pendulum);
        assert!((out.state.get(Q::Period).unwrap() - 4.0).abs() < 1e-12);
        assert_eq!(out.derivations[0].quantity, Q::Period);
    }

    #[test]
    fn pendulum_absolute_period_without_reference() {
        let prev = State::new().with(Q::Gravity, 9.81);
        let cur = State::new().with(Q::Length, 9.81).with(Q::Gravity, 9.81);
        let out = run(prev, cur, Family::Pendulum);
        assert!((out.state.get(Q::Period).unwrap() - TAU).abs() < 1e-12);
    }

    #[test]
    fn pendulum_needs_exactly_one_side() {
        let prev = State::new()
            .with(Q::Length, 2.0)
            .with(Q::Period, 2.5)
            .with(Q::Gravity, 9.81);
        let both = State::new()
            .with(Q::Length, 8.0)
            .with(Q::Period, 1.0)
            .with(Q::Gravity, 9.81);
        assert!(run(prev, both, Family::Pendulum).derivations.is_empty());
        let neither = State::new().with(Q::Gravity, 9.81);
        assert!(run(prev, neither, Family::Pendulum).derivations.is_empty());
    }

    fn solved_spring() -> State {
        // m = 1, k = 4π² gives T = 1 and const = 4π².
        State::new()
            .with(Q::Mass, 1.0)
            .with(Q::Stiffness, TAU * TAU)
            .with(Q::Period, 1.0)
    }

    #[test]
    fn spring_period_from_new_mass() {
        let cur = State::new()
            .with(Q::Mass, 4.0)
            .with(Q::Stiffness, TAU * TAU);
        let out = run(solved_spring(), cur, Family::Spring);
        assert!((out.state.get(Q::Period).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn spring_stiffness_and_mass() {
        let cur = State::new().with(Q::Mass, 2.0).with(Q::Period, 0.5);
        let out = run(solved_spring(), cur, Family::Spring);
        let k = out.state.get(Q::Stiffness).unwrap();
        assert!((k - TAU * TAU * 2.0 / 0.25).abs() < 1e-9);

        // Period supplied as omega.
        let cur = State::new().with(Q::Stiffness, TAU * TAU).with(Q::Omega, TAU);
        let out = run(solved_spring(), cur, Family::Spring);
        assert!((out.state.get(Q::Mass).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn spring_requires_mass_and_stiffness_before() {
        let prev = State::new().with(Q::Mass, 2.0).with(Q::Displacement, 0.1);
        let cur = State::new().with(Q::Mass, 0.5).with(Q::Period, 1.0);
        assert!(run(prev, cur, Family::Spring).derivations.is_empty());
    }

    #[test]
    fn two_instant_omega_is_opt_in() {
        // omega = 2, A = 1: x = 0.6 -> v = 1.6, x = 0.8 -> v = 1.2
        let prev = State::new()
            .with(Q::Displacement, 0.6)
            .with(Q::Velocity, 1.6);
        let cur = State::new()
            .with(Q::Displacement, 0.8)
            .with(Q::Velocity, 1.2);
        assert!(run(prev, cur, Family::Spring).derivations.is_empty());

        let config = SolverConfig {
            two_instant_omega: true,
            ..SolverConfig::default()
        };
        let out = propagate(&prev, &cur, Family::Spring, &config);
        assert!((out.state.get(Q::Omega).unwrap() - 2.0).abs() < 1e-9);
    }
}
