//! Advisory audit of redundant relations in a solved state.

use core::f64::consts::TAU;
use core::fmt;
use shm_core::{
    Family, Quantity as Q, Real, State, Tolerances, checked_div, checked_sqrt, exceeds_tolerance,
    format_sig,
};

/// A solved value that disagrees with what another relation predicts.
#[derive(Clone, Debug, PartialEq)]
pub struct Inconsistency {
    pub quantity: Q,
    pub actual: Real,
    pub expected: Real,
    /// The relation that produced `expected`, e.g. `√(k/m)`.
    pub relation: &'static str,
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) inconsistent with {} ({})",
            self.quantity,
            format_sig(self.actual, 6),
            self.relation,
            format_sig(self.expected, 6)
        )
    }
}

struct Relation {
    quantity: Q,
    relation: &'static str,
    family: Option<Family>,
    expected: fn(&State) -> Option<Real>,
}

const RELATIONS: [Relation; 5] = [
    Relation {
        quantity: Q::Omega,
        relation: "√(k/m)",
        family: Some(Family::Spring),
        expected: |s| checked_sqrt(checked_div(s.get(Q::Stiffness)?, s.get(Q::Mass)?)?),
    },
    Relation {
        quantity: Q::Frequency,
        relation: "omega/2π",
        family: None,
        expected: |s| Some(s.get(Q::Omega)? / TAU),
    },
    Relation {
        quantity: Q::Period,
        relation: "1/f",
        family: None,
        expected: |s| checked_div(1.0, s.get(Q::Frequency)?),
    },
    Relation {
        quantity: Q::NetForce,
        relation: "k·x",
        family: None,
        expected: |s| Some(s.get(Q::Stiffness)? * s.get(Q::Displacement)?),
    },
    Relation {
        quantity: Q::Kinetic,
        relation: "½·m·v²",
        family: None,
        expected: |s| Some(0.5 * s.get(Q::Mass)? * s.get(Q::Velocity)?.powi(2)),
    },
];

/// Re-derive the redundant relations of `state` and report every mismatch
/// beyond `tol`. The state is not modified.
pub fn check_consistency(state: &State, family: Family, tol: Tolerances) -> Vec<Inconsistency> {
    RELATIONS
        .iter()
        .filter(|r| r.family.is_none_or(|f| f == family))
        .filter_map(|r| {
            let actual = state.get(r.quantity)?;
            let expected = (r.expected)(state).filter(|v| v.is_finite())?;
            exceeds_tolerance(actual, expected, tol).then_some(Inconsistency {
                quantity: r.quantity,
                actual,
                expected,
                relation: r.relation,
            })
        })
        .collect()
}
