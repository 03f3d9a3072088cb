//! State normalizer: cells + carry table -> typed partial state.

use crate::carry::CarryTable;
use crate::cell::{Cell, RawState};
use crate::error::ExprError;
use crate::expr::{Bindings, evaluate};
use shm_core::{Family, Quantity, Real, State};
use std::fmt;
use tracing::debug;

/// A field whose cell could not be turned into a number.
#[derive(Clone, Debug, PartialEq)]
pub enum Unresolved {
    /// Carry marker with no earlier value for the field.
    NothingToCarry(Quantity),
    /// Expression that failed to evaluate.
    Expression {
        quantity: Quantity,
        text: String,
        reason: ExprError,
    },
}

impl Unresolved {
    pub fn quantity(&self) -> Quantity {
        match self {
            Unresolved::NothingToCarry(q) => *q,
            Unresolved::Expression { quantity, .. } => *quantity,
        }
    }
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unresolved::NothingToCarry(q) => write!(f, "{q}: nothing to carry"),
            Unresolved::Expression {
                quantity,
                text,
                reason,
            } => write!(f, "{quantity}: '{text}' ({reason})"),
        }
    }
}

/// Output of normalizing one state.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    pub state: State,
    /// Fields that degraded to unset. Informational only.
    pub unresolved: Vec<Unresolved>,
}

/// Normalizes the states of one request in order, owning its carry table.
///
/// Resolution order within a state:
/// 1. numbers (recorded in the carry table) and carry markers,
/// 2. expressions, retried in canonical order while any of them resolves,
///    so an expression may use numbers given anywhere in the same state
///    and falls back to earlier states for everything else; a field that
///    another expression in the state still has to produce is never read
///    from an earlier state,
/// 3. the pendulum gravity default.
///
/// A blank field never carries; only the explicit marker does.
#[derive(Clone, Debug)]
pub struct Normalizer {
    table: CarryTable,
    standard_gravity: Real,
}

impl Normalizer {
    pub fn new(standard_gravity: Real) -> Self {
        Self {
            table: CarryTable::new(),
            standard_gravity,
        }
    }

    pub fn carry_table(&self) -> &CarryTable {
        &self.table
    }

    pub fn normalize(&mut self, raw: &RawState, family: Family) -> Normalized {
        let mut state = State::new();
        let mut unresolved = Vec::new();
        let mut pending: Vec<(Quantity, &str)> = Vec::new();

        for (q, cell) in raw.iter() {
            match cell {
                Cell::Number(v) => {
                    state.fill(q, *v);
                    self.table.record(q, *v);
                }
                Cell::Carry => match self.table.get(q) {
                    Some(v) => {
                        state.fill(q, v);
                    }
                    None => unresolved.push(Unresolved::NothingToCarry(q)),
                },
                Cell::Expression(text) => pending.push((q, text.as_str())),
                Cell::Unset => {}
            }
        }

        let mut hidden = [false; Quantity::COUNT];
        for (q, _) in &pending {
            hidden[q.index()] = true;
        }

        loop {
            let before = pending.len();
            let mut waiting = Vec::new();
            for (q, text) in pending.drain(..) {
                let vars = PendingOverlay {
                    table: &self.table,
                    hidden: &hidden,
                    own: q,
                };
                match evaluate(text, &vars) {
                    Ok(v) => {
                        state.fill(q, v);
                        self.table.record(q, v);
                        hidden[q.index()] = false;
                    }
                    // Retried once a sibling expression lands in the table.
                    Err(reason @ ExprError::UnknownName { .. }) => {
                        waiting.push((q, text, reason));
                    }
                    Err(reason) => {
                        hidden[q.index()] = false;
                        unresolved.push(expression_failure(q, text, reason));
                    }
                }
            }

            if waiting.is_empty() || waiting.len() == before {
                for (q, text, reason) in waiting {
                    unresolved.push(expression_failure(q, text, reason));
                }
                break;
            }
            pending = waiting.into_iter().map(|(q, text, _)| (q, text)).collect();
        }

        if family == Family::Pendulum && state.fill(Quantity::Gravity, self.standard_gravity) {
            debug!(g = self.standard_gravity, "applied standard gravity");
        }

        unresolved.sort_by_key(Unresolved::quantity);
        Normalized { state, unresolved }
    }
}

/// Carry table as seen by one pending expression. Fields still awaiting
/// their own expression in this state are hidden; the expression's own
/// field stays visible so `m * 2` scales the previous `m`.
struct PendingOverlay<'a> {
    table: &'a CarryTable,
    hidden: &'a [bool; Quantity::COUNT],
    own: Quantity,
}

impl Bindings for PendingOverlay<'_> {
    fn value(&self, name: &str) -> Option<Real> {
        let q = Quantity::from_key(name)?;
        if q != self.own && self.hidden[q.index()] {
            return None;
        }
        self.table.get(q)
    }
}

fn expression_failure(quantity: Quantity, text: &str, reason: ExprError) -> Unresolved {
    debug!(%quantity, text, %reason, "expression unresolved");
    Unresolved::Expression {
        quantity,
        text: text.to_string(),
        reason,
    }
}
