//! Per-request memory of the latest known value of each field.

use crate::expr::Bindings;
use shm_core::{Quantity, Real};

/// Most recent value seen for each quantity across the states normalized
/// so far. Built empty for every request and dropped with it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CarryTable {
    values: [Option<Real>; Quantity::COUNT],
}

impl CarryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, q: Quantity) -> Option<Real> {
        self.values[q.index()]
    }

    /// Remember `v` as the latest value of `q`, replacing any older one.
    pub fn record(&mut self, q: Quantity, v: Real) {
        self.values[q.index()] = Some(v);
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

impl Bindings for CarryTable {
    fn value(&self, name: &str) -> Option<Real> {
        Quantity::from_key(name).and_then(|q| self.get(q))
    }
}
