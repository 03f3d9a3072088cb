//! Value parser: raw token -> typed cell.

use shm_core::{Quantity, Real};

/// Token meaning "reuse the most recent known value for this field".
pub const CARRY_MARKER: &str = "=";

/// A raw field after classification, before any numeric logic.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Cell {
    Number(Real),
    Carry,
    Expression(String),
    /// Blank or absent. A blank field does not carry; only [`Cell::Carry`] does.
    #[default]
    Unset,
}

impl Cell {
    /// Classify a textual token. Surrounding whitespace is ignored.
    pub fn parse(raw: Option<&str>) -> Cell {
        let Some(raw) = raw else {
            return Cell::Unset;
        };
        let token = raw.trim();
        if token.is_empty() {
            Cell::Unset
        } else if token == CARRY_MARKER {
            Cell::Carry
        } else if let Some(v) = parse_number(token) {
            Cell::Number(v)
        } else {
            Cell::Expression(token.to_string())
        }
    }

    /// Wrap an already-numeric token (e.g. a JSON number).
    pub fn from_number(v: Real) -> Cell {
        if v.is_finite() { Cell::Number(v) } else { Cell::Unset }
    }
}

// `inf` and `NaN` parse as f64 but are not measurements; they fall through
// to the evaluator, which rejects them as unknown names.
fn parse_number(token: &str) -> Option<Real> {
    token.parse::<Real>().ok().filter(|v| v.is_finite())
}

/// One state's worth of cells, indexed by quantity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawState {
    cells: [Cell; Quantity::COUNT],
}

impl RawState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, q: Quantity, cell: Cell) {
        self.cells[q.index()] = cell;
    }

    pub fn with(mut self, q: Quantity, cell: Cell) -> Self {
        self.set(q, cell);
        self
    }

    pub fn get(&self, q: Quantity) -> &Cell {
        &self.cells[q.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quantity, &Cell)> + '_ {
        Quantity::ALL.into_iter().map(|q| (q, self.get(q)))
    }
}
