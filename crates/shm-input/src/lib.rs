//! Turning raw request tokens into typed partial states.
//!
//! A token goes through the value parser ([`Cell::parse`]), expressions are
//! resolved by the sandboxed arithmetic evaluator ([`evaluate`]), and the
//! [`Normalizer`] combines both with the per-request [`CarryTable`].

pub mod carry;
pub mod cell;
pub mod error;
pub mod expr;
pub mod normalize;

pub use carry::CarryTable;
pub use cell::{CARRY_MARKER, Cell, RawState};
pub use error::{ExprError, ExprResult};
pub use expr::{Bindings, evaluate};
pub use normalize::{Normalized, Normalizer, Unresolved};
