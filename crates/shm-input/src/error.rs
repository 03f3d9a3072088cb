//! Error types for expression evaluation.

use thiserror::Error;

/// Reasons an expression cell cannot be turned into a number.
///
/// These never abort a request: the normalizer degrades the cell to unset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Unexpected {found} (expected {expected})")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
    },

    #[error("Unexpected end of expression (expected {expected})")]
    UnexpectedEnd { expected: &'static str },

    #[error("Unknown name: {name}")]
    UnknownName { name: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Non-finite result")]
    NonFinite,

    #[error("Expression nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("Expression too long: {len} characters (limit {limit})")]
    TooLong { len: usize, limit: usize },
}

pub type ExprResult<T> = Result<T, ExprError>;
