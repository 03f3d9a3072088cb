//! Input-shape validation of request bodies.
//!
//! Works on an untyped JSON value so that every rejection can name the
//! offending state and field instead of surfacing a generic decode error.

use crate::schema::{OptionsDef, SolveRequest, StateDef, TokenDef};
use serde_json::Value;
use shm_core::{Family, Quantity};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("Request body is empty")]
    EmptyBody,

    #[error("Request body is not valid {format}: {message}")]
    Malformed {
        format: &'static str,
        message: String,
    },

    #[error("Request body must be a mapping")]
    NotAMapping,

    #[error("Request is missing the 'states' field")]
    MissingStates,

    #[error("'states' must be a list")]
    StatesNotAList,

    #[error("'system' must be a string")]
    SystemNotAString,

    #[error("Unknown system '{name}' (expected 'spring' or 'pendulum')")]
    UnknownSystem { name: String },

    #[error("State {} must be a mapping", .index + 1)]
    StateNotAMapping { index: usize },

    #[error("State {}: field '{field}' must be a number, a string or null", .index + 1)]
    BadToken { index: usize, field: String },

    #[error("State {}: field '{field}' is given more than once ({keys})", .index + 1)]
    DuplicateField {
        index: usize,
        field: String,
        keys: String,
    },

    #[error("Invalid options: {message}")]
    BadOptions { message: String },
}

/// Check the shape of a decoded request and build the typed request.
///
/// Field keys are normalized to canonical names (the net-force aliases
/// become `sigmaF`); keys that are not quantities are ignored.
pub fn parse_request_value(value: &Value) -> Result<SolveRequest, ShapeError> {
    let body = value.as_object().ok_or(ShapeError::NotAMapping)?;

    let system = match body.get("system") {
        None | Some(Value::Null) => Family::default(),
        Some(Value::String(name)) => name
            .parse::<Family>()
            .map_err(|_| ShapeError::UnknownSystem { name: name.clone() })?,
        Some(_) => return Err(ShapeError::SystemNotAString),
    };

    let states = match body.get("states") {
        None => return Err(ShapeError::MissingStates),
        Some(Value::Array(states)) => states,
        Some(_) => return Err(ShapeError::StatesNotAList),
    };

    let states = states
        .iter()
        .enumerate()
        .map(|(index, state)| parse_state(index, state))
        .collect::<Result<Vec<_>, _>>()?;

    let options = match body.get("options") {
        None | Some(Value::Null) => OptionsDef::default(),
        Some(options) => serde_json::from_value(options.clone()).map_err(|e| {
            ShapeError::BadOptions {
                message: e.to_string(),
            }
        })?,
    };

    Ok(SolveRequest {
        system,
        states,
        options,
    })
}

fn parse_state(index: usize, value: &Value) -> Result<StateDef, ShapeError> {
    let fields = value
        .as_object()
        .ok_or(ShapeError::StateNotAMapping { index })?;

    let mut state = StateDef::new();
    let mut sources: Vec<(Quantity, &str)> = Vec::new();

    for (key, token) in fields {
        let Some(quantity) = Quantity::from_key(key) else {
            continue;
        };
        let token = match token {
            Value::Null => None,
            Value::Number(n) => n.as_f64().map(TokenDef::Number),
            Value::String(s) => Some(TokenDef::Text(s.clone())),
            _ => {
                return Err(ShapeError::BadToken {
                    index,
                    field: key.clone(),
                });
            }
        };

        if let Some((_, first)) = sources.iter().find(|(q, _)| *q == quantity) {
            return Err(ShapeError::DuplicateField {
                index,
                field: quantity.name().to_string(),
                keys: format!("{first}, {key}"),
            });
        }
        sources.push((quantity, key.as_str()));
        state.insert(quantity.name().to_string(), token);
    }

    Ok(state)
}
