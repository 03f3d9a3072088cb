//! Request and response definitions.

use serde::{Deserialize, Serialize};
use shm_core::{Family, State};
use std::collections::BTreeMap;

/// A solve request: one oscillator family and its ordered states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolveRequest {
    #[serde(default)]
    pub system: Family,
    pub states: Vec<StateDef>,
    #[serde(default, skip_serializing_if = "OptionsDef::is_empty")]
    pub options: OptionsDef,
}

/// Raw tokens of one state keyed by canonical field name.
///
/// A `None` token is an explicit null and behaves like a blank field.
pub type StateDef = BTreeMap<String, Option<TokenDef>>;

/// A field token as written in the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TokenDef {
    Number(f64),
    /// Numeric text, the carry marker `=`, an expression, or blank.
    Text(String),
}

/// Optional overrides of the solver defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsDef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency_tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_gravity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_instant_omega: Option<bool>,
}

impl OptionsDef {
    pub fn is_empty(&self) -> bool {
        *self == OptionsDef::default()
    }
}

/// Response to a solve request, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolveResponse {
    /// Echo of the request family; absent when the body could not be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<Family>,
    #[serde(default)]
    pub results: Vec<StateResultDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolveResponse {
    pub fn failure(system: Option<Family>, message: impl Into<String>) -> Self {
        Self {
            system,
            results: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// One solved state: all 17 fields (null when unknown), warnings and the
/// family's explanation text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateResultDef {
    #[serde(flatten)]
    pub values: State,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}
