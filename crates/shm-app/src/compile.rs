//! Compile a validated request into solver input.

use shm_core::{Quantity, Tolerances};
use shm_input::{Cell, RawState};
use shm_project::{OptionsDef, SolveRequest, StateDef, TokenDef};
use shm_solver::SolverConfig;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Build one [`RawState`] per request state, in request order.
pub fn compile_states(request: &SolveRequest) -> Vec<RawState> {
    request.states.iter().map(compile_state).collect()
}

fn compile_state(def: &StateDef) -> RawState {
    let mut raw = RawState::new();
    for (key, token) in def {
        let Some(quantity) = Quantity::from_key(key) else {
            debug!(key = %key, "ignoring unknown field");
            continue;
        };
        raw.set(quantity, compile_token(token.as_ref()));
    }
    raw
}

fn compile_token(token: Option<&TokenDef>) -> Cell {
    match token {
        None => Cell::Unset,
        Some(TokenDef::Number(v)) => Cell::from_number(*v),
        Some(TokenDef::Text(text)) => Cell::parse(Some(text.as_str())),
    }
}

/// Apply request options on top of [`SolverConfig::default`].
///
/// Out-of-range options are the caller's fault and map to
/// [`AppError::InvalidInput`].
pub fn compile_config(options: &OptionsDef) -> AppResult<SolverConfig> {
    let defaults = SolverConfig::default();
    let config = SolverConfig {
        max_passes: options.max_passes.unwrap_or(defaults.max_passes),
        consistency: Tolerances {
            abs: defaults.consistency.abs,
            rel: options
                .consistency_tolerance
                .unwrap_or(defaults.consistency.rel),
        },
        standard_gravity: options
            .standard_gravity
            .unwrap_or(defaults.standard_gravity),
        two_instant_omega: options
            .two_instant_omega
            .unwrap_or(defaults.two_instant_omega),
    };
    config
        .validate()
        .map_err(|e| AppError::InvalidInput(format!("options: {e}")))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shm_core::Family;

    fn request(states: Vec<StateDef>) -> SolveRequest {
        SolveRequest {
            system: Family::Spring,
            states,
            options: OptionsDef::default(),
        }
    }

    #[test]
    fn tokens_become_cells() {
        let mut def = StateDef::new();
        def.insert("m".into(), Some(TokenDef::Number(2.0)));
        def.insert("k".into(), Some(TokenDef::Text("=".into())));
        def.insert("x".into(), Some(TokenDef::Text("A / 2".into())));
        def.insert("v".into(), Some(TokenDef::Text("  ".into())));
        def.insert("A".into(), None);

        let raw = &compile_states(&request(vec![def]))[0];
        assert_eq!(raw.get(Quantity::Mass), &Cell::Number(2.0));
        assert_eq!(raw.get(Quantity::Stiffness), &Cell::Carry);
        assert_eq!(
            raw.get(Quantity::Displacement),
            &Cell::Expression("A / 2".into())
        );
        assert_eq!(raw.get(Quantity::Velocity), &Cell::Unset);
        assert_eq!(raw.get(Quantity::Amplitude), &Cell::Unset);
    }

    #[test]
    fn numeric_text_is_a_number() {
        let mut def = StateDef::new();
        def.insert("T".into(), Some(TokenDef::Text(" 2.5 ".into())));
        let raw = &compile_states(&request(vec![def]))[0];
        assert_eq!(raw.get(Quantity::Period), &Cell::Number(2.5));
    }

    #[test]
    fn empty_options_give_defaults() {
        let config = compile_config(&OptionsDef::default()).unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn options_override_defaults() {
        let options = OptionsDef {
            max_passes: Some(5),
            consistency_tolerance: Some(0.05),
            standard_gravity: Some(9.80665),
            two_instant_omega: Some(true),
        };
        let config = compile_config(&options).unwrap();
        assert_eq!(config.max_passes, 5);
        assert_eq!(config.consistency.rel, 0.05);
        assert_eq!(config.standard_gravity, 9.80665);
        assert!(config.two_instant_omega);
    }

    #[test]
    fn bad_options_are_client_errors() {
        let options = OptionsDef {
            standard_gravity: Some(-1.0),
            ..OptionsDef::default()
        };
        let err = compile_config(&options).unwrap_err();
        assert!(err.is_client_error());
    }
}
