//! Request bodies handled end to end through the service boundary.

use shm_app::{Status, handle_json, run_request, to_response};
use shm_core::{Family, Quantity as Q};
use shm_project::load_request;
use std::f64::consts::TAU;
use std::path::Path;

#[test]
fn spring_request() {
    let body = r#"{
        "system": "spring",
        "states": [
            {"m": 2, "x": "0.1", "g": 9.81},
            {"m": "0.5", "x": "="}
        ]
    }"#;
    let reply = handle_json(body);
    assert_eq!(reply.status, Status::Ok);
    let response = reply.response;
    assert_eq!(response.system, Some(Family::Spring));
    assert_eq!(response.error, None);
    assert_eq!(response.results.len(), 2);

    let first = &response.results[0];
    assert!((first.values.get(Q::NetForce).unwrap() - 19.62).abs() < 1e-12);
    assert_eq!(first.values.get(Q::Omega), None);
    assert!(first.explanation.contains("sqrt(k/m)"));

    let second = &response.results[1];
    assert_eq!(second.values.get(Q::Displacement), Some(0.1));
    assert_eq!(second.values.get(Q::Stiffness), None);
}

#[test]
fn pendulum_request() {
    let body = r#"{"system": "Pendulum", "states": [{"L": 2, "T": 2.5}, {"L": 8}]}"#;
    let reply = handle_json(body);
    assert_eq!(reply.status, Status::Ok);

    let results = &reply.response.results;
    assert_eq!(results[0].values.get(Q::Gravity), Some(9.81));
    assert!((results[0].values.get(Q::Omega).unwrap() - TAU / 2.5).abs() < 1e-12);
    assert!((results[1].values.get(Q::Period).unwrap() - 5.0).abs() < 1e-12);
    assert!(results[1].explanation.contains("sqrt(g/L)"));
}

#[test]
fn response_lists_every_field() {
    let reply = handle_json(r#"{"states": [{"k": 50, "m": 0.5}]}"#);
    assert_eq!(reply.status, Status::Ok);
    let json = serde_json::to_value(&reply.response).unwrap();
    let result = &json["results"][0];
    for q in Q::ALL {
        assert!(result.get(q.name()).is_some(), "missing {q}");
    }
    assert_eq!(result["omega"], 10.0);
    assert!(result["A"].is_null());
    assert_eq!(json["system"], "spring");
}

#[test]
fn inconsistent_inputs_warn() {
    let reply = handle_json(r#"{"states": [{"k": 100, "m": 1, "omega": 5}]}"#);
    assert_eq!(reply.status, Status::Ok);
    let warnings = &reply.response.results[0].warnings;
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("omega"));
}

#[test]
fn hostile_expression_only_affects_its_field() {
    let body = r#"{"states": [{"k": 50, "m": 0.5, "A": "__import__('os')"}]}"#;
    let reply = handle_json(body);
    assert_eq!(reply.status, Status::Ok);
    let values = &reply.response.results[0].values;
    assert_eq!(values.get(Q::Amplitude), None);
    assert_eq!(values.get(Q::Omega), Some(10.0));
}

#[test]
fn aliases_are_accepted() {
    let reply = handle_json(r#"{"states": [{"ΣF": 3, "x": 0.5}]}"#);
    assert_eq!(reply.status, Status::Ok);
    let values = &reply.response.results[0].values;
    assert_eq!(values.get(Q::NetForce), Some(3.0));
}

#[test]
fn malformed_requests_are_client_errors() {
    for body in [
        "",
        "not json",
        "[]",
        r#"{"system": "spring"}"#,
        r#"{"states": {}}"#,
        r#"{"system": "rope", "states": []}"#,
        r#"{"states": [1]}"#,
        r#"{"states": [{"m": [1]}]}"#,
    ] {
        let reply = handle_json(body);
        assert_eq!(reply.status, Status::ClientError, "body: {body}");
        assert!(reply.response.results.is_empty());
        assert!(reply.response.error.is_some());
    }
}

#[test]
fn out_of_range_options_are_client_errors() {
    let reply = handle_json(r#"{"states": [], "options": {"max_passes": 0}}"#);
    assert_eq!(reply.status, Status::ClientError);
    assert!(reply.response.error.unwrap().contains("max_passes"));
}

#[test]
fn empty_state_list_is_ok() {
    let reply = handle_json(r#"{"states": []}"#);
    assert_eq!(reply.status, Status::Ok);
    assert!(reply.response.results.is_empty());
}

#[test]
fn demo_requests_solve() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        let request = load_request(&path).unwrap();
        let output = run_request(&request).unwrap();
        let response = to_response(&output);
        assert_eq!(response.results.len(), request.states.len(), "{path:?}");
        for result in &response.results {
            assert!(result.warnings.is_empty(), "{path:?}: {:?}", result.warnings);
        }
    }
}
