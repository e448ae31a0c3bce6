//! Verify requests and results against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector describes credentials, submission parameters, the expected
//! outbound request, a simulated response and the expected result or error.
//! Cases with an expected precondition error must not reach the transport.

use std::cell::RefCell;

use akismet_core::{
    transport_fn, AkismetClient, ClientConfig, ClientError, HttpMethod, HttpRequest, HttpResponse,
    HttpVersion,
};
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

/// Run one case: build the client from the vector, execute `operation`
/// against a canned transport, then check the recorded request and outcome.
fn run_case(case: &Value, operation: &str) {
    let name = case["name"].as_str().unwrap();
    let config = ClientConfig {
        key: case["credentials"]["key"].as_str().map(str::to_string),
        blog: case["credentials"]["blog"].as_str().map(str::to_string),
        params: case
            .get("params")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
    };

    let sent: RefCell<Vec<HttpRequest>> = RefCell::new(Vec::new());
    let simulated = case.get("simulated_response").map(|sim| {
        HttpResponse::new(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        )
    });
    let transport = transport_fn(|request: &HttpRequest| {
        sent.borrow_mut().push(request.clone());
        Ok(simulated.clone().expect("transport called without a simulated response"))
    });
    let client = AkismetClient::from_config(transport, config);

    let result = match operation {
        "verify_key" => client.verify_key(),
        "check" => client.check(),
        "spam" => client.spam(),
        "ham" => client.ham(),
        other => panic!("{name}: unknown operation {other}"),
    };

    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        match expected_error.as_str().unwrap() {
            "KeyNotSet" => assert!(matches!(err, ClientError::KeyNotSet), "{name}: expected KeyNotSet"),
            "BlogNotSet" => assert!(matches!(err, ClientError::BlogNotSet), "{name}: expected BlogNotSet"),
            "KeyInvalid" => assert!(matches!(err, ClientError::KeyInvalid), "{name}: expected KeyInvalid"),
            "KeyMalformed" => assert!(matches!(err, ClientError::KeyMalformed), "{name}: expected KeyMalformed"),
            other => panic!("{name}: unknown expected_error: {other}"),
        }
    } else {
        let expected = case["expected_result"].as_bool().unwrap();
        assert_eq!(result.unwrap(), expected, "{name}: result");
    }

    let sent = sent.borrow();
    let Some(expected_req) = case.get("expected_request") else {
        assert!(sent.is_empty(), "{name}: no request should be sent");
        return;
    };
    assert_eq!(sent.len(), 1, "{name}: exactly one request");
    let req = &sent[0];
    assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, expected_req["url"].as_str().unwrap(), "{name}: url");
    assert_eq!(req.version, HttpVersion::Http11, "{name}: version");

    let expected_headers: Vec<(String, String)> = expected_req["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");
    assert_eq!(req.body.as_deref(), expected_req["body"].as_str(), "{name}: body");
}

// ---------------------------------------------------------------------------
// Verify key
// ---------------------------------------------------------------------------

#[test]
fn verify_key_test_vectors() {
    let raw = include_str!("../../test-vectors/verify_key.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        run_case(case, "verify_key");
    }
}

// ---------------------------------------------------------------------------
// Comment check
// ---------------------------------------------------------------------------

#[test]
fn comment_check_test_vectors() {
    let raw = include_str!("../../test-vectors/comment_check.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        run_case(case, "check");
    }
}

// ---------------------------------------------------------------------------
// Submit spam / ham
// ---------------------------------------------------------------------------

#[test]
fn submit_test_vectors() {
    let raw = include_str!("../../test-vectors/submit.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let operation = case["operation"].as_str().unwrap();
        run_case(case, operation);
    }
}
