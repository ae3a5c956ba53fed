//! Problem Details test helpers for backend testing
//!
//! Assertions for RFC 7807 error responses that do not depend on backend types.

use std::collections::BTreeMap;

use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Local mirror of the backend's error body.
#[derive(Debug, Deserialize, Serialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Assert that response parts conform to the stable error contract and
/// return the parsed body for further checks.
///
/// Validates:
/// - HTTP status matches expected
/// - x-trace-id header exists and matches body trace_id
/// - `code` and `status` fields match, and `detail` contains the given text
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body_bytes: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    assert_eq!(status, expected_status);

    let problem: ProblemDetailsLike = serde_json::from_slice(body_bytes)
        .expect("Response body should be valid ProblemDetails JSON");

    let trace_id_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");

    assert_eq!(
        problem.trace_id, trace_id_header,
        "trace_id in body should match x-trace-id header"
    );
    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    assert_eq!(
        problem.type_,
        format!("https://recipes.app/errors/{expected_code}")
    );

    if let Some(expected_detail) = expected_detail_contains {
        assert!(
            problem.detail.contains(expected_detail),
            "Expected detail to contain '{}', but got '{}'",
            expected_detail,
            problem.detail
        );
    }

    problem
}

/// Assert that a ServiceResponse conforms to the stable error contract.
pub async fn assert_problem_details_from_service_response(
    resp: actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::body::to_bytes(resp.into_body())
        .await
        .expect("failed to read response body");

    assert_problem_details_from_parts(
        status,
        &headers,
        &body,
        expected_code,
        expected_status,
        expected_detail_contains,
    )
}
