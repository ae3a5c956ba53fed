#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use backend_test_support::problem_details::{
    assert_problem_details_from_parts, ProblemDetailsLike,
};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

// Every test state owns a private in-memory database, so committing is safe.
// Flip with `RECIPES_TXN_POLICY=rollback`.
#[ctor::ctor]
fn init_txn_policy() {
    let policy = match std::env::var("RECIPES_TXN_POLICY")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "rollback" => recipe_api::db::txn_policy::TxnPolicy::RollbackOnOk,
        _ => recipe_api::db::txn_policy::TxnPolicy::CommitOnOk,
    };

    recipe_api::db::txn_policy::set_txn_policy(policy);
}

/// Assert a full Problem Details response, including the per-status header
/// rules, and return the parsed body.
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    let status = resp.status();
    let headers = resp.headers().clone();

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    match expected_status.as_u16() {
        401 => {
            assert_eq!(
                headers
                    .get("WWW-Authenticate")
                    .and_then(|v| v.to_str().ok()),
                Some("Bearer"),
                "401 responses must carry WWW-Authenticate: Bearer"
            );
        }
        503 => {
            assert!(headers.get("Retry-After").is_some());
        }
        _ => {
            assert!(headers.get("WWW-Authenticate").is_none());
            assert!(headers.get("Retry-After").is_none());
        }
    }

    let body = actix_web::test::read_body(resp).await;
    assert_problem_details_from_parts(
        status,
        &headers,
        &body,
        expected_code,
        expected_status,
        expected_detail_contains,
    )
}

/// Assert a 400 VALIDATION_ERROR listing exactly `fields` in its `errors` map.
pub async fn assert_field_errors(resp: ServiceResponse<BoxBody>, fields: &[&str]) {
    let problem = assert_problem(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR", None).await;
    let errors = problem.errors.expect("validation problems carry an errors map");
    let mut keys: Vec<&str> = errors.keys().map(String::as_str).collect();
    keys.sort_unstable();
    let mut expected = fields.to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected, "unexpected error fields: {errors:?}");
}
