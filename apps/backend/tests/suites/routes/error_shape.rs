use actix_web::http::{header, StatusCode};
use actix_web::{test, web, HttpResponse};
use recipe_api::error::AppError;
use recipe_api::errors::ErrorCode;
use recipe_api::infra::state::build_state;

use crate::common::assert_problem;
use crate::support::auth::mint_expired_token;
use crate::support::factory::create_test_user;
use crate::support::{build_test_state, create_test_app};

async fn invalid_field() -> Result<HttpResponse, AppError> {
    Err(AppError::invalid_field("title", "This field is required."))
}

async fn bad_request() -> Result<HttpResponse, AppError> {
    Err(AppError::bad_request(
        ErrorCode::BadRequest,
        "Invalid request format",
    ))
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found(
        ErrorCode::RecipeNotFound,
        "Recipe 9 not found",
    ))
}

async fn conflict() -> Result<HttpResponse, AppError> {
    Err(AppError::conflict(ErrorCode::DuplicateTag, "Tag named 'x' already exists"))
}

async fn unauthorized() -> Result<HttpResponse, AppError> {
    Err(AppError::unauthorized())
}

async fn internal() -> Result<HttpResponse, AppError> {
    Err(AppError::internal("connection string leaked here"))
}

async fn db_unavailable() -> Result<HttpResponse, AppError> {
    Err(AppError::db_unavailable())
}

// handler-only: no DB
#[actix_web::test]
async fn test_error_responses_conform_to_problem_details() {
    let state = build_state().build().await.expect("create test state");
    let app = create_test_app(state)
        .with_routes(|cfg| {
            cfg.route("/_test/invalid_field", web::get().to(invalid_field))
                .route("/_test/bad_request", web::get().to(bad_request))
                .route("/_test/not_found", web::get().to(not_found))
                .route("/_test/conflict", web::get().to(conflict))
                .route("/_test/unauthorized", web::get().to(unauthorized))
                .route("/_test/internal", web::get().to(internal))
                .route("/_test/db_unavailable", web::get().to(db_unavailable));
        })
        .build()
        .await;

    let cases = [
        ("/_test/invalid_field", StatusCode::BAD_REQUEST, "VALIDATION_ERROR", None),
        (
            "/_test/bad_request",
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            Some("Invalid request format"),
        ),
        (
            "/_test/not_found",
            StatusCode::NOT_FOUND,
            "RECIPE_NOT_FOUND",
            Some("Recipe 9 not found"),
        ),
        ("/_test/conflict", StatusCode::CONFLICT, "DUPLICATE_TAG", None),
        ("/_test/unauthorized", StatusCode::UNAUTHORIZED, "UNAUTHORIZED", None),
        (
            "/_test/internal",
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
            Some("An internal error occurred"),
        ),
        (
            "/_test/db_unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
            "DB_UNAVAILABLE",
            None,
        ),
    ];

    for (uri, status, code, detail) in cases {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let problem = assert_problem(resp, status, code, detail).await;
        assert!(!problem.detail.contains("leaked"));
    }
}

#[actix_web::test]
async fn test_field_errors_are_keyed_by_field() {
    let state = build_state().build().await.expect("create test state");
    let app = create_test_app(state)
        .with_routes(|cfg| {
            cfg.route("/_test/invalid_field", web::get().to(invalid_field));
        })
        .build()
        .await;

    let req = test::TestRequest::get().uri("/_test/invalid_field").to_request();
    let resp = test::call_service(&app, req).await;
    let problem = assert_problem(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR", None).await;

    let errors = problem.errors.expect("errors map");
    assert_eq!(errors["title"], vec!["This field is required.".to_string()]);
}

#[actix_web::test]
async fn test_trace_id_header_matches_request_id() {
    let state = build_state().build().await.expect("create test state");
    let app = create_test_app(state)
        .with_routes(|cfg| {
            cfg.route("/_test/not_found", web::get().to(not_found));
        })
        .build()
        .await;

    let req = test::TestRequest::get().uri("/_test/not_found").to_request();
    let resp = test::call_service(&app, req).await;

    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-trace-id header");
    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-request-id header");
    assert_eq!(trace_id, request_id);
}

#[tokio::test]
async fn test_expired_and_malformed_tokens() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let user = create_test_user(recipe_api::db::require_db(&state)?, "expired").await?;
    let expired = mint_expired_token(&user, &state.security);

    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/api/recipe/recipes")
        .insert_header((header::AUTHORIZATION, format!("Bearer {expired}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(
        resp,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED_EXPIRED_JWT",
        None,
    )
    .await;

    for value in ["Token abc", "Bearer", "Bearer a b"] {
        let req = test::TestRequest::get()
            .uri("/api/recipe/recipes")
            .insert_header((header::AUTHORIZATION, value))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem(
            resp,
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED_MISSING_BEARER",
            None,
        )
        .await;
    }
    Ok(())
}

#[tokio::test]
async fn test_token_for_deleted_user_is_unauthorized() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = recipe_api::db::require_db(&state)?;
    let user = create_test_user(db, "ghost").await?;
    let auth = crate::support::auth::bearer_header(&user, &state.security);
    recipe_api::adapters::users_sea::delete_user(db, user.id).await?;

    let app = create_test_app(state).build().await;
    let req = test::TestRequest::get()
        .uri("/api/user/me")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED", None).await;
    Ok(())
}
