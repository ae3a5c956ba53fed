use actix_web::http::{header, StatusCode};
use actix_web::test;
use recipe_api::auth::jwt::verify_access_token;
use recipe_api::auth::password::verify_password;
use recipe_api::db::require_db;
use recipe_api::entities::users;
use recipe_api::error::AppError;
use recipe_api::repos::users::{find_user_by_email, update_user, UserUpdate};
use sea_orm::EntityTrait;
use serde_json::{json, Value};

use crate::common::{assert_field_errors, assert_problem};
use crate::support::auth::bearer_header;
use crate::support::factory::{create_test_user, TEST_PASSWORD};
use crate::support::{build_test_state, create_test_app};

const CREATE_URL: &str = "/api/user/create";
const TOKEN_URL: &str = "/api/user/token";
const ME_URL: &str = "/api/user/me";

#[tokio::test]
async fn test_create_user_success() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state.clone()).build().await;

    let req = test::TestRequest::post()
        .uri(CREATE_URL)
        .set_json(json!({
            "email": "Test@EXAMPLE.com",
            "password": "testpass123",
            "name": "Test Name"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"email": "Test@example.com", "name": "Test Name"}));

    let db = require_db(&state)?;
    let user = find_user_by_email(db, "Test@example.com")
        .await?
        .expect("user persisted");
    assert!(user.is_active);
    assert_ne!(user.password_hash, "testpass123");
    assert!(verify_password("testpass123", &user.password_hash));
    Ok(())
}

#[tokio::test]
async fn test_create_user_duplicate_email_conflicts() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let existing = create_test_user(require_db(&state)?, "taken").await?;

    let app = create_test_app(state).build().await;
    let req = test::TestRequest::post()
        .uri(CREATE_URL)
        .set_json(json!({
            "email": existing.email,
            "password": "another-pass",
            "name": "Copycat"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::CONFLICT, "UNIQUE_EMAIL", None).await;
    Ok(())
}

#[tokio::test]
async fn test_create_user_validation() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state.clone()).build().await;

    let req = test::TestRequest::post()
        .uri(CREATE_URL)
        .set_json(json!({"email": "not-an-email", "password": "pw", "name": "Short"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_field_errors(resp, &["email", "password"]).await;

    let req = test::TestRequest::post()
        .uri(CREATE_URL)
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_field_errors(resp, &["email", "name", "password"]).await;

    let count = users::Entity::find().all(require_db(&state)?).await?.len();
    assert_eq!(count, 0);
    Ok(())
}

#[tokio::test]
async fn test_token_for_valid_credentials() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let user = create_test_user(require_db(&state)?, "login").await?;
    let security = state.security.clone();

    let app = create_test_app(state).build().await;
    let req = test::TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({"email": user.email, "password": TEST_PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().expect("token string");
    let claims = verify_access_token(token, &security)?;
    assert_eq!(claims.user_id(), Some(user.id));
    assert_eq!(claims.email, user.email);
    Ok(())
}

#[tokio::test]
async fn test_token_rejects_bad_credentials() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let user = create_test_user(db, "login").await?;
    let inactive = create_test_user(db, "inactive").await?;
    update_user(db, UserUpdate::new(inactive.id).with_is_active(false)).await?;

    let app = create_test_app(state).build().await;

    let attempts = [
        json!({"email": user.email, "password": "wrong-password"}),
        json!({"email": "nobody@example.com", "password": TEST_PASSWORD}),
        json!({"email": inactive.email, "password": TEST_PASSWORD}),
    ];
    for attempt in attempts {
        let req = test::TestRequest::post()
            .uri(TOKEN_URL)
            .set_json(attempt)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let problem = assert_problem(
            resp,
            StatusCode::BAD_REQUEST,
            "INVALID_CREDENTIALS",
            Some("Unable to authenticate with provided credentials."),
        )
        .await;
        assert!(problem.errors.is_none());
    }

    let req = test::TestRequest::post()
        .uri(TOKEN_URL)
        .set_json(json!({"email": user.email, "password": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_field_errors(resp, &["password"]).await;
    Ok(())
}

#[tokio::test]
async fn test_me_requires_auth() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get().uri(ME_URL).to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(
        resp,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED_MISSING_BEARER",
        None,
    )
    .await;

    let req = test::TestRequest::get()
        .uri(ME_URL)
        .insert_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(
        resp,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED_INVALID_JWT",
        None,
    )
    .await;
    Ok(())
}

#[tokio::test]
async fn test_me_returns_profile() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let user = create_test_user(require_db(&state)?, "profile").await?;
    let auth = bearer_header(&user, &state.security);

    let app = create_test_app(state).build().await;
    let req = test::TestRequest::get()
        .uri(ME_URL)
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"email": user.email, "name": "profile"}));
    Ok(())
}

#[tokio::test]
async fn test_patch_me_updates_name_and_password() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let user = create_test_user(require_db(&state)?, "profile").await?;
    let auth = bearer_header(&user, &state.security);

    let app = create_test_app(state.clone()).build().await;
    let req = test::TestRequest::patch()
        .uri(ME_URL)
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({"name": "Updated", "password": "newpassword123", "email": "x@y.z"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"email": user.email, "name": "Updated"}));

    let stored = find_user_by_email(require_db(&state)?, &user.email)
        .await?
        .expect("user exists");
    assert_eq!(stored.name, "Updated");
    assert!(verify_password("newpassword123", &stored.password_hash));

    // Full update requires both writable fields
    let req = test::TestRequest::put()
        .uri(ME_URL)
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({"name": "Only name"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_field_errors(resp, &["password"]).await;
    Ok(())
}

#[tokio::test]
async fn test_post_to_me_is_not_allowed() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let user = create_test_user(require_db(&state)?, "profile").await?;
    let auth = bearer_header(&user, &state.security);

    let app = create_test_app(state).build().await;
    let req = test::TestRequest::post()
        .uri(ME_URL)
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}
