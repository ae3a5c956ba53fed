// with_txn behavior: policy on Ok, rollback on Err, SharedTxn reuse.

use actix_web::{test, HttpMessage};
use recipe_api::db::require_db;
use recipe_api::db::txn::{with_txn, SharedTxn};
use recipe_api::db::txn_policy::{self, TxnPolicy};
use recipe_api::error::AppError;
use recipe_api::errors::ErrorCode;
use recipe_api::repos::recipes;
use recipe_api::repos::users;

use crate::support::build_test_state;
use crate::support::factory::{create_test_recipe, create_test_user};

#[actix_web::test]
async fn test_ok_follows_policy() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let user = create_test_user(require_db(&state)?, "owner").await?;
    let user_id = user.id;

    let recipe_id = with_txn(None, &state, move |txn| {
        Box::pin(async move {
            let recipe = create_test_recipe(txn, user_id, "Committed?").await?;
            Ok(recipe.id)
        })
    })
    .await?;

    let found = recipes::find_for_user(require_db(&state)?, user.id, recipe_id).await?;
    match txn_policy::current() {
        TxnPolicy::CommitOnOk => assert!(found.is_some()),
        TxnPolicy::RollbackOnOk => assert!(found.is_none()),
    }
    Ok(())
}

#[actix_web::test]
async fn test_err_rolls_back() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let user = create_test_user(require_db(&state)?, "owner").await?;
    let user_id = user.id;

    let result: Result<(), AppError> = with_txn(None, &state, move |txn| {
        Box::pin(async move {
            create_test_recipe(txn, user_id, "Never saved").await?;
            Err(AppError::not_found(ErrorCode::TagNotFound, "Tag 1 not found"))
        })
    })
    .await;

    let err = result.expect_err("closure error is returned unchanged");
    assert_eq!(err.code(), ErrorCode::TagNotFound);

    let listed = recipes::list_for_user(
        require_db(&state)?,
        user.id,
        &recipes::RecipeFilter::default(),
    )
    .await?;
    assert!(listed.is_empty());
    Ok(())
}

#[actix_web::test]
async fn test_shared_txn_is_reused_and_owned_by_caller() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let shared = SharedTxn::open(db).await?;

    let req = test::TestRequest::default().to_http_request();
    req.extensions_mut().insert(shared.clone());

    let user_id = with_txn(Some(&req), &state, |txn| {
        Box::pin(async move {
            let user = create_test_user(txn, "shared").await?;
            Ok(user.id)
        })
    })
    .await?;

    // A second call sees the uncommitted row through the same transaction
    let seen = with_txn(Some(&req), &state, move |txn| {
        Box::pin(async move { Ok(users::find_user_by_id(txn, user_id).await?) })
    })
    .await?;
    assert!(seen.is_some());

    drop(req);
    shared.rollback().await?;

    let after = users::find_user_by_id(require_db(&state)?, user_id).await?;
    assert!(after.is_none(), "caller's rollback discards shared writes");
    Ok(())
}
