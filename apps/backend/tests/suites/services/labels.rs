use recipe_api::db::require_db;
use recipe_api::error::AppError;
use recipe_api::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use recipe_api::repos::labels::{self, LabelKind};
use recipe_api::services::labels::LabelService;

use crate::support::build_test_state;
use crate::support::factory::{attach_labels, create_test_label, create_test_recipe, create_test_user};

#[tokio::test]
async fn test_ensure_by_name_is_idempotent() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let user = create_test_user(db, "cook").await?;

    let (first, created) = labels::ensure_by_name(db, LabelKind::Tag, user.id, "Brunch").await?;
    assert!(created);
    let (second, created) = labels::ensure_by_name(db, LabelKind::Tag, user.id, "Brunch").await?;
    assert!(!created);
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_tags_and_ingredients_are_separate_namespaces() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let user = create_test_user(db, "cook").await?;

    create_test_label(db, LabelKind::Tag, user.id, "Chocolate").await?;
    create_test_label(db, LabelKind::Ingredient, user.id, "Chocolate").await?;

    let tags = labels::list_for_user(db, LabelKind::Tag, user.id, false).await?;
    let ingredients = labels::list_for_user(db, LabelKind::Ingredient, user.id, false).await?;
    assert_eq!(tags.len(), 1);
    assert_eq!(ingredients.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_rename_conflict_uses_kind_specific_code() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let user = create_test_user(db, "cook").await?;
    let first = create_test_label(db, LabelKind::Tag, user.id, "One").await?;
    create_test_label(db, LabelKind::Tag, user.id, "Two").await?;

    let err = LabelService::new()
        .rename(db, LabelKind::Tag, user.id, first.id, "Two")
        .await
        .expect_err("name already taken");
    assert!(matches!(err, DomainError::Conflict(ConflictKind::DuplicateTag, _)));

    let app_err = AppError::from(err);
    assert_eq!(app_err.code().as_str(), "DUPLICATE_TAG");
    Ok(())
}

#[tokio::test]
async fn test_rename_and_delete_require_ownership() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let owner = create_test_user(db, "owner").await?;
    let stranger = create_test_user(db, "stranger").await?;
    let label = create_test_label(db, LabelKind::Ingredient, owner.id, "Saffron").await?;

    let service = LabelService::new();
    let err = service
        .rename(db, LabelKind::Ingredient, stranger.id, label.id, "Mine")
        .await
        .expect_err("not the owner");
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Ingredient, _)));

    let err = service
        .delete(db, LabelKind::Ingredient, stranger.id, label.id)
        .await
        .expect_err("not the owner");
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Ingredient, _)));

    let still = labels::find_for_user(db, LabelKind::Ingredient, owner.id, label.id).await?;
    assert_eq!(still.map(|l| l.name), Some("Saffron".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_assigned_only_lists_each_label_once() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let user = create_test_user(db, "cook").await?;
    let used = create_test_label(db, LabelKind::Tag, user.id, "Used").await?;
    create_test_label(db, LabelKind::Tag, user.id, "Unused").await?;

    for title in ["One", "Two", "Three"] {
        let recipe = create_test_recipe(db, user.id, title).await?;
        attach_labels(db, LabelKind::Tag, recipe.id, &[used.id]).await?;
    }

    let assigned = LabelService::new()
        .list(db, LabelKind::Tag, user.id, true)
        .await?;
    assert_eq!(assigned, vec![used]);
    Ok(())
}

#[tokio::test]
async fn test_delete_detaches_label() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let user = create_test_user(db, "cook").await?;
    let recipe = create_test_recipe(db, user.id, "Bread").await?;
    let flour = create_test_label(db, LabelKind::Ingredient, user.id, "Flour").await?;
    attach_labels(db, LabelKind::Ingredient, recipe.id, &[flour.id]).await?;

    LabelService::new()
        .delete(db, LabelKind::Ingredient, user.id, flour.id)
        .await?;

    let attached = labels::for_recipes(db, LabelKind::Ingredient, &[recipe.id]).await?;
    assert!(attached.is_empty());
    Ok(())
}
