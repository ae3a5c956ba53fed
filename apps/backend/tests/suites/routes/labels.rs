use actix_web::http::{header, StatusCode};
use actix_web::test;
use recipe_api::db::require_db;
use recipe_api::entities::{ingredients, recipe_tags, recipes, tags};
use recipe_api::error::AppError;
use recipe_api::repos::labels::LabelKind;
use recipe_api::repos::users::User;
use recipe_api::state::app_state::AppState;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};

use crate::common::{assert_field_errors, assert_problem};
use crate::support::auth::bearer_header;
use crate::support::factory::{
    attach_labels, create_test_label, create_test_recipe, create_test_user,
};
use crate::support::{build_test_state, create_test_app};

const TAGS_URL: &str = "/api/recipe/tags";
const INGREDIENTS_URL: &str = "/api/recipe/ingredients";

async fn setup() -> Result<(AppState, User, String), AppError> {
    let state = build_test_state().await?;
    let user = create_test_user(require_db(&state)?, "cook").await?;
    let auth = bearer_header(&user, &state.security);
    Ok((state, user, auth))
}

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("list body is an array")
        .iter()
        .filter_map(|l| l["name"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn test_label_endpoints_require_auth() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).build().await;

    for uri in [TAGS_URL, INGREDIENTS_URL] {
        let req = test::TestRequest::get().uri(uri).to_request();
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
async fn test_list_tags_sorted_by_name_desc_and_owned() -> Result<(), AppError> {
    let (state, user, auth) = setup().await?;
    let db = require_db(&state)?;
    let other = create_test_user(db, "other").await?;
    create_test_label(db, LabelKind::Tag, user.id, "Dessert").await?;
    create_test_label(db, LabelKind::Tag, user.id, "Vegan").await?;
    create_test_label(db, LabelKind::Tag, other.id, "Fruity").await?;

    let app = create_test_app(state).build().await;
    let req = test::TestRequest::get()
        .uri(TAGS_URL)
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(names(&body), vec!["Vegan", "Dessert"]);
    Ok(())
}

#[tokio::test]
async fn test_list_ingredients_assigned_only() -> Result<(), AppError> {
    let (state, user, auth) = setup().await?;
    let db = require_db(&state)?;
    let apples = create_test_label(db, LabelKind::Ingredient, user.id, "Apples").await?;
    create_test_label(db, LabelKind::Ingredient, user.id, "Turkey").await?;

    // Two recipes share the ingredient; it must still be listed once
    let pie = create_test_recipe(db, user.id, "Apple pie").await?;
    let crumble = create_test_recipe(db, user.id, "Apple crumble").await?;
    attach_labels(db, LabelKind::Ingredient, pie.id, &[apples.id]).await?;
    attach_labels(db, LabelKind::Ingredient, crumble.id, &[apples.id]).await?;

    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri(&format!("{INGREDIENTS_URL}?assigned_only=1"))
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([{"id": apples.id, "name": "Apples"}]));

    let req = test::TestRequest::get()
        .uri(&format!("{INGREDIENTS_URL}?assigned_only=0"))
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(names(&body), vec!["Turkey", "Apples"]);

    let req = test::TestRequest::get()
        .uri(&format!("{INGREDIENTS_URL}?assigned_only=yes"))
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_field_errors(resp, &["assigned_only"]).await;
    Ok(())
}

#[tokio::test]
async fn test_rename_tag() -> Result<(), AppError> {
    let (state, user, auth) = setup().await?;
    let tag = create_test_label(require_db(&state)?, LabelKind::Tag, user.id, "After Dinner").await?;

    let app = create_test_app(state.clone()).build().await;
    let req = test::TestRequest::patch()
        .uri(&format!("{TAGS_URL}/{}", tag.id))
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({"name": "Dessert"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"id": tag.id, "name": "Dessert"}));

    let stored = tags::Entity::find_by_id(tag.id)
        .one(require_db(&state)?)
        .await?
        .expect("tag exists");
    assert_eq!(stored.name, "Dessert");

    // PUT behaves the same and still requires a name
    let req = test::TestRequest::put()
        .uri(&format!("{TAGS_URL}/{}", tag.id))
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_field_errors(resp, &["name"]).await;
    Ok(())
}

#[tokio::test]
async fn test_rename_to_existing_name_conflicts() -> Result<(), AppError> {
    let (state, user, auth) = setup().await?;
    let db = require_db(&state)?;
    let salt = create_test_label(db, LabelKind::Ingredient, user.id, "Salt").await?;
    create_test_label(db, LabelKind::Ingredient, user.id, "Pepper").await?;

    let app = create_test_app(state.clone()).build().await;
    let req = test::TestRequest::patch()
        .uri(&format!("{INGREDIENTS_URL}/{}", salt.id))
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({"name": "Pepper"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::CONFLICT, "DUPLICATE_INGREDIENT", None).await;

    // Renaming to its own name is accepted unchanged
    let req = test::TestRequest::patch()
        .uri(&format!("{INGREDIENTS_URL}/{}", salt.id))
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({"name": "Salt"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = ingredients::Entity::find_by_id(salt.id)
        .one(require_db(&state)?)
        .await?
        .expect("ingredient exists");
    assert_eq!(stored.name, "Salt");
    Ok(())
}

#[tokio::test]
async fn test_rename_blank_name_is_rejected() -> Result<(), AppError> {
    let (state, user, auth) = setup().await?;
    let tag = create_test_label(require_db(&state)?, LabelKind::Tag, user.id, "Quick").await?;

    let app = create_test_app(state).build().await;
    let req = test::TestRequest::patch()
        .uri(&format!("{TAGS_URL}/{}", tag.id))
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({"name": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_field_errors(resp, &["name"]).await;
    Ok(())
}

#[tokio::test]
async fn test_other_users_label_is_not_found() -> Result<(), AppError> {
    let (state, _user, auth) = setup().await?;
    let db = require_db(&state)?;
    let other = create_test_user(db, "other").await?;
    let theirs = create_test_label(db, LabelKind::Tag, other.id, "Private").await?;
    let theirs_ing = create_test_label(db, LabelKind::Ingredient, other.id, "Secret").await?;

    let app = create_test_app(state).build().await;

    let req = test::TestRequest::patch()
        .uri(&format!("{TAGS_URL}/{}", theirs.id))
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({"name": "Mine now"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::NOT_FOUND, "TAG_NOT_FOUND", None).await;

    let req = test::TestRequest::delete()
        .uri(&format!("{INGREDIENTS_URL}/{}", theirs_ing.id))
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::NOT_FOUND, "INGREDIENT_NOT_FOUND", None).await;
    Ok(())
}

#[tokio::test]
async fn test_delete_tag_detaches_from_recipes() -> Result<(), AppError> {
    let (state, user, auth) = setup().await?;
    let db = require_db(&state)?;
    let recipe = create_test_recipe(db, user.id, "Tagged").await?;
    let tag = create_test_label(db, LabelKind::Tag, user.id, "Gone").await?;
    attach_labels(db, LabelKind::Tag, recipe.id, &[tag.id]).await?;

    let app = create_test_app(state.clone()).build().await;
    let req = test::TestRequest::delete()
        .uri(&format!("{TAGS_URL}/{}", tag.id))
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let db = require_db(&state)?;
    assert!(tags::Entity::find_by_id(tag.id).one(db).await?.is_none());
    assert!(recipes::Entity::find_by_id(recipe.id).one(db).await?.is_some());
    let links = recipe_tags::Entity::find()
        .filter(recipe_tags::Column::TagId.eq(tag.id))
        .count(db)
        .await?;
    assert_eq!(links, 0);
    Ok(())
}

#[tokio::test]
async fn test_tag_id_does_not_resolve_as_ingredient() -> Result<(), AppError> {
    let (state, user, auth) = setup().await?;
    let tag = create_test_label(require_db(&state)?, LabelKind::Tag, user.id, "Only a tag").await?;

    let app = create_test_app(state).build().await;
    let req = test::TestRequest::delete()
        .uri(&format!("{INGREDIENTS_URL}/{}", tag.id))
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::NOT_FOUND, "INGREDIENT_NOT_FOUND", None).await;
    Ok(())
}
