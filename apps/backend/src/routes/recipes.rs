use actix_web::{web, HttpRequest, HttpResponse};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::{RecipeId, ValidatedJson};
use crate::protocol::recipes::{
    RecipeDetail, RecipeListItem, RecipeListQuery, RecipePayload, UpdateMode,
};
use crate::services::recipes::RecipeService;
use crate::state::app_state::AppState;

async fn list_recipes(
    current_user: CurrentUser,
    req: HttpRequest,
    query: web::Query<RecipeListQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id();
    let filter = query.into_inner().into_filter()?;

    let recipes = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { Ok(RecipeService::new().list(txn, user_id, &filter).await?) })
    })
    .await?;

    let body: Vec<RecipeListItem> = recipes.into_iter().map(RecipeListItem::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_recipe(
    current_user: CurrentUser,
    req: HttpRequest,
    body: ValidatedJson<RecipePayload>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id();
    let draft = body.into_inner().into_draft()?;

    let recipe = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { Ok(RecipeService::new().create(txn, user_id, draft).await?) })
    })
    .await?;

    Ok(HttpResponse::Created().json(RecipeDetail::from(recipe)))
}

async fn get_recipe(
    current_user: CurrentUser,
    req: HttpRequest,
    recipe_id: RecipeId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id();
    let RecipeId(recipe_id) = recipe_id;

    let recipe = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { Ok(RecipeService::new().get(txn, user_id, recipe_id).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(RecipeDetail::from(recipe)))
}

async fn update_recipe(
    current_user: CurrentUser,
    req: HttpRequest,
    recipe_id: RecipeId,
    body: ValidatedJson<RecipePayload>,
    app_state: web::Data<AppState>,
    mode: UpdateMode,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id();
    let RecipeId(recipe_id) = recipe_id;
    let patch = body.into_inner().into_patch(mode)?;

    let recipe = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            Ok(RecipeService::new()
                .update(txn, user_id, recipe_id, patch)
                .await?)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(RecipeDetail::from(recipe)))
}

async fn patch_recipe(
    current_user: CurrentUser,
    req: HttpRequest,
    recipe_id: RecipeId,
    body: ValidatedJson<RecipePayload>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    update_recipe(
        current_user,
        req,
        recipe_id,
        body,
        app_state,
        UpdateMode::Partial,
    )
    .await
}

async fn put_recipe(
    current_user: CurrentUser,
    req: HttpRequest,
    recipe_id: RecipeId,
    body: ValidatedJson<RecipePayload>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    update_recipe(current_user, req, recipe_id, body, app_state, UpdateMode::Full).await
}

async fn delete_recipe(
    current_user: CurrentUser,
    req: HttpRequest,
    recipe_id: RecipeId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id();
    let RecipeId(recipe_id) = recipe_id;

    with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { Ok(RecipeService::new().delete(txn, user_id, recipe_id).await?) })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/recipes")
            .route(web::get().to(list_recipes))
            .route(web::post().to(create_recipe)),
    )
    .service(
        web::resource("/recipes/{id}")
            .route(web::get().to(get_recipe))
            .route(web::patch().to(patch_recipe))
            .route(web::put().to(put_recipe))
            .route(web::delete().to(delete_recipe)),
    );
}
