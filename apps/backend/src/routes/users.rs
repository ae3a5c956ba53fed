use std::time::SystemTime;

use actix_web::{web, HttpRequest, HttpResponse};

use crate::auth::jwt::mint_access_token;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::ValidatedJson;
use crate::middleware::RequireUser;
use crate::protocol::users::{
    CreateUserRequest, TokenRequest, TokenResponse, UpdateMeRequest, UserResponse,
};
use crate::services::users::UserService;
use crate::state::app_state::AppState;

async fn create_user(
    req: HttpRequest,
    body: ValidatedJson<CreateUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let account = body.into_inner().into_account()?;

    let user = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            UserService::new()
                .register(txn, &account.email, &account.password, &account.name)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

async fn create_token(
    req: HttpRequest,
    body: ValidatedJson<TokenRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (email, password) = body.into_inner().into_credentials()?;

    let user = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            UserService::new()
                .authenticate(txn, &email, &password)
                .await
        })
    })
    .await?;

    let token = mint_access_token(user.id, &user.email, SystemTime::now(), &app_state.security)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

async fn get_me(current_user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(UserResponse::from(current_user.into_inner())))
}

async fn update_me(
    current_user: CurrentUser,
    req: HttpRequest,
    body: ValidatedJson<UpdateMeRequest>,
    app_state: web::Data<AppState>,
    require_all: bool,
) -> Result<HttpResponse, AppError> {
    let changes = body.into_inner().into_changes(require_all)?;
    let user = current_user.into_inner();

    let updated = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { UserService::new().update_profile(txn, &user, changes).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

async fn patch_me(
    current_user: CurrentUser,
    req: HttpRequest,
    body: ValidatedJson<UpdateMeRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    update_me(current_user, req, body, app_state, false).await
}

async fn put_me(
    current_user: CurrentUser,
    req: HttpRequest,
    body: ValidatedJson<UpdateMeRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    update_me(current_user, req, body, app_state, true).await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/create", web::post().to(create_user))
        .route("/token", web::post().to(create_token))
        .service(
            web::resource("/me")
                .wrap(RequireUser)
                .route(web::get().to(get_me))
                .route(web::patch().to(patch_me))
                .route(web::put().to(put_me)),
        );
}
