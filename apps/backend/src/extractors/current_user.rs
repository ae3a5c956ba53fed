use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use tracing::debug;

use crate::auth::jwt::verify_access_token;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::logging::security;
use crate::repos::users::{self, User};
use crate::state::app_state::AppState;

/// The authenticated, active user behind the request's bearer token.
///
/// Routes behind [`RequireUser`](crate::middleware::RequireUser) find it
/// already resolved in request extensions, so a bad token is rejected before
/// any path, body or ownership check. Elsewhere it authenticates on its own.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::unauthorized_missing_bearer)?
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
            Ok(token.to_string())
        }
        _ => Err(AppError::unauthorized_missing_bearer()),
    }
}

/// Resolve the bearer token to an active user, reloading the user so a
/// deleted or deactivated account stops working immediately.
pub async fn authenticate(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    let token = bearer_token(req)?;

    let app_state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let claims = verify_access_token(&token, &app_state.security)?;
    let user_id = claims.user_id().ok_or_else(|| {
        security::token_rejected("bad_subject");
        AppError::unauthorized_invalid_jwt()
    })?;

    let user = if let Some(shared_txn) = SharedTxn::from_req(req) {
        // Use shared transaction if present
        users::find_user_by_id(shared_txn.transaction(), user_id).await?
    } else {
        // Fall back to pooled connection
        let db = require_db(app_state)?;
        users::find_user_by_id(db, user_id).await?
    };

    match user {
        Some(user) if user.is_active => Ok(CurrentUser(user)),
        Some(_) => {
            debug!(user_id, "token for inactive user");
            Err(AppError::unauthorized())
        }
        None => {
            debug!(user_id, "token for unknown user");
            Err(AppError::unauthorized())
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<CurrentUser>().cloned() {
            return Box::pin(std::future::ready(Ok(user)));
        }

        let req = req.clone();
        Box::pin(async move { authenticate(&req).await })
    }
}
