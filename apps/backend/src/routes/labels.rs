//! Tag and ingredient endpoints. The same handlers serve both; the scope
//! registering them supplies the `LabelKind`.

use actix_web::{web, HttpRequest, HttpResponse};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::{LabelId, ValidatedJson};
use crate::protocol::labels::{LabelListQuery, LabelPayload, LabelResponse};
use crate::repos::labels::LabelKind;
use crate::services::labels::LabelService;
use crate::state::app_state::AppState;

async fn list_labels(
    current_user: CurrentUser,
    req: HttpRequest,
    kind: web::Data<LabelKind>,
    query: web::Query<LabelListQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id();
    let kind = *kind.get_ref();
    let assigned_only = query.assigned_only()?;

    let labels = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            Ok(LabelService::new()
                .list(txn, kind, user_id, assigned_only)
                .await?)
        })
    })
    .await?;

    let body: Vec<LabelResponse> = labels.into_iter().map(LabelResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PATCH and PUT: `name` is the only writable field, so both require it.
async fn rename_label(
    current_user: CurrentUser,
    req: HttpRequest,
    label_id: LabelId,
    body: ValidatedJson<LabelPayload>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id();
    let LabelId { kind, id } = label_id;
    let name = body.into_inner().into_name()?;

    let label = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            Ok(LabelService::new()
                .rename(txn, kind, user_id, id, &name)
                .await?)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(LabelResponse::from(label)))
}

async fn delete_label(
    current_user: CurrentUser,
    req: HttpRequest,
    label_id: LabelId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id();
    let LabelId { kind, id } = label_id;

    with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { Ok(LabelService::new().delete(txn, kind, user_id, id).await?) })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_labels)).service(
        web::resource("/{id}")
            .route(web::patch().to(rename_label))
            .route(web::put().to(rename_label))
            .route(web::delete().to(delete_label)),
    );
}

/// Mount the label endpoints for `kind` under `path`.
pub fn scope(path: &str, kind: LabelKind) -> actix_web::Scope {
    web::scope(path)
        .app_data(web::Data::new(kind))
        .configure(configure_routes)
}
