//! Numeric `{id}` path segments.
//!
//! A non-numeric or non-positive id can never name an owned resource, so it
//! is reported as the resource's 404 rather than a 400.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::labels::LabelKind;

fn parse_id(req: &HttpRequest, code: ErrorCode, noun: &str) -> Result<i64, AppError> {
    let raw = req.match_info().get("id").unwrap_or_default();
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::not_found(code, format!("{noun} {raw} not found")))
}

/// `{id}` of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeId(pub i64);

impl FromRequest for RecipeId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_id(req, ErrorCode::RecipeNotFound, "Recipe").map(RecipeId))
    }
}

/// `{id}` of a tag or ingredient; the kind comes from the enclosing scope's
/// `web::Data<LabelKind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelId {
    pub kind: LabelKind,
    pub id: i64,
}

impl FromRequest for LabelId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(kind) = req.app_data::<web::Data<LabelKind>>().map(|k| *k.get_ref()) else {
            return ready(Err(AppError::internal("LabelKind not configured for route")));
        };
        let code = match kind {
            LabelKind::Tag => ErrorCode::TagNotFound,
            LabelKind::Ingredient => ErrorCode::IngredientNotFound,
        };
        ready(parse_id(req, code, kind.noun()).map(|id| LabelId { kind, id }))
    }
}
