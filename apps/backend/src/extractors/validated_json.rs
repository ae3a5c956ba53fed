use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use tracing::{debug, warn};
use validator::Validate;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::protocol::field_errors;
use crate::trace_ctx;

/// JSON body extractor that parses and then runs the payload's field rules.
///
/// Malformed JSON or wrong value types become 400 `BAD_REQUEST` with a
/// sanitized detail; rule failures become 400 `VALIDATION_ERROR` with the
/// per-field `errors` map. An empty body is read as `{}`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        // Extract content type before creating the async future to avoid borrow-across-await
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("")
            .to_string();

        Box::pin(async move {
            let trace_id = trace_ctx::trace_id();

            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(
                        trace_id = %trace_id,
                        error = %e,
                        "Failed to read request body chunk"
                    );
                    AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
                })?;
                body.extend_from_slice(&chunk);
            }

            let parsed = parse_body::<T>(&body).map_err(|e| {
                debug!(
                    trace_id = %trace_id,
                    error = %Redacted(&e.to_string()),
                    content_type = %content_type,
                    body_size = body.len(),
                    "JSON parsing failed"
                );
                AppError::bad_request(ErrorCode::BadRequest, classify_json_error(&e))
            })?;

            parsed.validate().map_err(|errors| {
                let errors = field_errors(&errors);
                debug!(
                    trace_id = %trace_id,
                    fields = ?errors.keys().collect::<Vec<_>>(),
                    "Payload validation failed"
                );
                AppError::invalid_fields(errors)
            })?;

            Ok(ValidatedJson(parsed))
        })
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, JsonError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_slice(b"{}");
    }
    serde_json::from_slice(body)
}

/// Classify serde_json::Error and return a sanitized error message
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            let line = error.line();
            format!("Invalid JSON at line {line}")
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => {
            "Invalid JSON: wrong types for one or more fields".to_string()
        }
        serde_json::error::Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}
