//! Wire types: request payloads with their field rules, and response shapes.

use std::borrow::Cow;

use validator::{ValidationErrors, ValidationErrorsKind};

use crate::error::FieldErrors;

pub mod labels;
pub mod price;
pub mod recipes;
pub mod users;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NULL: &str = "This field may not be null.";

/// Flatten validator output into `field -> messages`.
///
/// Nested structs are keyed `parent.child`, list items `parent[i].child`.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect(errors, "", &mut out);
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let key = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(key).or_default();
                for error in list {
                    let message = error
                        .message
                        .clone()
                        .unwrap_or_else(|| Cow::Owned(format!("Invalid value ({}).", error.code)));
                    messages.push(message.into_owned());
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &key, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{key}[{index}]"), out);
                }
            }
        }
    }
}

/// Record a missing required field.
pub fn require<T>(value: &Option<T>, field: &str, errors: &mut FieldErrors) {
    if value.is_none() {
        errors
            .entry(field.to_string())
            .or_default()
            .push(REQUIRED.to_string());
    }
}

/// Unwrap a field that tells absent (`None`) from `null` (`Some(None)`).
///
/// `null` is always an error; absence is one only when `required`.
pub fn non_null<T>(
    value: Option<Option<T>>,
    field: &str,
    required: bool,
    errors: &mut FieldErrors,
) -> Option<T> {
    match value {
        None => {
            if required {
                errors
                    .entry(field.to_string())
                    .or_default()
                    .push(REQUIRED.to_string());
            }
            None
        }
        Some(None) => {
            errors
                .entry(field.to_string())
                .or_default()
                .push(NULL.to_string());
            None
        }
        Some(value) => value,
    }
}

/// `validator` hook rejecting whitespace-only text.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank").with_message(Cow::Borrowed(BLANK)));
    }
    Ok(())
}
