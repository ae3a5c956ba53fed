use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use validator::Validate;

use super::{non_null, not_blank};
use crate::error::{AppError, FieldErrors};
use crate::repos::labels::Label;

/// Nested `{name}` object inside a recipe payload, and the body of a
/// tag/ingredient rename.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LabelPayload {
    #[validate(
        length(min = 1, max = 255, message = "Ensure this field has between 1 and 255 characters."),
        custom(function = "not_blank")
    )]
    #[serde(default, with = "double_option")]
    pub name: Option<Option<String>>,
}

impl LabelPayload {
    pub fn into_name(self) -> Result<String, AppError> {
        let mut errors = FieldErrors::new();
        match non_null(self.name, "name", true, &mut errors) {
            Some(name) => Ok(name.trim().to_string()),
            None => Err(AppError::invalid_fields(errors)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelResponse {
    pub id: i64,
    pub name: String,
}

impl From<Label> for LabelResponse {
    fn from(label: Label) -> Self {
        Self {
            id: label.id,
            name: label.name,
        }
    }
}

/// `?assigned_only=0|1`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelListQuery {
    pub assigned_only: Option<String>,
}

impl LabelListQuery {
    pub fn assigned_only(&self) -> Result<bool, AppError> {
        match self.assigned_only.as_deref().map(str::trim) {
            None | Some("") | Some("0") => Ok(false),
            Some("1") => Ok(true),
            Some(_) => Err(AppError::invalid_field(
                "assigned_only",
                "Must be 0 or 1.",
            )),
        }
    }
}
