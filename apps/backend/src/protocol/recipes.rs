//! Recipe payloads, list query and response shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use validator::Validate;

use super::labels::{LabelPayload, LabelResponse};
use super::{non_null, not_blank};
use super::price::{format_price, parse_price, validate_price, PriceInput};
use crate::error::{AppError, FieldErrors};
use crate::repos::recipes::{NewRecipe, RecipeChanges, RecipeFilter};
use crate::services::recipes::{RecipeDraft, RecipePatch, RecipeWithLabels};

/// How absent fields are treated on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// PATCH: absent fields keep their stored value
    Partial,
    /// PUT: required fields must be present, absent text fields reset
    Full,
}

/// Body of recipe create/update requests.
///
/// Every field tells an absent key from an explicit `null`; `null` is never
/// accepted. Unknown keys (including `user`) are ignored, so ownership cannot
/// be reassigned through the payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecipePayload {
    #[validate(
        length(min = 1, max = 255, message = "Ensure this field has between 1 and 255 characters."),
        custom(function = "not_blank")
    )]
    #[serde(default, with = "double_option")]
    pub title: Option<Option<String>>,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    #[serde(default, with = "double_option")]
    pub time_minutes: Option<Option<i32>>,
    #[validate(custom(function = "validate_price"))]
    #[serde(default, with = "double_option")]
    pub price: Option<Option<PriceInput>>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    #[serde(default, with = "double_option")]
    pub link: Option<Option<String>>,
    #[validate(nested)]
    #[serde(default, with = "double_option")]
    pub tags: Option<Option<Vec<LabelPayload>>>,
    #[validate(nested)]
    #[serde(default, with = "double_option")]
    pub ingredients: Option<Option<Vec<LabelPayload>>>,
}

/// Payload fields with nulls rejected and required-ness checked.
struct RecipeFields {
    title: Option<String>,
    time_minutes: Option<i32>,
    price: Option<Decimal>,
    description: Option<String>,
    link: Option<String>,
    tags: Option<Vec<String>>,
    ingredients: Option<Vec<String>>,
}

impl RecipePayload {
    /// Field checks `validator` cannot express: nulls, required-ness per
    /// mode and the `name` of every nested label.
    fn resolve(self, require_scalars: bool) -> Result<RecipeFields, AppError> {
        let mut errors = FieldErrors::new();

        let title = non_null(self.title, "title", require_scalars, &mut errors);
        let time_minutes =
            non_null(self.time_minutes, "time_minutes", require_scalars, &mut errors);
        let price = non_null(self.price, "price", require_scalars, &mut errors)
            .and_then(|p| match parse_price(&p.0) {
                Ok(price) => Some(price),
                Err(e) => {
                    errors
                        .entry("price".to_string())
                        .or_default()
                        .push(e.message().to_string());
                    None
                }
            });
        let description = non_null(self.description, "description", false, &mut errors);
        let link = non_null(self.link, "link", false, &mut errors);
        let tags = Self::names(self.tags, "tags", &mut errors);
        let ingredients = Self::names(self.ingredients, "ingredients", &mut errors);

        if !errors.is_empty() {
            return Err(AppError::invalid_fields(errors));
        }

        Ok(RecipeFields {
            title: title.map(|t| t.trim().to_string()),
            time_minutes,
            price,
            description,
            link,
            tags,
            ingredients,
        })
    }

    fn names(
        list: Option<Option<Vec<LabelPayload>>>,
        field: &str,
        errors: &mut FieldErrors,
    ) -> Option<Vec<String>> {
        let items = non_null(list, field, false, errors)?;
        Some(
            items
                .into_iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    non_null(item.name, &format!("{field}[{index}].name"), true, errors)
                })
                .map(|name| name.trim().to_string())
                .collect(),
        )
    }

    /// Build a create request. Call after `validate()`.
    pub fn into_draft(self) -> Result<RecipeDraft, AppError> {
        let fields = self.resolve(true)?;

        let (Some(title), Some(time_minutes), Some(price)) =
            (fields.title, fields.time_minutes, fields.price)
        else {
            return Err(AppError::internal("required recipe fields missing after check"));
        };

        Ok(RecipeDraft {
            recipe: NewRecipe {
                title,
                time_minutes,
                price,
                description: fields.description.unwrap_or_default(),
                link: fields.link.unwrap_or_default(),
            },
            tags: fields.tags.unwrap_or_default(),
            ingredients: fields.ingredients.unwrap_or_default(),
        })
    }

    /// Build an update request. Call after `validate()`.
    pub fn into_patch(self, mode: UpdateMode) -> Result<RecipePatch, AppError> {
        let full = mode == UpdateMode::Full;
        let fields = self.resolve(full)?;

        let (description, link) = if full {
            (
                Some(fields.description.unwrap_or_default()),
                Some(fields.link.unwrap_or_default()),
            )
        } else {
            (fields.description, fields.link)
        };

        Ok(RecipePatch {
            changes: RecipeChanges {
                title: fields.title,
                time_minutes: fields.time_minutes,
                price: fields.price,
                description,
                link,
            },
            tags: fields.tags,
            ingredients: fields.ingredients,
        })
    }
}

/// `?tags=1,2&ingredients=3`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeListQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

fn parse_ids(field: &str, raw: Option<&str>) -> Result<Option<Vec<i64>>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    raw.split(',')
        .map(|part| part.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
        .map_err(|_| AppError::invalid_field(field, "Expected a comma-separated list of ids."))
}

impl RecipeListQuery {
    pub fn into_filter(self) -> Result<RecipeFilter, AppError> {
        Ok(RecipeFilter {
            tag_ids: parse_ids("tags", self.tags.as_deref())?,
            ingredient_ids: parse_ids("ingredients", self.ingredients.as_deref())?,
        })
    }
}

/// Recipe as shown in list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeListItem {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: String,
    pub link: String,
    pub tags: Vec<LabelResponse>,
    pub ingredients: Vec<LabelResponse>,
}

/// Recipe detail view: the list item plus `description`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: String,
    pub link: String,
    pub tags: Vec<LabelResponse>,
    pub ingredients: Vec<LabelResponse>,
    pub description: String,
}

impl From<RecipeWithLabels> for RecipeListItem {
    fn from(view: RecipeWithLabels) -> Self {
        Self {
            id: view.recipe.id,
            title: view.recipe.title,
            time_minutes: view.recipe.time_minutes,
            price: format_price(view.recipe.price),
            link: view.recipe.link,
            tags: view.tags.into_iter().map(LabelResponse::from).collect(),
            ingredients: view.ingredients.into_iter().map(LabelResponse::from).collect(),
        }
    }
}

impl From<RecipeWithLabels> for RecipeDetail {
    fn from(view: RecipeWithLabels) -> Self {
        Self {
            id: view.recipe.id,
            title: view.recipe.title,
            time_minutes: view.recipe.time_minutes,
            price: format_price(view.recipe.price),
            link: view.recipe.link,
            tags: view.tags.into_iter().map(LabelResponse::from).collect(),
            ingredients: view.ingredients.into_iter().map(LabelResponse::from).collect(),
            description: view.recipe.description,
        }
    }
}
