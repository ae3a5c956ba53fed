//! Recipe repository functions for domain layer (generic over ConnectionTrait).

use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;

use crate::adapters::recipes_sea as recipes_adapter;
use crate::errors::domain::{DomainError, ValidationKind};

pub use recipes_adapter::RecipeFilter;

/// Prices are stored as whole cents.
const CENTS_SCALE: u32 = 2;

/// Whole cents for the `price_cents` column.
pub fn price_to_cents(price: Decimal) -> Result<i64, DomainError> {
    let mut price = price;
    price.rescale(CENTS_SCALE);
    i64::try_from(price.mantissa()).map_err(|_| {
        DomainError::validation(
            ValidationKind::Check,
            format!("Price {price} does not fit the price column"),
        )
    })
}

pub fn cents_to_price(cents: i64) -> Decimal {
    Decimal::new(cents, CENTS_SCALE)
}

/// Recipe domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub description: String,
    pub link: String,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

/// Column values for a new recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub description: String,
    pub link: String,
}

/// Column changes for an existing recipe. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub link: Option<String>,
}

pub async fn create_recipe<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    new: NewRecipe,
) -> Result<Recipe, DomainError> {
    let dto = recipes_adapter::RecipeCreate::new(
        user_id,
        new.title,
        new.time_minutes,
        price_to_cents(new.price)?,
    )
    .with_description(new.description)
    .with_link(new.link);
    let recipe = recipes_adapter::create_recipe(conn, dto).await?;
    Ok(Recipe::from(recipe))
}

pub async fn find_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    recipe_id: i64,
) -> Result<Option<Recipe>, DomainError> {
    let recipe = recipes_adapter::find_for_user(conn, user_id, recipe_id).await?;
    Ok(recipe.map(Recipe::from))
}

pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    filter: &RecipeFilter,
) -> Result<Vec<Recipe>, DomainError> {
    let recipes = recipes_adapter::list_for_user(conn, user_id, filter).await?;
    Ok(recipes.into_iter().map(Recipe::from).collect())
}

/// Apply column changes. The caller has already checked ownership.
pub async fn update_recipe<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    current: Recipe,
    changes: RecipeChanges,
) -> Result<Recipe, DomainError> {
    let mut dto = recipes_adapter::RecipeUpdate::new(current.id);
    dto.title = changes.title;
    dto.time_minutes = changes.time_minutes;
    dto.price_cents = changes.price.map(price_to_cents).transpose()?;
    dto.description = changes.description;
    dto.link = changes.link;
    if dto.is_empty() {
        return Ok(current);
    }
    let recipe = recipes_adapter::update_recipe(conn, dto).await?;
    Ok(Recipe::from(recipe))
}

pub async fn delete_recipe<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    recipe_id: i64,
) -> Result<(), DomainError> {
    recipes_adapter::delete_recipe(conn, recipe_id).await?;
    Ok(())
}

impl From<crate::entities::recipes::Model> for Recipe {
    fn from(model: crate::entities::recipes::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            time_minutes: model.time_minutes,
            price: cents_to_price(model.price_cents),
            description: model.description,
            link: model.link,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
