//! SeaORM adapter for recipe repository - generic over ConnectionTrait.

use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{recipe_ingredients, recipe_tags, recipes};

pub mod dto;

pub use dto::{RecipeCreate, RecipeFilter, RecipeUpdate};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn create_recipe<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RecipeCreate,
) -> Result<recipes::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let recipe_active = recipes::ActiveModel {
        id: NotSet,
        user_id: Set(dto.user_id),
        title: Set(dto.title),
        time_minutes: Set(dto.time_minutes),
        price_cents: Set(dto.price_cents),
        description: Set(dto.description),
        link: Set(dto.link),
        created_at: Set(now),
        updated_at: Set(now),
    };

    recipe_active.insert(conn).await
}

/// Find a recipe only if it belongs to `user_id`.
pub async fn find_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    recipe_id: i64,
) -> Result<Option<recipes::Model>, sea_orm::DbErr> {
    recipes::Entity::find_by_id(recipe_id)
        .filter(recipes::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Recipes owned by `user_id`, newest id first.
pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    filter: &RecipeFilter,
) -> Result<Vec<recipes::Model>, sea_orm::DbErr> {
    let mut query = recipes::Entity::find().filter(recipes::Column::UserId.eq(user_id));

    // Subqueries rather than joins keep the result distinct
    if let Some(tag_ids) = &filter.tag_ids {
        query = query.filter(
            recipes::Column::Id.in_subquery(
                Query::select()
                    .column(recipe_tags::Column::RecipeId)
                    .from(recipe_tags::Entity)
                    .and_where(recipe_tags::Column::TagId.is_in(tag_ids.iter().copied()))
                    .to_owned(),
            ),
        );
    }

    if let Some(ingredient_ids) = &filter.ingredient_ids {
        query = query.filter(
            recipes::Column::Id.in_subquery(
                Query::select()
                    .column(recipe_ingredients::Column::RecipeId)
                    .from(recipe_ingredients::Entity)
                    .and_where(
                        recipe_ingredients::Column::IngredientId
                            .is_in(ingredient_ids.iter().copied()),
                    )
                    .to_owned(),
            ),
        );
    }

    query.order_by_desc(recipes::Column::Id).all(conn).await
}

pub async fn update_recipe<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RecipeUpdate,
) -> Result<recipes::Model, sea_orm::DbErr> {
    let recipe_active = recipes::ActiveModel {
        id: Set(dto.id),
        user_id: NotSet,
        title: dto.title.map(Set).unwrap_or(NotSet),
        time_minutes: dto.time_minutes.map(Set).unwrap_or(NotSet),
        price_cents: dto.price_cents.map(Set).unwrap_or(NotSet),
        description: dto.description.map(Set).unwrap_or(NotSet),
        link: dto.link.map(Set).unwrap_or(NotSet),
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    recipe_active.update(conn).await
}

/// Delete a recipe and its association rows. Tags and ingredients survive.
pub async fn delete_recipe<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    recipe_id: i64,
) -> Result<(), sea_orm::DbErr> {
    recipe_tags::Entity::delete_many()
        .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;
    recipe_ingredients::Entity::delete_many()
        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;
    recipes::Entity::delete_by_id(recipe_id).exec(conn).await?;
    Ok(())
}
