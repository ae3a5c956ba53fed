//! SeaORM adapter for tags and their recipe associations.

use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{recipe_tags, tags};

pub async fn find_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    tag_id: i64,
) -> Result<Option<tags::Model>, sea_orm::DbErr> {
    tags::Entity::find_by_id(tag_id)
        .filter(tags::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

pub async fn find_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    name: &str,
) -> Result<Option<tags::Model>, sea_orm::DbErr> {
    tags::Entity::find()
        .filter(tags::Column::UserId.eq(user_id))
        .filter(tags::Column::Name.eq(name))
        .one(conn)
        .await
}

/// Get-or-create by `(user_id, name)`. Returns `(tag, inserted)`.
pub async fn ensure_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    name: &str,
) -> Result<(tags::Model, bool), sea_orm::DbErr> {
    if let Some(existing) = find_by_name(conn, user_id, name).await? {
        return Ok((existing, false));
    }
    insert_or_reread(conn, user_id, name).await
}

/// Insert `(user_id, name)` unless the unique index already holds it, then
/// read the row back.
///
/// A concurrent request may insert the same name after a lookup miss; the
/// insert then affects no rows and the winner's row is returned with
/// `inserted == false`.
pub async fn insert_or_reread<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    name: &str,
) -> Result<(tags::Model, bool), sea_orm::DbErr> {
    let tag_active = tags::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        name: Set(name.to_string()),
    };

    let rows = tags::Entity::insert(tag_active)
        .on_conflict(
            OnConflict::columns([tags::Column::UserId, tags::Column::Name])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let tag = find_by_name(conn, user_id, name)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("tags.name not found".to_string()))?;

    Ok((tag, rows == 1))
}

/// All tags owned by the user, name descending.
pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    assigned_only: bool,
) -> Result<Vec<tags::Model>, sea_orm::DbErr> {
    let mut query = tags::Entity::find().filter(tags::Column::UserId.eq(user_id));

    if assigned_only {
        query = query.filter(
            tags::Column::Id.in_subquery(
                Query::select()
                    .column(recipe_tags::Column::TagId)
                    .from(recipe_tags::Entity)
                    .to_owned(),
            ),
        );
    }

    query
        .order_by_desc(tags::Column::Name)
        .order_by_desc(tags::Column::Id)
        .all(conn)
        .await
}

pub async fn rename<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tag_id: i64,
    name: &str,
) -> Result<tags::Model, sea_orm::DbErr> {
    let tag_active = tags::ActiveModel {
        id: Set(tag_id),
        user_id: NotSet,
        name: Set(name.to_string()),
    };
    tag_active.update(conn).await
}

/// Delete a tag and its recipe associations. Recipes are untouched.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tag_id: i64,
) -> Result<(), sea_orm::DbErr> {
    recipe_tags::Entity::delete_many()
        .filter(recipe_tags::Column::TagId.eq(tag_id))
        .exec(conn)
        .await?;
    tags::Entity::delete_by_id(tag_id).exec(conn).await?;
    Ok(())
}

/// Tags attached to each of the given recipes as `(recipe_id, tag)` pairs,
/// ordered by tag id.
pub async fn for_recipes<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    recipe_ids: &[i64],
) -> Result<Vec<(i64, tags::Model)>, sea_orm::DbErr> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = recipe_tags::Entity::find()
        .filter(recipe_tags::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .find_also_related(tags::Entity)
        .order_by_asc(tags::Column::Id)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(link, tag)| tag.map(|t| (link.recipe_id, t)))
        .collect())
}

/// Replace the full tag set of a recipe.
pub async fn replace_for_recipe<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    recipe_id: i64,
    tag_ids: &[i64],
) -> Result<(), sea_orm::DbErr> {
    recipe_tags::Entity::delete_many()
        .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    let links = tag_ids.iter().map(|&tag_id| recipe_tags::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(tag_id),
    });
    recipe_tags::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
