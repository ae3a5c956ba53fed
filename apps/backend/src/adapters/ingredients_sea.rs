//! SeaORM adapter for ingredients and their recipe associations.

use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{ingredients, recipe_ingredients};

pub async fn find_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    ingredient_id: i64,
) -> Result<Option<ingredients::Model>, sea_orm::DbErr> {
    ingredients::Entity::find_by_id(ingredient_id)
        .filter(ingredients::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

pub async fn find_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    name: &str,
) -> Result<Option<ingredients::Model>, sea_orm::DbErr> {
    ingredients::Entity::find()
        .filter(ingredients::Column::UserId.eq(user_id))
        .filter(ingredients::Column::Name.eq(name))
        .one(conn)
        .await
}

/// Get-or-create by `(user_id, name)`. Returns `(ingredient, inserted)`.
pub async fn ensure_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    name: &str,
) -> Result<(ingredients::Model, bool), sea_orm::DbErr> {
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
) -> Result<(ingredients::Model, bool), sea_orm::DbErr> {
    let ingredient_active = ingredients::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        name: Set(name.to_string()),
    };

    let rows = ingredients::Entity::insert(ingredient_active)
        .on_conflict(
            OnConflict::columns([ingredients::Column::UserId, ingredients::Column::Name])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let ingredient = find_by_name(conn, user_id, name)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("ingredients.name not found".to_string()))?;

    Ok((ingredient, rows == 1))
}

/// All ingredients owned by the user, name descending.
pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    assigned_only: bool,
) -> Result<Vec<ingredients::Model>, sea_orm::DbErr> {
    let mut query = ingredients::Entity::find().filter(ingredients::Column::UserId.eq(user_id));

    if assigned_only {
        query = query.filter(
            ingredients::Column::Id.in_subquery(
                Query::select()
                    .column(recipe_ingredients::Column::IngredientId)
                    .from(recipe_ingredients::Entity)
                    .to_owned(),
            ),
        );
    }

    query
        .order_by_desc(ingredients::Column::Name)
        .order_by_desc(ingredients::Column::Id)
        .all(conn)
        .await
}

pub async fn rename<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ingredient_id: i64,
    name: &str,
) -> Result<ingredients::Model, sea_orm::DbErr> {
    let ingredient_active = ingredients::ActiveModel {
        id: Set(ingredient_id),
        user_id: NotSet,
        name: Set(name.to_string()),
    };
    ingredient_active.update(conn).await
}

/// Delete an ingredient and its recipe associations. Recipes are untouched.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ingredient_id: i64,
) -> Result<(), sea_orm::DbErr> {
    recipe_ingredients::Entity::delete_many()
        .filter(recipe_ingredients::Column::IngredientId.eq(ingredient_id))
        .exec(conn)
        .await?;
    ingredients::Entity::delete_by_id(ingredient_id).exec(conn).await?;
    Ok(())
}

/// Ingredients attached to each of the given recipes as `(recipe_id, ingredient)` pairs,
/// ordered by ingredient id.
pub async fn for_recipes<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    recipe_ids: &[i64],
) -> Result<Vec<(i64, ingredients::Model)>, sea_orm::DbErr> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = recipe_ingredients::Entity::find()
        .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .find_also_related(ingredients::Entity)
        .order_by_asc(ingredients::Column::Id)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(link, ingredient)| ingredient.map(|i| (link.recipe_id, i)))
        .collect())
}

/// Replace the full ingredient set of a recipe.
pub async fn replace_for_recipe<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    recipe_id: i64,
    ingredient_ids: &[i64],
) -> Result<(), sea_orm::DbErr> {
    recipe_ingredients::Entity::delete_many()
        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;

    if ingredient_ids.is_empty() {
        return Ok(());
    }

    let links = ingredient_ids.iter().map(|&ingredient_id| recipe_ingredients::ActiveModel {
        recipe_id: Set(recipe_id),
        ingredient_id: Set(ingredient_id),
    });
    recipe_ingredients::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
