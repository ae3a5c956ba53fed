//! Tag and ingredient repository functions.
//!
//! Tags and ingredients share shape, ownership and uniqueness rules, so the
//! domain layer treats both as a [`Label`] and dispatches on [`LabelKind`].

use sea_orm::ConnectionTrait;

use crate::adapters::{ingredients_sea, tags_sea};
use crate::entities::{ingredients, tags};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Tag,
    Ingredient,
}

impl LabelKind {
    /// Capitalized singular noun for messages.
    pub fn noun(self) -> &'static str {
        match self {
            LabelKind::Tag => "Tag",
            LabelKind::Ingredient => "Ingredient",
        }
    }

    pub fn not_found(self, id: i64) -> DomainError {
        let kind = match self {
            LabelKind::Tag => NotFoundKind::Tag,
            LabelKind::Ingredient => NotFoundKind::Ingredient,
        };
        DomainError::not_found(kind, format!("{} {id} not found", self.noun()))
    }

    pub fn duplicate(self, name: &str) -> DomainError {
        let kind = match self {
            LabelKind::Tag => ConflictKind::DuplicateTag,
            LabelKind::Ingredient => ConflictKind::DuplicateIngredient,
        };
        DomainError::conflict(
            kind,
            format!("{} named '{name}' already exists", self.noun()),
        )
    }
}

/// Tag or ingredient domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
}

pub async fn find_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    kind: LabelKind,
    user_id: i64,
    id: i64,
) -> Result<Option<Label>, DomainError> {
    let label = match kind {
        LabelKind::Tag => tags_sea::find_for_user(conn, user_id, id)
            .await?
            .map(Label::from),
        LabelKind::Ingredient => ingredients_sea::find_for_user(conn, user_id, id)
            .await?
            .map(Label::from),
    };
    Ok(label)
}

pub async fn find_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    kind: LabelKind,
    user_id: i64,
    name: &str,
) -> Result<Option<Label>, DomainError> {
    let label = match kind {
        LabelKind::Tag => tags_sea::find_by_name(conn, user_id, name)
            .await?
            .map(Label::from),
        LabelKind::Ingredient => ingredients_sea::find_by_name(conn, user_id, name)
            .await?
            .map(Label::from),
    };
    Ok(label)
}

/// Get-or-create by exact name for the owner. Returns `(label, inserted)`.
pub async fn ensure_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    kind: LabelKind,
    user_id: i64,
    name: &str,
) -> Result<(Label, bool), DomainError> {
    let (label, inserted) = match kind {
        LabelKind::Tag => {
            let (model, inserted) = tags_sea::ensure_by_name(conn, user_id, name).await?;
            (Label::from(model), inserted)
        }
        LabelKind::Ingredient => {
            let (model, inserted) = ingredients_sea::ensure_by_name(conn, user_id, name).await?;
            (Label::from(model), inserted)
        }
    };
    Ok((label, inserted))
}

pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    kind: LabelKind,
    user_id: i64,
    assigned_only: bool,
) -> Result<Vec<Label>, DomainError> {
    let labels = match kind {
        LabelKind::Tag => tags_sea::list_for_user(conn, user_id, assigned_only)
            .await?
            .into_iter()
            .map(Label::from)
            .collect(),
        LabelKind::Ingredient => ingredients_sea::list_for_user(conn, user_id, assigned_only)
            .await?
            .into_iter()
            .map(Label::from)
            .collect(),
    };
    Ok(labels)
}

pub async fn rename<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    kind: LabelKind,
    id: i64,
    name: &str,
) -> Result<Label, DomainError> {
    let label = match kind {
        LabelKind::Tag => Label::from(tags_sea::rename(conn, id, name).await?),
        LabelKind::Ingredient => Label::from(ingredients_sea::rename(conn, id, name).await?),
    };
    Ok(label)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    kind: LabelKind,
    id: i64,
) -> Result<(), DomainError> {
    match kind {
        LabelKind::Tag => tags_sea::delete(conn, id).await?,
        LabelKind::Ingredient => ingredients_sea::delete(conn, id).await?,
    }
    Ok(())
}

/// Labels attached to the given recipes as `(recipe_id, label)` pairs,
/// ordered by label id.
pub async fn for_recipes<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    kind: LabelKind,
    recipe_ids: &[i64],
) -> Result<Vec<(i64, Label)>, DomainError> {
    let pairs = match kind {
        LabelKind::Tag => tags_sea::for_recipes(conn, recipe_ids)
            .await?
            .into_iter()
            .map(|(recipe_id, m)| (recipe_id, Label::from(m)))
            .collect(),
        LabelKind::Ingredient => ingredients_sea::for_recipes(conn, recipe_ids)
            .await?
            .into_iter()
            .map(|(recipe_id, m)| (recipe_id, Label::from(m)))
            .collect(),
    };
    Ok(pairs)
}

pub async fn replace_for_recipe<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    kind: LabelKind,
    recipe_id: i64,
    label_ids: &[i64],
) -> Result<(), DomainError> {
    match kind {
        LabelKind::Tag => tags_sea::replace_for_recipe(conn, recipe_id, label_ids).await?,
        LabelKind::Ingredient => {
            ingredients_sea::replace_for_recipe(conn, recipe_id, label_ids).await?
        }
    }
    Ok(())
}

impl From<tags::Model> for Label {
    fn from(model: tags::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
        }
    }
}

impl From<ingredients::Model> for Label {
    fn from(model: ingredients::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
        }
    }
}
