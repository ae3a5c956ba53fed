//! Recipe CRUD with nested tag and ingredient resolution.

use std::collections::{HashMap, HashSet};

use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::labels::{self, Label, LabelKind};
use crate::repos::recipes::{self, NewRecipe, Recipe, RecipeChanges, RecipeFilter};

/// A recipe together with its associated tags and ingredients (id order).
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeWithLabels {
    pub recipe: Recipe,
    pub tags: Vec<Label>,
    pub ingredients: Vec<Label>,
}

/// Input for creating a recipe; label names are resolved against the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub recipe: NewRecipe,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
}

/// Input for updating a recipe.
///
/// `Some(list)` replaces the association set (empty clears it); `None`
/// leaves associations untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipePatch {
    pub changes: RecipeChanges,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

fn recipe_not_found(recipe_id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Recipe, format!("Recipe {recipe_id} not found"))
}

/// Drop repeated names, keeping first occurrence order.
fn unique_names(names: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(String::as_str)
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Recipe domain service.
#[derive(Debug, Default)]
pub struct RecipeService;

impl RecipeService {
    pub fn new() -> Self {
        Self
    }

    /// The owner's recipes, newest first, optionally filtered by label ids.
    pub async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        filter: &RecipeFilter,
    ) -> Result<Vec<RecipeWithLabels>, DomainError> {
        let found = recipes::list_for_user(conn, user_id, filter).await?;
        self.with_labels(conn, found).await
    }

    pub async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<RecipeWithLabels, DomainError> {
        let recipe = recipes::find_for_user(conn, user_id, recipe_id)
            .await?
            .ok_or_else(|| recipe_not_found(recipe_id))?;
        self.one_with_labels(conn, recipe).await
    }

    pub async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        draft: RecipeDraft,
    ) -> Result<RecipeWithLabels, DomainError> {
        let recipe = recipes::create_recipe(conn, user_id, draft.recipe).await?;

        self.attach(conn, LabelKind::Tag, user_id, recipe.id, &draft.tags)
            .await?;
        self.attach(
            conn,
            LabelKind::Ingredient,
            user_id,
            recipe.id,
            &draft.ingredients,
        )
        .await?;

        info!(recipe_id = recipe.id, user_id, "recipe created");
        self.one_with_labels(conn, recipe).await
    }

    /// Apply a partial or full update. Both modes reach here; a full update
    /// simply supplies every column.
    pub async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        recipe_id: i64,
        patch: RecipePatch,
    ) -> Result<RecipeWithLabels, DomainError> {
        let current = recipes::find_for_user(conn, user_id, recipe_id)
            .await?
            .ok_or_else(|| recipe_not_found(recipe_id))?;

        let recipe = recipes::update_recipe(conn, current, patch.changes).await?;

        if let Some(tags) = &patch.tags {
            self.attach(conn, LabelKind::Tag, user_id, recipe.id, tags)
                .await?;
        }
        if let Some(ingredients) = &patch.ingredients {
            self.attach(conn, LabelKind::Ingredient, user_id, recipe.id, ingredients)
                .await?;
        }

        info!(recipe_id = recipe.id, user_id, "recipe updated");
        self.one_with_labels(conn, recipe).await
    }

    pub async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<(), DomainError> {
        let recipe = recipes::find_for_user(conn, user_id, recipe_id)
            .await?
            .ok_or_else(|| recipe_not_found(recipe_id))?;

        recipes::delete_recipe(conn, recipe.id).await?;
        info!(recipe_id, user_id, "recipe deleted");
        Ok(())
    }

    /// Resolve each name under the owner and make it the recipe's full set.
    async fn attach<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: LabelKind,
        user_id: i64,
        recipe_id: i64,
        names: &[String],
    ) -> Result<(), DomainError> {
        let mut ids = Vec::with_capacity(names.len());
        for name in unique_names(names) {
            let (label, inserted) = labels::ensure_by_name(conn, kind, user_id, name).await?;
            debug!(
                kind = kind.noun(),
                label_id = label.id,
                inserted,
                "label resolved"
            );
            ids.push(label.id);
        }

        labels::replace_for_recipe(conn, kind, recipe_id, &ids).await
    }

    async fn one_with_labels<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        recipe: Recipe,
    ) -> Result<RecipeWithLabels, DomainError> {
        let recipe_id = recipe.id;
        self.with_labels(conn, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| recipe_not_found(recipe_id))
    }

    /// Load labels for a page of recipes with one query per kind.
    async fn with_labels<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        found: Vec<Recipe>,
    ) -> Result<Vec<RecipeWithLabels>, DomainError> {
        let ids: Vec<i64> = found.iter().map(|r| r.id).collect();

        let mut tags = group_by_recipe(labels::for_recipes(conn, LabelKind::Tag, &ids).await?);
        let mut ingredients =
            group_by_recipe(labels::for_recipes(conn, LabelKind::Ingredient, &ids).await?);

        Ok(found
            .into_iter()
            .map(|recipe| RecipeWithLabels {
                tags: tags.remove(&recipe.id).unwrap_or_default(),
                ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                recipe,
            })
            .collect())
    }
}

fn group_by_recipe(pairs: Vec<(i64, Label)>) -> HashMap<i64, Vec<Label>> {
    let mut grouped: HashMap<i64, Vec<Label>> = HashMap::new();
    for (recipe_id, label) in pairs {
        grouped.entry(recipe_id).or_default().push(label);
    }
    grouped
}
