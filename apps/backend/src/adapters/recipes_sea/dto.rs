//! DTOs for recipes_sea adapter.

/// DTO for creating a new recipe.
#[derive(Debug, Clone)]
pub struct RecipeCreate {
    pub user_id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price_cents: i64,
    pub description: String,
    pub link: String,
}

impl RecipeCreate {
    pub fn new(user_id: i64, title: impl Into<String>, time_minutes: i32, price_cents: i64) -> Self {
        Self {
            user_id,
            title: title.into(),
            time_minutes,
            price_cents,
            description: String::new(),
            link: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }
}

/// DTO for updating recipe columns. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct RecipeUpdate {
    pub id: i64,
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price_cents: Option<i64>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl RecipeUpdate {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.time_minutes.is_none()
            && self.price_cents.is_none()
            && self.description.is_none()
            && self.link.is_none()
    }
}

/// Association filters for recipe listing.
///
/// Ids within one filter match if the recipe carries any of them; the two
/// filters are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tag_ids: Option<Vec<i64>>,
    pub ingredient_ids: Option<Vec<i64>>,
}
