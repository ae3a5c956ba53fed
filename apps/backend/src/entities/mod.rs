pub mod ingredients;
pub mod recipe_ingredients;
pub mod recipe_tags;
pub mod recipes;
pub mod tags;
pub mod users;

pub use ingredients::Entity as Ingredients;
pub use ingredients::Model as Ingredient;
pub use recipe_ingredients::Entity as RecipeIngredients;
pub use recipe_tags::Entity as RecipeTags;
pub use recipes::Entity as Recipes;
pub use recipes::Model as Recipe;
pub use tags::Entity as Tags;
pub use tags::Model as Tag;
pub use users::Entity as Users;
pub use users::Model as User;
