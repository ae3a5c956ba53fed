pub mod current_user;
pub mod path_id;
pub mod validated_json;

pub use current_user::CurrentUser;
pub use path_id::{LabelId, RecipeId};
pub use validated_json::ValidatedJson;
