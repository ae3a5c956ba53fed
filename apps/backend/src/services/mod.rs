pub mod labels;
pub mod recipes;
pub mod users;
