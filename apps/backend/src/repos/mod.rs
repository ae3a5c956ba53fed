//! Repository functions for the domain layer.

pub mod labels;
pub mod recipes;
pub mod users;
