//! Infrastructure layer: database connection, error translation, state building.

pub mod db;
pub mod db_errors;
pub mod state;
