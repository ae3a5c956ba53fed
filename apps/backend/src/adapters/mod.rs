//! SeaORM adapters. Functions are generic over `ConnectionTrait` and return
//! `sea_orm::DbErr`; the repos layer maps to `DomainError`.

pub mod ingredients_sea;
pub mod recipes_sea;
pub mod tags_sea;
pub mod users_sea;
