use actix_web::web;

use crate::middleware::RequireUser;
use crate::repos::labels::LabelKind;

pub mod health;
pub mod labels;
pub mod recipes;
pub mod users;

/// Register every route. Shared by `main.rs` and the test app builder so
/// both serve the same paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Accounts: /api/user/**
    cfg.service(web::scope("/api/user").configure(users::configure_routes));

    // Recipes, tags, ingredients: /api/recipe/**
    cfg.service(
        web::scope("/api/recipe")
            .wrap(RequireUser)
            .configure(recipes::configure_routes)
            .service(labels::scope("/tags", LabelKind::Tag))
            .service(labels::scope("/ingredients", LabelKind::Ingredient)),
    );
}
