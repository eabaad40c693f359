//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod users;

use actix_web::web;
use uuid::Uuid;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/me", web::get().to(auth::me)),
            )
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_public))
                    .route("", web::post().to(posts::create))
                    .route("/user/{id}", web::get().to(posts::list_by_user))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/like", web::put().to(posts::toggle_like))
                    .route("/{id}/comments", web::post().to(posts::comment)),
            )
            // User routes
            .service(web::scope("/users").route("/{id}", web::get().to(users::get_user))),
    );
}

/// Parse a path id, rejecting malformed ids as 400 before any store lookup.
/// A well-formed id that matches nothing is a 404, decided later.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid id: {raw}")))
}
