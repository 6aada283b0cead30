//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::{HttpRequest, error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                // Accounts
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .route("/me", web::get().to(auth::me))
                // Posts; the literal search path must precede `{id}`
                .route("/posts", web::get().to(posts::list_posts))
                .route("/posts", web::post().to(posts::create_post))
                .route("/posts/search", web::get().to(posts::search_posts))
                .route("/posts/{id}", web::get().to(posts::get_post))
                .route("/posts/{id}", web::put().to(posts::update_post))
                .route("/posts/{id}", web::delete().to(posts::delete_post))
                .route("/posts/{id}/comments", web::post().to(posts::add_comment)),
        );
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}
