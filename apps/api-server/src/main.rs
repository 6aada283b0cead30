//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::middleware::Condition;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use blog_core::ports::{PasswordService, RateLimiter, TokenService};
use blog_infra::{Argon2PasswordService, InMemoryRateLimiter, JwtTokenService};

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::rate_limit::RateLimitMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Blog API Server on {}:{}", config.host, config.port);

    let state = AppState::new(&config).await.map_err(|e| {
        tracing::error!("Failed to open data files: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
    let rate_limiter: Arc<dyn RateLimiter> = Arc::new(
        InMemoryRateLimiter::new(config.rate_limit.clone())
            .map_err(|e| std::io::Error::other(e.to_string()))?,
    );
    let rate_limit_enabled = config.rate_limit_enabled;

    HttpServer::new(move || {
        App::new()
            .wrap(Condition::new(
                rate_limit_enabled,
                RateLimitMiddleware::new(rate_limiter.clone()),
            ))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
