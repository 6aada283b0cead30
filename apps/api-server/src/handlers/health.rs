//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub posts: usize,
}

/// Health check endpoint - returns server status and the stored post count.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    match state.posts.list().await {
        Ok(posts) => HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            timestamp: chrono::Utc::now().to_rfc3339(),
            posts: posts.len(),
        }),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({ "status": "unavailable" }))
        }
    }
}
