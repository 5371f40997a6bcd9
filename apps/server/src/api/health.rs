//! Health check endpoint.

use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use serde::Serialize;

use crate::services::FileStorage;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    storage: &'static str,
    timestamp: String,
}

/// Returns 200 while the service runs; reports whether the storage root is reachable.
#[get("/health")]
pub async fn health(storage: web::Data<FileStorage>) -> HttpResponse {
    let storage_state = match tokio::fs::metadata(storage.root()).await {
        Ok(meta) if meta.is_dir() => "available",
        _ => "unavailable",
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        storage: storage_state,
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}
