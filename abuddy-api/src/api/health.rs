//! Health, banner and fallback endpoints (no authentication)

use axum::{extract::OriginalUri, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::ApiError;
use crate::AppState;

pub const MODULE_NAME: &str = "abuddy-api";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub module: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: abuddy_common::time::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        module: MODULE_NAME.to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: String,
    pub version: String,
}

/// GET /
pub async fn root() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Appliance Buddy API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Router fallback
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
}
