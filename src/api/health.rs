//! Health check endpoints

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

/// Service landing document
#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
    /// Endpoint prefixes by resource
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

pub async fn welcome() -> Json<WelcomeResponse> {
    let endpoints = BTreeMap::from([
        ("auth", "/api/v1/auth"),
        ("students", "/api/v1/students"),
        ("inventory", "/api/v1/inventory"),
        ("loans", "/api/v1/loans"),
        ("users", "/api/v1/users"),
        ("documentation", "/swagger-ui"),
    ]);

    Json(WelcomeResponse {
        message: "School administration API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint (checks database connectivity)
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 500, description = "Database unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn readiness_check(State(state): State<crate::AppState>) -> AppResult<Json<HealthResponse>> {
    state.services.repository.ping().await?;

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
