// ABOUTME: Landing and liveness endpoints
// ABOUTME: GET / returns plain text, GET /health checks the store and returns JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

use crate::constants::service;
use crate::server::resources::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Body of `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: String,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Store description
    pub database: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Landing and health routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the landing and health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_landing))
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET / - liveness text
    async fn handle_landing() -> &'static str {
        service::LANDING_TEXT
    }

    /// Handle GET /health - liveness JSON including a store round trip
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let (status, label) = match resources.database.ping().await {
            Ok(()) => (StatusCode::OK, "healthy"),
            Err(e) => {
                warn!(error = %e, "Health check failed");
                (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
            }
        };

        let body = HealthResponse {
            status: label.to_owned(),
            service: service::SERVICE_NAME.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            database: resources.database.backend_info(),
            timestamp: Utc::now().to_rfc3339(),
        };
        (status, Json(body)).into_response()
    }
}
