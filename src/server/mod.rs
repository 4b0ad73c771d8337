// ABOUTME: HTTP server assembly: merges route modules and applies the middleware stack
// ABOUTME: Runs axum with graceful shutdown on Ctrl-C or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

/// Dependency-injected handler resources
pub mod resources;

use crate::errors::{AppError, AppResult};
use crate::middleware::{request_id_middleware, request_span, setup_cors};
use crate::routes::{HealthRoutes, RecipeRoutes};
use axum::{middleware, Router};
use resources::ServerResources;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

/// The recipe HTTP server
pub struct RecipeServer {
    resources: Arc<ServerResources>,
}

impl RecipeServer {
    /// Create a server over prepared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Build the full router with middleware
    ///
    /// Layers from the outside in: request id, CORS, request span, timeout.
    /// The request id is outermost so that CORS preflights and timeouts carry it.
    pub fn router(&self) -> Router {
        let config = &self.resources.config;

        Router::new()
            .merge(HealthRoutes::routes(Arc::clone(&self.resources)))
            .merge(RecipeRoutes::routes(Arc::clone(&self.resources)))
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_span)
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(setup_cors(&config.cors))
            .layer(middleware::from_fn(request_id_middleware))
    }

    /// Bind and serve until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server fails
    pub async fn run(self) -> AppResult<()> {
        let address = self.resources.config.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|e| AppError::config(format!("Cannot bind {address}: {e}")))?;
        info!(address = %address, "Recipe API listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        self.resources.database.close().await;
        info!("Recipe API stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
