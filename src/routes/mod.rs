// ABOUTME: HTTP route modules and shared extractor helpers
// ABOUTME: Path parsing and request id tagging of errors live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! HTTP routes
//!
//! - [`health`]: landing text and liveness JSON
//! - [`recipes`]: the `/recipe/...` CRUD surface

/// Landing and health endpoints
pub mod health;
/// Recipe CRUD endpoints
pub mod recipes;

pub use health::HealthRoutes;
pub use recipes::RecipeRoutes;

use crate::errors::{AppError, AppResult};
use crate::middleware::RequestId;
use axum::Extension;
use std::fmt::Display;
use std::str::FromStr;

/// Closure that stamps errors with the current request id, when there is one
pub(crate) fn tag_errors(request_id: Option<Extension<RequestId>>) -> impl Fn(AppError) -> AppError {
    move |error| match &request_id {
        Some(Extension(id)) => error.with_request_id(id.as_str()),
        None => error,
    }
}

/// Parse a path segment, reporting a 400 naming the parameter
pub(crate) fn parse_path_param<T>(name: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::invalid_input(format!("Invalid {name} '{raw}': {e}")))
}
