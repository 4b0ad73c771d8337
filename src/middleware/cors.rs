// ABOUTME: CORS middleware configuration for HTTP API endpoints
// ABOUTME: Origin comes from FRONTEND_URL; methods and headers are fixed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

use crate::config::environment::CorsConfig;
use http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// Configure CORS settings for the recipe API
///
/// `OPTIONS` requests are answered by the layer itself with `200` and never
/// reach a handler.
///
/// - empty or `*`: any origin; every response carries `*`
/// - one origin: every response carries that origin
/// - several origins: a request whose `Origin` matches one of them gets it
///   echoed back; an unmatched or missing `Origin` gets no allowed-origin
///   header, so browsers block the response
///
/// Allowed methods are GET, POST, PUT, DELETE and OPTIONS; allowed request
/// headers are `Content-Type` and `Authorization`.
pub fn setup_cors(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .origins()
            .into_iter()
            .filter_map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|e| warn!(origin, error = %e, "Ignoring invalid CORS origin"))
                    .ok()
            })
            .collect();

        match origins.len() {
            0 => AllowOrigin::any(),
            1 => origins
                .into_iter()
                .next()
                .map_or_else(AllowOrigin::any, AllowOrigin::exact),
            _ => AllowOrigin::list(origins),
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
