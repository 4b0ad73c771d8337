// ABOUTME: Request span construction for tower-http's TraceLayer
// ABOUTME: Each span carries method, path and the request id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

use super::request_id::RequestId;
use axum::body::Body;
use http::Request;
use tracing::{info_span, Span};

/// Span for one HTTP request; the request id middleware must run first
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map_or("-", RequestId::as_str);

    info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
