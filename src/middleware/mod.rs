// ABOUTME: HTTP middleware for cross-origin access, request ids and request spans
// ABOUTME: Layer order is assembled in the server module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

/// CORS layer built from configuration
pub mod cors;
/// Request id propagation and generation
pub mod request_id;
/// Per-request tracing spans
pub mod tracing;

pub use cors::setup_cors;
pub use request_id::{request_id_middleware, RequestId};
pub use self::tracing::request_span;
