// ABOUTME: Integration tests for the request id middleware on a bare router
// ABOUTME: Covers generation, propagation of client ids and handler access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! Request id middleware tests
//!
//! - a UUID is generated when the client sends none
//! - a usable client-supplied id is echoed unchanged
//! - handlers see the same id through the request extensions

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::{to_bytes, Body},
    http::{Request as HttpRequest, StatusCode},
    middleware,
    routing::get,
    Extension, Router,
};
use recipe_api::middleware::{request_id_middleware, RequestId};
use std::error::Error;
use tower::ServiceExt;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

async fn echo_handler(Extension(request_id): Extension<RequestId>) -> String {
    format!("Request ID: {request_id}")
}

fn app() -> Router {
    Router::new()
        .route("/", get(echo_handler))
        .layer(middleware::from_fn(request_id_middleware))
}

#[tokio::test]
async fn test_generates_uuid_when_absent() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder().uri("/").body(Body::empty())?;
    let response = app().oneshot(request).await?;

    let header = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .ok_or("Request ID header not present")?;
    assert!(Uuid::parse_str(header.to_str()?).is_ok());
    Ok(())
}

#[tokio::test]
async fn test_propagates_client_supplied_id() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder()
        .uri("/")
        .header(REQUEST_ID_HEADER, "trace-me-7")
        .body(Body::empty())?;
    let response = app().oneshot(request).await?;

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "trace-me-7"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(String::from_utf8(body.to_vec())?, "Request ID: trace-me-7");
    Ok(())
}

#[tokio::test]
async fn test_unusable_client_id_is_replaced() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder()
        .uri("/")
        .header(REQUEST_ID_HEADER, "has spaces in it")
        .body(Body::empty())?;
    let response = app().oneshot(request).await?;

    let header = response.headers().get(REQUEST_ID_HEADER).unwrap().to_str()?;
    assert!(Uuid::parse_str(header).is_ok());
    Ok(())
}

#[tokio::test]
async fn test_request_id_available_in_handler() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder().uri("/").body(Body::empty())?;
    let response = app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .unwrap()
        .to_str()?
        .to_owned();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(String::from_utf8(body.to_vec())?, format!("Request ID: {header}"));
    Ok(())
}
