// ABOUTME: HTTP-level tests for the recipe routes through the full middleware stack
// ABOUTME: Checks status codes, JSON bodies, error envelopes, CORS and request id echo
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_router_with_origins, create_test_resources, test_recipe_request, test_router};
use helpers::axum_test::AxumTestRequest;
use recipe_api::models::Recipe;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_get_delete_lifecycle() {
    let resources = create_test_resources().await;
    let router = test_router(&resources);

    let created: Recipe = AxumTestRequest::post("/recipe/add")
        .json(&test_recipe_request())
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(created.name, "test recipe");
    assert_eq!(created.ingredients.len(), 2);

    let fetched: Value = AxumTestRequest::get(&format!("/recipe/id/{}", created.id))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(fetched["name"], "test recipe");
    assert_eq!(fetched["instructions"][0]["stepNumber"], 1);
    assert_eq!(fetched["instructions"][0]["stepText"], "boil it");
    assert_eq!(fetched["ingredients"][1]["ingredient"]["label"], "Water");
    assert_eq!(fetched["ingredients"][1]["unit"]["label"], "Cup");
    assert_eq!(fetched["ingredients"][1]["amount"], 4.0);

    let deleted = AxumTestRequest::delete(&format!("/recipe/id/{}", created.id))
        .send(router.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(deleted.is_empty());

    let missing: Value = AxumTestRequest::get(&format!("/recipe/id/{}", created.id))
        .header("x-request-id", "lifecycle-check")
        .send(router)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();
    assert_eq!(missing["error"]["code"], "RESOURCE_NOT_FOUND");
    assert_eq!(missing["error"]["request_id"], "lifecycle-check");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let resources = create_test_resources().await;

    let body: Value = AxumTestRequest::post("/recipe/add")
        .raw_json("{\"name\": \"broken\", ")
        .send(test_router(&resources))
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert_eq!(resources.queries.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_zero_step_number_is_bad_request() {
    let resources = create_test_resources().await;

    let payload = json!({
        "name": "Zero",
        "difficulty": 1,
        "instructions": [{ "stepNumber": 0, "stepText": "nothing" }]
    });
    AxumTestRequest::post("/recipe/add")
        .json(&payload)
        .send(test_router(&resources))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resources.queries.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let resources = create_test_resources().await;

    let body: Value = AxumTestRequest::get("/recipe/id/abc")
        .send(test_router(&resources))
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert!(body["error"]["request_id"].is_string());
}

#[tokio::test]
async fn test_duplicate_name_is_conflict() {
    let resources = create_test_resources().await;
    let router = test_router(&resources);

    AxumTestRequest::post("/recipe/add")
        .json(&test_recipe_request())
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED);

    let body: Value = AxumTestRequest::post("/recipe/add")
        .json(&test_recipe_request())
        .send(router)
        .await
        .assert_status(StatusCode::CONFLICT)
        .json();
    assert_eq!(body["error"]["code"], "RESOURCE_ALREADY_EXISTS");
    assert_eq!(resources.queries.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_line_with_unknown_ingredient_id_is_not_found_and_rolled_back() {
    let resources = create_test_resources().await;

    let payload = json!({
        "name": "Ghost",
        "difficulty": 1,
        "ingredients": [
            { "ingredient": { "label": "Salt" }, "amount": 1.0 },
            { "ingredient_id": 424242 }
        ]
    });
    AxumTestRequest::post("/recipe/add")
        .json(&payload)
        .send(test_router(&resources))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert_eq!(resources.queries.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_preflight_is_answered_with_cors_headers() {
    let resources = create_test_resources().await;

    let response = AxumTestRequest::options("/recipe/add")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .send(test_router(&resources))
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("*")
    );
    assert!(response.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_configured_origin_is_echoed() {
    let router = create_router_with_origins("http://localhost:3000").await;

    let response = AxumTestRequest::get("/recipe/count")
        .header("origin", "http://localhost:3000")
        .send(router)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("http://localhost:3000")
    );
}

#[tokio::test]
async fn test_origin_list_echoes_only_matching_origins() {
    let router = create_router_with_origins("http://a.test, http://b.test").await;

    let matched = AxumTestRequest::get("/recipe/count")
        .header("origin", "http://b.test")
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(
        matched.header("access-control-allow-origin").as_deref(),
        Some("http://b.test")
    );

    let unmatched = AxumTestRequest::get("/recipe/count")
        .header("origin", "http://evil.test")
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);
    assert!(unmatched.header("access-control-allow-origin").is_none());

    let missing = AxumTestRequest::get("/recipe/count")
        .send(router)
        .await
        .assert_status(StatusCode::OK);
    assert!(missing.header("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let resources = create_test_resources().await;
    let router = test_router(&resources);

    let echoed = AxumTestRequest::get("/recipe/all")
        .header("x-request-id", "client-supplied-42")
        .send(router.clone())
        .await;
    assert_eq!(
        echoed.header("x-request-id").as_deref(),
        Some("client-supplied-42")
    );

    let generated = AxumTestRequest::get("/recipe/all").send(router).await;
    let id = generated.header("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(&id).is_ok());
}

#[tokio::test]
async fn test_count_list_and_random_routes() {
    let resources = create_test_resources().await;
    let router = test_router(&resources);

    AxumTestRequest::get("/recipe/random")
        .send(router.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    AxumTestRequest::post("/recipe/add")
        .json(&test_recipe_request())
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED);
    AxumTestRequest::post("/recipe/add")
        .json(&json!({ "name": "Toast", "difficulty": 1 }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED);

    let count: i64 = AxumTestRequest::get("/recipe/count")
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(count, 2);

    let all: Vec<Recipe> = AxumTestRequest::get("/recipe/all")
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(all.len(), 2);

    let easy: Recipe = AxumTestRequest::get("/recipe/random/3")
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(easy.name, "Toast");

    AxumTestRequest::get("/recipe/random/0")
        .send(router.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    AxumTestRequest::get("/recipe/random/hard")
        .send(router)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_name_routes_decode_path() {
    let resources = create_test_resources().await;
    let router = test_router(&resources);

    AxumTestRequest::post("/recipe/add")
        .json(&test_recipe_request())
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED);

    let fetched: Recipe = AxumTestRequest::get("/recipe/name/test%20recipe")
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(fetched.difficulty, 5);

    let updated: Recipe = AxumTestRequest::put("/recipe/name/test%20recipe")
        .json(&json!({ "difficulty": 3 }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(updated.difficulty, 3);
    assert_eq!(updated.instructions.len(), 2);

    AxumTestRequest::delete("/recipe/name/test%20recipe")
        .send(router.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    AxumTestRequest::delete("/recipe/name/test%20recipe")
        .send(router)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_by_id_rename_collision() {
    let resources = create_test_resources().await;
    let router = test_router(&resources);

    let first: Recipe = AxumTestRequest::post("/recipe/add")
        .json(&test_recipe_request())
        .send(router.clone())
        .await
        .json();
    AxumTestRequest::post("/recipe/add")
        .json(&json!({ "name": "Toast", "difficulty": 1 }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::CREATED);

    AxumTestRequest::put(&format!("/recipe/id/{}", first.id))
        .json(&json!({ "name": "Toast" }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::CONFLICT);

    AxumTestRequest::put("/recipe/id/999999")
        .json(&json!({ "difficulty": 2 }))
        .send(router)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_landing_and_health() {
    let resources = create_test_resources().await;
    let router = test_router(&resources);

    let landing = AxumTestRequest::get("/")
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .text();
    assert_eq!(landing, "Recipe API is running");

    let health: Value = AxumTestRequest::get("/health")
        .send(router)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "recipe-api");
}
