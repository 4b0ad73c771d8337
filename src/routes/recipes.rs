// ABOUTME: Route handlers for the recipe REST API
// ABOUTME: Create, list, count, keyed get/update/delete and random selection under /recipe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! Recipe routes
//!
//! | Method | Path                          | Success |
//! |--------|-------------------------------|---------|
//! | POST   | `/recipe/add`                 | 201     |
//! | GET    | `/recipe/all`                 | 200     |
//! | GET    | `/recipe/count`               | 200     |
//! | GET    | `/recipe/id/:id`              | 200     |
//! | GET    | `/recipe/name/:name`          | 200     |
//! | PUT    | `/recipe/id/:id`              | 200     |
//! | PUT    | `/recipe/name/:name`          | 200     |
//! | DELETE | `/recipe/id/:id`              | 204     |
//! | DELETE | `/recipe/name/:name`          | 204     |
//! | GET    | `/recipe/random`              | 200     |
//! | GET    | `/recipe/random/:difficulty`  | 200     |

use super::{parse_path_param, tag_errors};
use crate::database::recipes::RecipeKey;
use crate::errors::AppError;
use crate::middleware::RequestId;
use crate::models::{CreateRecipeRequest, UpdateRecipeRequest};
use crate::server::resources::ServerResources;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;

/// Any body the JSON extractor refuses is a client input error
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/recipe/add", post(Self::handle_create))
            .route("/recipe/all", get(Self::handle_list))
            .route("/recipe/count", get(Self::handle_count))
            .route(
                "/recipe/id/:id",
                get(Self::handle_get_by_id)
                    .put(Self::handle_update_by_id)
                    .delete(Self::handle_delete_by_id),
            )
            .route(
                "/recipe/name/:name",
                get(Self::handle_get_by_name)
                    .put(Self::handle_update_by_name)
                    .delete(Self::handle_delete_by_name),
            )
            .route("/recipe/random", get(Self::handle_random))
            .route(
                "/recipe/random/:difficulty",
                get(Self::handle_random_filtered),
            )
            .with_state(resources)
    }

    /// Handle POST /recipe/add - Create a recipe with its instructions and ingredients
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let tag = tag_errors(request_id);
        let request = json_body(payload).map_err(&tag)?;

        let recipe = resources
            .composer
            .create_recipe(&request)
            .await
            .map_err(&tag)?;

        Ok((StatusCode::CREATED, Json(recipe)).into_response())
    }

    /// Handle GET /recipe/all - List every recipe
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
    ) -> Result<Response, AppError> {
        let recipes = resources
            .queries
            .list_all()
            .await
            .map_err(tag_errors(request_id))?;
        Ok((StatusCode::OK, Json(recipes)).into_response())
    }

    /// Handle GET /recipe/count - Number of recipes
    async fn handle_count(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
    ) -> Result<Response, AppError> {
        let count = resources
            .queries
            .count()
            .await
            .map_err(tag_errors(request_id))?;
        Ok((StatusCode::OK, Json(count)).into_response())
    }

    async fn get_recipe(
        resources: &ServerResources,
        request_id: Option<Extension<RequestId>>,
        key: Result<RecipeKey, AppError>,
    ) -> Result<Response, AppError> {
        let tag = tag_errors(request_id);
        let recipe = resources.queries.get(&key.map_err(&tag)?).await.map_err(&tag)?;
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    async fn update_recipe(
        resources: &ServerResources,
        request_id: Option<Extension<RequestId>>,
        key: Result<RecipeKey, AppError>,
        payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let tag = tag_errors(request_id);
        let key = key.map_err(&tag)?;
        let update = json_body(payload).map_err(&tag)?;

        let recipe = resources
            .queries
            .update(&key, &update)
            .await
            .map_err(&tag)?;
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    async fn delete_recipe(
        resources: &ServerResources,
        request_id: Option<Extension<RequestId>>,
        key: Result<RecipeKey, AppError>,
    ) -> Result<Response, AppError> {
        let tag = tag_errors(request_id);
        resources
            .queries
            .delete(&key.map_err(&tag)?)
            .await
            .map_err(&tag)?;
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    fn id_key(raw: &str) -> Result<RecipeKey, AppError> {
        parse_path_param("recipe id", raw).map(RecipeKey::Id)
    }

    /// Handle GET /recipe/id/:id - Fetch a recipe by id
    async fn handle_get_by_id(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::get_recipe(&resources, request_id, Self::id_key(&id)).await
    }

    /// Handle GET /recipe/name/:name - Fetch a recipe by exact name
    async fn handle_get_by_name(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        Path(name): Path<String>,
    ) -> Result<Response, AppError> {
        Self::get_recipe(&resources, request_id, Ok(RecipeKey::Name(name))).await
    }

    /// Handle PUT /recipe/id/:id - Update scalar fields of a recipe by id
    async fn handle_update_by_id(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        Path(id): Path<String>,
        payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        Self::update_recipe(&resources, request_id, Self::id_key(&id), payload).await
    }

    /// Handle PUT /recipe/name/:name - Update scalar fields of a recipe by name
    async fn handle_update_by_name(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        Path(name): Path<String>,
        payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        Self::update_recipe(&resources, request_id, Ok(RecipeKey::Name(name)), payload).await
    }

    /// Handle DELETE /recipe/id/:id - Delete a recipe and its children by id
    async fn handle_delete_by_id(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::delete_recipe(&resources, request_id, Self::id_key(&id)).await
    }

    /// Handle DELETE /recipe/name/:name - Delete a recipe and its children by name
    async fn handle_delete_by_name(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        Path(name): Path<String>,
    ) -> Result<Response, AppError> {
        Self::delete_recipe(&resources, request_id, Ok(RecipeKey::Name(name))).await
    }

    /// Handle GET /recipe/random - Any recipe
    async fn handle_random(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
    ) -> Result<Response, AppError> {
        let recipe = resources
            .queries
            .random_one()
            .await
            .map_err(tag_errors(request_id))?;
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    /// Handle GET /recipe/random/:difficulty - Any recipe no harder than the bound
    async fn handle_random_filtered(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        Path(difficulty): Path<String>,
    ) -> Result<Response, AppError> {
        let tag = tag_errors(request_id);
        let bound: i32 = parse_path_param("difficulty", &difficulty).map_err(&tag)?;
        let recipe = resources
            .queries
            .random_filtered(bound)
            .await
            .map_err(&tag)?;
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }
}
