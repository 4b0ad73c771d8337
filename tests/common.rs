// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory stores, wired resources, routers and sample recipe payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `recipe_api`

use recipe_api::{
    config::environment::{CorsConfig, ServerConfig},
    config::database::DatabaseConfig,
    database::{
        lookups::{self, LookupTable},
        recipes, Database,
    },
    models::{Amount, CreateRecipeRequest, NewIngredientLine, NewInstruction},
    server::{resources::ServerResources, RecipeServer},
};
use axum::Router;
use std::num::NonZeroU32;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Configuration pointing at a private in-memory store
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database: DatabaseConfig::in_memory(),
        ..ServerConfig::default()
    }
}

/// Fresh in-memory store with the schema in place
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::in_memory()
        .await
        .expect("Failed to create in-memory database")
}

/// Resources over a fresh in-memory store
pub async fn create_test_resources() -> Arc<ServerResources> {
    create_test_resources_with(test_config()).await
}

/// Resources over a fresh in-memory store with a custom configuration
pub async fn create_test_resources_with(config: ServerConfig) -> Arc<ServerResources> {
    let database = create_test_database().await;
    Arc::new(ServerResources::new(database, config))
}

/// Full router with middleware, as served in production
pub fn test_router(resources: &Arc<ServerResources>) -> Router {
    RecipeServer::new(Arc::clone(resources)).router()
}

/// Router with a restricted CORS origin list
pub async fn create_router_with_origins(origins: &str) -> Router {
    let config = ServerConfig {
        cors: CorsConfig {
            allowed_origins: origins.to_owned(),
        },
        ..test_config()
    };
    test_router(&create_test_resources_with(config).await)
}

/// Instruction entry helper
pub fn step(number: u32, text: &str) -> NewInstruction {
    NewInstruction {
        step_number: NonZeroU32::new(number).expect("step numbers are positive"),
        step_text: text.to_owned(),
        duration: None,
        notes: None,
    }
}

/// Amount from a decimal literal
pub fn amount(value: f64) -> Option<Amount> {
    Some(Amount::try_from(value).unwrap())
}

/// Recipe with no children
pub fn bare_recipe(name: &str, difficulty: i32) -> CreateRecipeRequest {
    CreateRecipeRequest {
        name: name.to_owned(),
        difficulty,
        description: None,
        user_id: None,
        instructions: Vec::new(),
        ingredients: Vec::new(),
    }
}

/// "test recipe": Salt and Water, both measured in Cups, boiled then dried
pub fn test_recipe_request() -> CreateRecipeRequest {
    CreateRecipeRequest {
        name: "test recipe".to_owned(),
        difficulty: 5,
        description: Some("A recipe used in tests".to_owned()),
        user_id: None,
        instructions: vec![step(1, "boil it"), step(2, "dry it")],
        ingredients: vec![
            NewIngredientLine::labelled("Salt", Some("Cup"), amount(1.0)),
            NewIngredientLine::labelled("Water", Some("Cup"), amount(4.0)),
        ],
    }
}

/// Rows in a lookup table
pub async fn lookup_count(database: &Database, table: LookupTable) -> i64 {
    let mut conn = database.pool().acquire().await.unwrap();
    lookups::count(&mut conn, table).await.unwrap()
}

/// (instructions, ingredient lines) still pointing at a recipe id
pub async fn child_counts(database: &Database, recipe_id: i64) -> (i64, i64) {
    let mut conn = database.pool().acquire().await.unwrap();
    recipes::count_children(&mut conn, recipe_id).await.unwrap()
}
