// ABOUTME: Shared, dependency-injected resources handed to every route handler
// ABOUTME: Holds the store handle, configuration and the recipe services built on them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::services::{RecipeComposer, RecipeQueryService};
use std::sync::Arc;

/// Everything a handler needs; built once at startup, shared through `Arc`
pub struct ServerResources {
    /// Store handle
    pub database: Arc<Database>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Atomic recipe creation
    pub composer: RecipeComposer,
    /// Reads, updates and deletes
    pub queries: RecipeQueryService,
}

impl ServerResources {
    /// Wire the services onto a store
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let database = Arc::new(database);
        Self {
            composer: RecipeComposer::new(Arc::clone(&database)),
            queries: RecipeQueryService::new(Arc::clone(&database)),
            database,
            config: Arc::new(config),
        }
    }
}
