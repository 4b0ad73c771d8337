// ABOUTME: Constants for the recipe API organized by domain
// ABOUTME: Default ports, environment variable names, table names and retry limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

/// Service identity used in logs
pub mod service {
    /// Service name for structured logging
    pub const SERVICE_NAME: &str = "recipe-api";
    /// Text served on the landing route
    pub const LANDING_TEXT: &str = "Recipe API is running";
}

/// Environment variable names
pub mod env_keys {
    /// HTTP listen port
    pub const PORT: &str = "PORT";
    /// HTTP listen address
    pub const HOST: &str = "HOST";
    /// Database connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Pool size
    pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
    /// Create tables on startup
    pub const AUTO_MIGRATE: &str = "AUTO_MIGRATE";
    /// Allowed CORS origin(s)
    pub const FRONTEND_URL: &str = "FRONTEND_URL";
    /// Verbose logging switch
    pub const DEBUG: &str = "DEBUG";
    /// Per-request deadline
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    /// Log output format
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Default configuration values
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8080;
    /// Default bind address
    pub const HOST: &str = "0.0.0.0";
    /// Default database location
    pub const DATABASE_URL: &str = "sqlite:./data/recipes.db";
    /// Default connection pool size
    pub const DATABASE_MAX_CONNECTIONS: u32 = 5;
    /// Default request deadline in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Statements slower than this are logged at warn
    pub const SLOW_STATEMENT_SECS: u64 = 1;
}

/// Table names
pub mod tables {
    /// Recipe rows
    pub const RECIPES: &str = "recipes";
    /// Shared ingredient lookup rows
    pub const INGREDIENTS: &str = "ingredients";
    /// Shared unit lookup rows
    pub const UNITS: &str = "units";
    /// Recipe to ingredient linking rows
    pub const RECIPE_INGREDIENTS: &str = "recipe_ingredients";
    /// Recipe steps
    pub const INSTRUCTIONS: &str = "instructions";
}

/// Transaction retry policy
pub mod retry {
    /// Attempts for a composed write before giving up
    pub const MAX_TRANSACTION_ATTEMPTS: u32 = 5;
    /// Base backoff, doubled per attempt
    pub const BASE_BACKOFF_MS: u64 = 10;
}

/// HTTP header names
pub mod headers {
    /// Request correlation header
    pub const REQUEST_ID: &str = "x-request-id";
}
