// ABOUTME: Main library entry point for the Recipe API service
// ABOUTME: Exposes the store, the recipe composer, query services and the HTTP router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

#![deny(unsafe_code)]

//! # Recipe API
//!
//! An HTTP service for recipes, their instructions and ingredient lines, and
//! the shared ingredient and unit lookup tables those lines point at.
//!
//! ## Architecture
//!
//! - **Database**: `SQLite` pool, schema, transaction guard and row access
//! - **Services**: the recipe composer (atomic multi-table create) and the
//!   read/update/delete query service
//! - **Routes**: axum handlers mapping services onto `/recipe/...`
//! - **Server**: router assembly, middleware stack and graceful shutdown
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use recipe_api::config::environment::ServerConfig;
//! use recipe_api::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Recipe API configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Configuration loaded from the environment
pub mod config;

/// Service-wide constants
pub use recipe_core::constants;

/// `SQLite` store: pool, schema, transactions and row access
pub mod database;

/// Unified error handling
pub mod errors;

/// Tracing subscriber setup
pub mod logging;

/// HTTP middleware: CORS, request ids, request spans
pub mod middleware;

/// Domain models and request payloads
pub mod models;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

/// Recipe composer and query service
pub mod services;
