// ABOUTME: Configuration management module for server and database settings
// ABOUTME: Everything is read from environment variables, optionally seeded from a .env file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! Configuration module
//!
//! - **Environment**: [`environment::ServerConfig`], the top-level settings
//! - **Database**: connection string parsing and pool sizing

/// Database URL parsing and pool configuration
pub mod database;
/// Server configuration from environment variables
pub mod environment;
