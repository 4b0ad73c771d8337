// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Serialized because every test mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

use recipe_api::config::database::DatabaseUrl;
use recipe_api::config::environment::ServerConfig;
use recipe_api::errors::ErrorCode;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const KEYS: [&str; 8] = [
    "PORT",
    "HOST",
    "DATABASE_URL",
    "DATABASE_MAX_CONNECTIONS",
    "AUTO_MIGRATE",
    "FRONTEND_URL",
    "DEBUG",
    "REQUEST_TIMEOUT_SECS",
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(
        config.database.url,
        DatabaseUrl::SQLite {
            path: PathBuf::from("./data/recipes.db")
        }
    );
    assert_eq!(config.database.max_connections, 5);
    assert!(config.database.auto_migrate);
    assert!(config.cors.allows_any_origin());
    assert!(!config.debug);
    assert_eq!(config.request_timeout_secs, 30);
}

#[test]
#[serial]
fn test_overrides_from_environment() {
    clear_env();
    env::set_var("PORT", "9090");
    env::set_var("HOST", "127.0.0.1");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("FRONTEND_URL", "http://localhost:3000");
    env::set_var("DEBUG", "true");
    env::set_var("REQUEST_TIMEOUT_SECS", "5");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.bind_address(), "127.0.0.1:9090");
    assert!(config.database.url.is_memory());
    assert_eq!(config.cors.origins(), vec!["http://localhost:3000"]);
    assert!(config.debug);
    assert!(config.database.log_statements);
    assert_eq!(config.request_timeout().as_secs(), 5);
}

#[test]
#[serial]
fn test_invalid_port_is_config_invalid() {
    clear_env();
    env::set_var("PORT", "not-a-port");

    let error = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(error.code, ErrorCode::ConfigInvalid);
    assert!(error.message.contains("PORT"));
}

#[test]
#[serial]
fn test_zero_timeout_is_config_invalid() {
    clear_env();
    env::set_var("REQUEST_TIMEOUT_SECS", "0");

    let error = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(error.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_postgres_url_is_rejected_with_explicit_message() {
    clear_env();
    env::set_var("DATABASE_URL", "postgresql://localhost/recipes");

    let error = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(error.code, ErrorCode::ConfigError);
    assert!(error.message.contains("PostgreSQL URLs are not supported"));
}

#[test]
#[serial]
fn test_invalid_debug_flag_is_config_invalid() {
    clear_env();
    env::set_var("DEBUG", "verbose");

    let error = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(error.code, ErrorCode::ConfigInvalid);
    assert!(error.message.contains("DEBUG"));
}

#[test]
#[serial]
fn test_debug_flag_drives_statement_logging() {
    clear_env();
    env::set_var("DEBUG", "off");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert!(!config.debug);
    assert!(!config.database.log_statements);
}

#[test]
#[serial]
fn test_from_env_leaves_dotenv_files_to_the_caller() {
    clear_env();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "PORT=9999\n").unwrap();
    let previous = env::current_dir().unwrap();

    env::set_current_dir(dir.path()).unwrap();
    let result = ServerConfig::from_env();
    env::set_current_dir(previous).unwrap();
    clear_env();

    assert_eq!(result.unwrap().http_port, 8080);
}
