// ABOUTME: Environment-based server configuration
// ABOUTME: Parses ports, database settings, CORS origins, debug and timeout options
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

use super::database::DatabaseConfig;
use crate::constants::{defaults, env_keys};
use crate::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Cross-origin settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Empty or `*` allows any origin, otherwise a comma-separated origin list
    pub allowed_origins: String,
}

impl CorsConfig {
    /// Whether every origin is accepted
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        let origins = self.allowed_origins.trim();
        origins.is_empty() || origins == "*"
    }

    /// Individual configured origins, trimmed and without empties
    #[must_use]
    pub fn origins(&self) -> Vec<&str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Database configuration
    pub database: DatabaseConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Verbose logging, including SQL statements
    pub debug: bool,
    /// Per-request deadline in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            host: defaults::HOST.to_owned(),
            database: DatabaseConfig::default(),
            cors: CorsConfig::default(),
            debug: false,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    ///
    /// Reads variables only and logs nothing, so it can run before the
    /// subscriber exists. Loading a `.env` file is the caller's job.
    /// `DEBUG` is parsed once here and drives both `debug` and
    /// `database.log_statements`.
    ///
    /// # Errors
    ///
    /// Returns a config error when a variable is present but cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        let debug = parse_bool(env_keys::DEBUG, false)?;
        let mut database = DatabaseConfig::from_env()?;
        database.log_statements = debug;

        let config = Self {
            http_port: parse_env(env_keys::PORT, defaults::HTTP_PORT)?,
            host: env_var_or(env_keys::HOST, defaults::HOST),
            database,
            cors: CorsConfig {
                allowed_origins: env_var_or(env_keys::FRONTEND_URL, "*"),
            },
            debug,
            request_timeout_secs: parse_env(
                env_keys::REQUEST_TIMEOUT_SECS,
                defaults::REQUEST_TIMEOUT_SECS,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for a zero port or zero timeout
    pub fn validate(&self) -> AppResult<()> {
        if self.http_port == 0 {
            return Err(AppError::new(ErrorCode::ConfigInvalid, "PORT must not be 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::new(
                ErrorCode::ConfigInvalid,
                "REQUEST_TIMEOUT_SECS must be at least 1",
            ));
        }
        Ok(())
    }

    /// Request deadline as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `host:port` to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Recipe API Configuration:\n\
             - Listen: {}\n\
             - Database: {}\n\
             - Max Connections: {}\n\
             - Auto Migrate: {}\n\
             - CORS Origins: {}\n\
             - Debug: {}\n\
             - Request Timeout: {}s",
            self.bind_address(),
            self.database.url,
            self.database.max_connections,
            self.database.auto_migrate,
            if self.cors.allows_any_origin() {
                "*"
            } else {
                self.cors.allowed_origins.as_str()
            },
            self.debug,
            self.request_timeout_secs,
        )
    }
}

/// Get environment variable or default value
pub(crate) fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset or blank
pub(crate) fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e| {
            AppError::new(
                ErrorCode::ConfigInvalid,
                format!("Invalid {key} value {raw:?}: {e}"),
            )
        }),
        _ => Ok(default),
    }
}

/// Parse a boolean flag; accepts true/false, 1/0, yes/no, on/off
pub(crate) fn parse_bool(key: &str, default: bool) -> AppResult<bool> {
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(AppError::new(
            ErrorCode::ConfigInvalid,
            format!("Invalid {key} value {raw:?}: expected a boolean"),
        )),
    }
}
