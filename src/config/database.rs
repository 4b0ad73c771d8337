// ABOUTME: Database configuration types: connection URL parsing and pool settings
// ABOUTME: Only SQLite targets are supported, either file-backed or in-memory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

use super::environment::{env_var_or, parse_bool, parse_env};
use crate::constants::{defaults, env_keys};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// Accepts `sqlite:<path>`, `sqlite://<path>` and `sqlite::memory:`.
    /// A bare path is treated as a `SQLite` file.
    ///
    /// # Errors
    ///
    /// Returns a config error for empty or non-`SQLite` URLs
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::config("DATABASE_URL must not be empty"));
        }
        if let Some(rest) = s.strip_prefix("sqlite:") {
            let path_str = rest.strip_prefix("//").unwrap_or(rest);
            if path_str == ":memory:" || path_str.is_empty() {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Err(AppError::config(
                "PostgreSQL URLs are not supported; this server stores recipes in SQLite (use sqlite:<path> or sqlite::memory:)",
            ))
        } else if s.contains("://") {
            Err(AppError::config(format!(
                "Unsupported database URL scheme in {s}; only sqlite is supported"
            )))
        } else {
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from(
                defaults::DATABASE_URL
                    .strip_prefix("sqlite:")
                    .unwrap_or(defaults::DATABASE_URL),
            ),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database connection and management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Where the store lives
    pub url: DatabaseUrl,
    /// Upper bound on pooled connections; in-memory stores always use one
    pub max_connections: u32,
    /// Create the schema on startup
    pub auto_migrate: bool,
    /// Log every SQL statement at debug
    pub log_statements: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DatabaseUrl::default(),
            max_connections: defaults::DATABASE_MAX_CONNECTIONS,
            auto_migrate: true,
            log_statements: false,
        }
    }
}

impl DatabaseConfig {
    /// In-memory store with the schema created, as used by tests and benches
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: DatabaseUrl::Memory,
            max_connections: 1,
            ..Self::default()
        }
    }

    /// Load database configuration from environment
    ///
    /// `log_statements` stays off here; `ServerConfig::from_env` sets it from `DEBUG`.
    ///
    /// # Errors
    ///
    /// Returns an error if database environment variables are invalid
    pub fn from_env() -> AppResult<Self> {
        let max_connections: u32 = parse_env(
            env_keys::DATABASE_MAX_CONNECTIONS,
            defaults::DATABASE_MAX_CONNECTIONS,
        )?;
        if max_connections == 0 {
            return Err(AppError::new(
                crate::errors::ErrorCode::ConfigInvalid,
                "DATABASE_MAX_CONNECTIONS must be at least 1",
            ));
        }

        Ok(Self {
            url: DatabaseUrl::parse_url(&env_var_or(
                env_keys::DATABASE_URL,
                defaults::DATABASE_URL,
            ))?,
            max_connections,
            auto_migrate: parse_bool(env_keys::AUTO_MIGRATE, true)?,
            log_statements: false,
        })
    }
}
