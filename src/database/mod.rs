// ABOUTME: SQLite store handle: connection pool, schema creation and health checks
// ABOUTME: Row-level access lives in the lookups and recipes submodules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! # Database
//!
//! [`Database`] owns the `SQLite` pool. Every function in [`lookups`] and
//! [`recipes`] takes a `&mut SqliteConnection`, so the same code runs against
//! a pooled connection or inside a [`transactions::TransactionGuard`].

/// Find-or-create access to the shared ingredient and unit tables
pub mod lookups;
/// Row access for recipes, instructions and ingredient lines
pub mod recipes;
/// RAII transaction guard and retry with backoff
pub mod transactions;

use crate::config::database::{DatabaseConfig, DatabaseUrl};
use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use log::LevelFilter;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub use transactions::{retry_transaction, SqliteTransactionGuard, TransactionGuard};

/// Schema statements, applied in order; each is idempotent
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS recipes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        difficulty INTEGER NOT NULL,
        description TEXT,
        user_id TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        label TEXT NOT NULL UNIQUE
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS units (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        label TEXT NOT NULL UNIQUE
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS recipe_ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id),
        ingredient_id INTEGER NOT NULL REFERENCES ingredients(id),
        unit_id INTEGER REFERENCES units(id),
        amount_hundredths INTEGER
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS instructions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id),
        step_number INTEGER NOT NULL CHECK (step_number > 0),
        step_text TEXT NOT NULL DEFAULT '',
        duration INTEGER,
        notes TEXT
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_recipes_difficulty ON recipes(difficulty)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_ingredient ON recipe_ingredients(ingredient_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_unit ON recipe_ingredients(unit_id)",
    "CREATE INDEX IF NOT EXISTS idx_instructions_recipe ON instructions(recipe_id, step_number)",
];

/// Handle to the recipe store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    url: DatabaseUrl,
}

impl Database {
    /// Open the pool described by `config`, creating the schema when `auto_migrate` is set
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema cannot be created
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let options = Self::connect_options(config)?;

        let pool = if config.url.is_memory() {
            // Every in-memory connection is its own database; keep exactly one alive
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            if let DatabaseUrl::SQLite { path } = &config.url {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::config(format!(
                            "Cannot create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
            SqlitePoolOptions::new()
                .max_connections(config.max_connections.max(1))
                .connect_with(options)
                .await?
        };

        let database = Self {
            pool,
            url: config.url.clone(),
        };
        info!(database = %database.url, "Database pool opened");

        if config.auto_migrate {
            database.migrate().await?;
        }
        Ok(database)
    }

    /// In-memory store with the schema in place
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be opened
    pub async fn in_memory() -> AppResult<Self> {
        Self::new(&DatabaseConfig::in_memory()).await
    }

    fn connect_options(config: &DatabaseConfig) -> AppResult<SqliteConnectOptions> {
        let statement_level = if config.log_statements {
            LevelFilter::Debug
        } else {
            LevelFilter::Off
        };

        let mut options = SqliteConnectOptions::from_str(&config.url.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid database URL {}: {e}", config.url)))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(statement_level)
            .log_slow_statements(
                LevelFilter::Warn,
                Duration::from_secs(defaults::SLOW_STATEMENT_SECS),
            );

        if !config.url.is_memory() {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }
        Ok(options)
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Where this store lives
    #[must_use]
    pub const fn url(&self) -> &DatabaseUrl {
        &self.url
    }

    /// Create tables and indexes if they do not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if any schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA.iter().copied() {
            sqlx::query(statement).execute(&self.pool).await.map_err(|e| {
                AppError::database(format!("Schema migration failed: {e}")).with_source(e)
            })?;
        }
        debug!(statements = SCHEMA.len(), "Schema up to date");
        Ok(())
    }

    /// Round-trip a trivial query to check the store is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Start a transaction wrapped in a rollback-on-drop guard
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or `BEGIN` fails
    pub async fn begin(&self) -> AppResult<SqliteTransactionGuard<'static>> {
        Ok(TransactionGuard::new(self.pool.begin().await?))
    }

    /// Short human-readable backend description
    #[must_use]
    pub fn backend_info(&self) -> String {
        match &self.url {
            DatabaseUrl::Memory => "SQLite (in-memory)".to_owned(),
            DatabaseUrl::SQLite { path } => format!("SQLite ({})", path.display()),
        }
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
