// ABOUTME: Recipe API server binary
// ABOUTME: Loads configuration, opens the store, and serves HTTP until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! # Recipe API Server Binary
//!
//! Startup order: `.env`, configuration, logging, store pool, schema, ping, router, serve.

use anyhow::{Context, Result};
use clap::Parser;
use recipe_api::{
    config::{database::DatabaseUrl, environment::ServerConfig},
    database::Database,
    logging,
    server::{resources::ServerResources, RecipeServer},
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "recipe-api-server")]
#[command(about = "Recipe API - HTTP service for recipes, ingredients, units and instructions")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override database URL (sqlite:<path> or sqlite::memory:)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let dotenv = dotenvy::dotenv();

    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(url) = args.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url).context("Invalid --database-url")?;
    }
    config.validate().context("Invalid configuration")?;

    logging::init_for(&config).context("Failed to initialize logging")?;
    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env file"),
        Err(e) => warn!("No .env file found or failed to load: {e}"),
    }
    info!("Configuration loaded from environment");
    info!("{}", config.summary());

    let database = Database::new(&config.database)
        .await
        .context("Failed to open database")?;
    database.ping().await.context("Database ping failed")?;
    info!(backend = %database.backend_info(), "Database ready");

    let resources = Arc::new(ServerResources::new(database, config));
    RecipeServer::new(resources)
        .run()
        .await
        .context("Server terminated with an error")?;

    Ok(())
}
