// ABOUTME: Recipe composer: writes a recipe, its instructions and ingredient lines in one transaction
// ABOUTME: Resolves shared ingredients and units by find-or-create inside the same transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! # Recipe Composer
//!
//! `create_recipe` turns a denormalized [`CreateRecipeRequest`] into normalized
//! rows. The write order is fixed: recipe row, then instructions in input order,
//! then per ingredient line its ingredient, its unit and the linking row.
//!
//! All of it runs inside one [`crate::database::TransactionGuard`]. Any failure, including the
//! handler future being dropped, rolls back every row written so far, newly
//! created ingredient and unit rows included. A locked store restarts the whole
//! transaction through [`retry_transaction`].

use crate::constants::{retry::MAX_TRANSACTION_ATTEMPTS, tables};
use crate::database::{lookups, recipes, retry_transaction, Database};
use crate::errors::AppResult;
use crate::logging::AppLogger;
use crate::models::{CreateRecipeRequest, Recipe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Creates recipes atomically
#[derive(Clone)]
pub struct RecipeComposer {
    database: Arc<Database>,
}

impl RecipeComposer {
    /// Create a composer over the given store
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Persist a recipe and everything it owns, returning it fully populated
    ///
    /// Instructions and ingredient lines come back in input order with their
    /// generated ids and resolved ingredient and unit rows attached.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` / `MissingRequiredField` for an unusable payload, before any write
    /// - `ResourceAlreadyExists` when the recipe name is taken
    /// - `ResourceNotFound` when a line references an unknown ingredient or unit id
    /// - a database error for any other store failure; nothing is persisted in every case
    pub async fn create_recipe(&self, request: &CreateRecipeRequest) -> AppResult<Recipe> {
        request.validate()?;

        let duplicates = request.duplicate_step_numbers();
        if !duplicates.is_empty() {
            warn!(
                recipe = %request.name,
                steps = ?duplicates,
                "Recipe has duplicate step numbers"
            );
        }

        let started = Instant::now();
        let result = retry_transaction(|| self.compose(request), MAX_TRANSACTION_ATTEMPTS).await;
        AppLogger::log_database_operation(
            "create_recipe",
            tables::RECIPES,
            result.is_ok(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );

        if let Ok(recipe) = &result {
            info!(
                recipe_id = recipe.id,
                instructions = recipe.instructions.len(),
                ingredients = recipe.ingredients.len(),
                "Recipe created"
            );
        }
        result
    }

    /// One attempt at the full write
    async fn compose(&self, request: &CreateRecipeRequest) -> AppResult<Recipe> {
        let mut guard = self.database.begin().await?;

        let recipe_id = recipes::insert_recipe(guard.executor()?, request).await?;

        let mut instructions = Vec::with_capacity(request.instructions.len());
        for step in &request.instructions {
            instructions.push(recipes::insert_instruction(guard.executor()?, recipe_id, step).await?);
        }

        let mut ingredients = Vec::with_capacity(request.ingredients.len());
        for line in &request.ingredients {
            let ingredient =
                lookups::resolve_ingredient(guard.executor()?, line.ingredient_ref()?).await?;
            let unit = match line.unit_ref()? {
                Some(reference) => Some(lookups::resolve_unit(guard.executor()?, reference).await?),
                None => None,
            };
            ingredients.push(
                recipes::insert_ingredient_line(
                    guard.executor()?,
                    recipe_id,
                    &ingredient,
                    unit.as_ref(),
                    line.amount,
                )
                .await?,
            );
        }

        guard.commit().await?;

        Ok(Recipe {
            id: recipe_id,
            name: request.name.trim().to_owned(),
            difficulty: request.difficulty,
            description: request.description.clone(),
            user_id: request.user_id.clone(),
            ingredients,
            instructions,
        })
    }
}
