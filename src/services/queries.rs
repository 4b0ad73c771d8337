// ABOUTME: Recipe query service: keyed reads, listing, counting and random selection
// ABOUTME: Also hosts scalar updates and cascading deletes, each in its own transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

use crate::constants::retry::MAX_TRANSACTION_ATTEMPTS;
use crate::database::recipes::{self, RecipeKey, RecipeRow};
use crate::database::{retry_transaction, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{Instruction, Recipe, RecipeIngredient, UpdateRecipeRequest};
use sqlx::SqliteConnection;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Read, update and delete access to recipes
///
/// Every read returns recipes with instructions ordered by step number and
/// ingredient lines in insertion order, each line with its ingredient and unit.
#[derive(Clone)]
pub struct RecipeQueryService {
    database: Arc<Database>,
}

/// Attach children to their parent rows, preserving the parents' order
async fn hydrate(conn: &mut SqliteConnection, rows: Vec<RecipeRow>) -> AppResult<Vec<Recipe>> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();

    let mut instructions: HashMap<i64, Vec<Instruction>> = HashMap::new();
    for instruction in recipes::load_instructions(conn, &ids).await? {
        instructions
            .entry(instruction.recipe_id)
            .or_default()
            .push(instruction);
    }

    let mut lines: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
    for line in recipes::load_ingredient_lines(conn, &ids).await? {
        lines.entry(line.recipe_id).or_default().push(line);
    }

    Ok(rows
        .into_iter()
        .map(|row| Recipe {
            instructions: instructions.remove(&row.id).unwrap_or_default(),
            ingredients: lines.remove(&row.id).unwrap_or_default(),
            id: row.id,
            name: row.name,
            difficulty: row.difficulty,
            description: row.description,
            user_id: row.user_id,
        })
        .collect())
}

async fn hydrate_one(conn: &mut SqliteConnection, row: RecipeRow) -> AppResult<Recipe> {
    hydrate(conn, vec![row])
        .await?
        .pop()
        .ok_or_else(|| AppError::internal("Hydration dropped a recipe row"))
}

impl RecipeQueryService {
    /// Create a query service over the given store
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Fetch one recipe by id or name
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if nothing matches
    pub async fn get(&self, key: &RecipeKey) -> AppResult<Recipe> {
        retry_transaction(|| self.get_once(key), MAX_TRANSACTION_ATTEMPTS).await
    }

    async fn get_once(&self, key: &RecipeKey) -> AppResult<Recipe> {
        let mut guard = self.database.begin().await?;
        let row = recipes::find_recipe(guard.executor()?, key)
            .await?
            .ok_or_else(|| AppError::not_found(key.to_string()))?;
        let recipe = hydrate_one(guard.executor()?, row).await?;
        guard.commit().await?;
        Ok(recipe)
    }

    /// Fetch one recipe by id
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no recipe has this id
    pub async fn get_by_id(&self, id: i64) -> AppResult<Recipe> {
        self.get(&RecipeKey::Id(id)).await
    }

    /// Fetch one recipe by exact name
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no recipe has this name
    pub async fn get_by_name(&self, name: &str) -> AppResult<Recipe> {
        self.get(&RecipeKey::Name(name.to_owned())).await
    }

    /// Every recipe, by id
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn list_all(&self) -> AppResult<Vec<Recipe>> {
        let all = retry_transaction(|| self.list_all_once(), MAX_TRANSACTION_ATTEMPTS).await?;
        debug!(count = all.len(), "Listed recipes");
        Ok(all)
    }

    async fn list_all_once(&self) -> AppResult<Vec<Recipe>> {
        let mut guard = self.database.begin().await?;
        let rows = recipes::list_recipes(guard.executor()?).await?;
        let all = hydrate(guard.executor()?, rows).await?;
        guard.commit().await?;
        Ok(all)
    }

    /// Number of recipes
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn count(&self) -> AppResult<i64> {
        retry_transaction(
            || async move {
                let mut conn = self.database.pool().acquire().await?;
                recipes::count_recipes(&mut conn).await
            },
            MAX_TRANSACTION_ATTEMPTS,
        )
        .await
    }

    /// One recipe chosen uniformly at random
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if there are no recipes
    pub async fn random_one(&self) -> AppResult<Recipe> {
        self.random(None).await
    }

    /// One recipe chosen uniformly at random among those with `difficulty <= max_difficulty`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no recipe qualifies
    pub async fn random_filtered(&self, max_difficulty: i32) -> AppResult<Recipe> {
        self.random(Some(max_difficulty)).await
    }

    async fn random(&self, max_difficulty: Option<i32>) -> AppResult<Recipe> {
        retry_transaction(
            || self.random_once(max_difficulty),
            MAX_TRANSACTION_ATTEMPTS,
        )
        .await
    }

    async fn random_once(&self, max_difficulty: Option<i32>) -> AppResult<Recipe> {
        let mut guard = self.database.begin().await?;
        let row = recipes::random_recipe(guard.executor()?, max_difficulty)
            .await?
            .ok_or_else(|| match max_difficulty {
                Some(bound) => AppError::not_found(format!("Recipe with difficulty <= {bound}")),
                None => AppError::not_found("Recipe"),
            })?;
        let recipe = hydrate_one(guard.executor()?, row).await?;
        guard.commit().await?;
        Ok(recipe)
    }

    /// Replace the scalar fields present in `update` and return the updated recipe
    ///
    /// A locked store restarts the whole read-then-write transaction.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank new name
    /// - `ResourceNotFound` if nothing matches `key`
    /// - `ResourceAlreadyExists` when renaming onto a taken name
    pub async fn update(&self, key: &RecipeKey, update: &UpdateRecipeRequest) -> AppResult<Recipe> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::invalid_input("Recipe name must not be empty"));
        }

        let recipe = retry_transaction(
            || self.update_once(key, update),
            MAX_TRANSACTION_ATTEMPTS,
        )
        .await?;
        info!(recipe_id = recipe.id, "Recipe updated");
        Ok(recipe)
    }

    async fn update_once(&self, key: &RecipeKey, update: &UpdateRecipeRequest) -> AppResult<Recipe> {
        let mut guard = self.database.begin().await?;
        let row = recipes::find_recipe(guard.executor()?, key)
            .await?
            .ok_or_else(|| AppError::not_found(key.to_string()))?;

        if !update.is_empty() {
            let updated = recipes::update_recipe(guard.executor()?, row.id, update).await?;
            if updated == 0 {
                return Err(AppError::not_found(key.to_string()));
            }
        }

        let refreshed = recipes::find_recipe(guard.executor()?, &RecipeKey::Id(row.id))
            .await?
            .ok_or_else(|| AppError::not_found(key.to_string()))?;
        let recipe = hydrate_one(guard.executor()?, refreshed).await?;
        guard.commit().await?;
        Ok(recipe)
    }

    /// Delete a recipe together with its instructions and ingredient lines
    ///
    /// Shared ingredient and unit rows are left in place. A locked store
    /// restarts the whole transaction.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if nothing matches `key`
    pub async fn delete(&self, key: &RecipeKey) -> AppResult<()> {
        let recipe_id = retry_transaction(|| self.delete_once(key), MAX_TRANSACTION_ATTEMPTS).await?;
        info!(recipe_id, "Recipe deleted");
        Ok(())
    }

    async fn delete_once(&self, key: &RecipeKey) -> AppResult<i64> {
        let mut guard = self.database.begin().await?;
        let row = recipes::find_recipe(guard.executor()?, key)
            .await?
            .ok_or_else(|| AppError::not_found(key.to_string()))?;

        if !recipes::delete_recipe_cascade(guard.executor()?, row.id).await? {
            return Err(AppError::not_found(key.to_string()));
        }
        guard.commit().await?;
        Ok(row.id)
    }
}
