// ABOUTME: Row access for recipes and the instruction and ingredient-line rows they own
// ABOUTME: Inserts, keyed lookups, batch child loading, scalar updates and cascading deletes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! Recipe row access
//!
//! These functions never open transactions themselves. The composer and the
//! query service decide the transaction boundaries and pass in the connection.

use crate::errors::{AppError, AppResult, DatabaseError};
use crate::models::{
    Amount, CreateRecipeRequest, Ingredient, Instruction, NewInstruction, RecipeIngredient, Unit,
    UpdateRecipeRequest,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};
use std::fmt;

/// How a caller addresses a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeKey {
    /// By row id
    Id(i64),
    /// By exact name
    Name(String),
}

impl fmt::Display for RecipeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "Recipe {id}"),
            Self::Name(name) => write!(f, "Recipe '{name}'"),
        }
    }
}

/// Scalar columns of a `recipes` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRow {
    /// Row id
    pub id: i64,
    /// Unique name
    pub name: String,
    /// Difficulty rating
    pub difficulty: i32,
    /// Optional description
    pub description: Option<String>,
    /// Optional owning user
    pub user_id: Option<String>,
}

const RECIPE_COLUMNS: &str = "id, name, difficulty, description, user_id";

/// Recipe ids bound into one `IN (...)` list; `SQLite` caps a statement at 32766 variables
pub const IDS_PER_QUERY: usize = 500;

const INSTRUCTION_COLUMNS: &str = "id, recipe_id, step_number, step_text, duration, notes";

const LINE_SELECT: &str = r"
    SELECT ri.id, ri.recipe_id, ri.ingredient_id, ri.unit_id, ri.amount_hundredths,
           i.label AS ingredient_label, u.label AS unit_label
    FROM recipe_ingredients ri
    JOIN ingredients i ON i.id = ri.ingredient_id
    LEFT JOIN units u ON u.id = ri.unit_id
";

/// Turn a unique-name collision into a 409 naming the recipe
fn name_conflict(error: sqlx::Error, name: &str) -> AppError {
    let classified = DatabaseError::from(error);
    if classified.is_unique_violation() {
        AppError::already_exists(format!("Recipe named '{name}' already exists")).with_source(classified)
    } else {
        classified.into()
    }
}

/// Insert the parent row and return its generated id
///
/// # Errors
///
/// Returns `ResourceAlreadyExists` when the name is taken
pub async fn insert_recipe(
    conn: &mut SqliteConnection,
    request: &CreateRecipeRequest,
) -> AppResult<i64> {
    let name = request.name.trim();
    let result = sqlx::query(
        r"
        INSERT INTO recipes (name, difficulty, description, user_id)
        VALUES ($1, $2, $3, $4)
        ",
    )
    .bind(name)
    .bind(request.difficulty)
    .bind(&request.description)
    .bind(&request.user_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| name_conflict(e, name))?;

    Ok(result.last_insert_rowid())
}

/// Insert one instruction for an existing recipe
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn insert_instruction(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    step: &NewInstruction,
) -> AppResult<Instruction> {
    let result = sqlx::query(
        r"
        INSERT INTO instructions (recipe_id, step_number, step_text, duration, notes)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(recipe_id)
    .bind(i64::from(step.step_number.get()))
    .bind(&step.step_text)
    .bind(step.duration)
    .bind(&step.notes)
    .execute(&mut *conn)
    .await?;

    Ok(Instruction {
        id: result.last_insert_rowid(),
        recipe_id,
        step_number: step.step_number.get(),
        step_text: step.step_text.clone(),
        duration: step.duration,
        notes: step.notes.clone(),
    })
}

/// Insert one ingredient line linking a recipe to resolved lookup rows
///
/// # Errors
///
/// Returns an error if the insert fails, including a foreign key violation
pub async fn insert_ingredient_line(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredient: &Ingredient,
    unit: Option<&Unit>,
    amount: Option<Amount>,
) -> AppResult<RecipeIngredient> {
    let result = sqlx::query(
        r"
        INSERT INTO recipe_ingredients (recipe_id, ingredient_id, unit_id, amount_hundredths)
        VALUES ($1, $2, $3, $4)
        ",
    )
    .bind(recipe_id)
    .bind(ingredient.id)
    .bind(unit.map(|u| u.id))
    .bind(amount.map(Amount::hundredths))
    .execute(&mut *conn)
    .await?;

    Ok(RecipeIngredient {
        id: result.last_insert_rowid(),
        recipe_id,
        ingredient_id: ingredient.id,
        unit_id: unit.map(|u| u.id),
        amount,
        ingredient: ingredient.clone(),
        unit: unit.cloned(),
    })
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<RecipeRow> {
    Ok(RecipeRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        difficulty: row.try_get("difficulty")?,
        description: row.try_get("description")?,
        user_id: row.try_get("user_id")?,
    })
}

fn row_to_instruction(row: &SqliteRow) -> AppResult<Instruction> {
    let step_number: i64 = row.try_get("step_number")?;
    Ok(Instruction {
        id: row.try_get("id")?,
        recipe_id: row.try_get("recipe_id")?,
        step_number: u32::try_from(step_number)
            .map_err(|e| AppError::internal(format!("Invalid stored step number {step_number}: {e}")))?,
        step_text: row.try_get("step_text")?,
        duration: row.try_get("duration")?,
        notes: row.try_get("notes")?,
    })
}

fn row_to_line(row: &SqliteRow) -> AppResult<RecipeIngredient> {
    let ingredient_id: i64 = row.try_get("ingredient_id")?;
    let unit_id: Option<i64> = row.try_get("unit_id")?;
    let unit_label: Option<String> = row.try_get("unit_label")?;
    let amount: Option<i64> = row.try_get("amount_hundredths")?;

    Ok(RecipeIngredient {
        id: row.try_get("id")?,
        recipe_id: row.try_get("recipe_id")?,
        ingredient_id,
        unit_id,
        amount: amount.map(Amount::from_hundredths),
        ingredient: Ingredient {
            id: ingredient_id,
            label: row.try_get("ingredient_label")?,
        },
        unit: unit_id.zip(unit_label).map(|(id, label)| Unit { id, label }),
    })
}

/// Fetch the parent row by id or name
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn find_recipe(
    conn: &mut SqliteConnection,
    key: &RecipeKey,
) -> AppResult<Option<RecipeRow>> {
    let row = match key {
        RecipeKey::Id(id) => {
            sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"))
                .bind(*id)
                .fetch_optional(&mut *conn)
                .await?
        }
        RecipeKey::Name(name) => {
            sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE name = $1"))
                .bind(name)
                .fetch_optional(&mut *conn)
                .await?
        }
    };
    row.as_ref().map(row_to_recipe).transpose()
}

/// All parent rows, by id
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn list_recipes(conn: &mut SqliteConnection) -> AppResult<Vec<RecipeRow>> {
    let rows = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY id"))
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(row_to_recipe).collect()
}

/// One parent row picked uniformly at random, optionally bounded by difficulty
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn random_recipe(
    conn: &mut SqliteConnection,
    max_difficulty: Option<i32>,
) -> AppResult<Option<RecipeRow>> {
    let row = match max_difficulty {
        Some(bound) => {
            sqlx::query(&format!(
                "SELECT {RECIPE_COLUMNS} FROM recipes WHERE difficulty <= $1 ORDER BY RANDOM() LIMIT 1"
            ))
            .bind(bound)
            .fetch_optional(&mut *conn)
            .await?
        }
        None => {
            sqlx::query(&format!(
                "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY RANDOM() LIMIT 1"
            ))
            .fetch_optional(&mut *conn)
            .await?
        }
    };
    row.as_ref().map(row_to_recipe).transpose()
}

/// Number of recipes
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn count_recipes(conn: &mut SqliteConnection) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Instructions of the given recipes; each recipe's steps by step number then id
///
/// Ids are bound in chunks of [`IDS_PER_QUERY`].
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn load_instructions(
    conn: &mut SqliteConnection,
    recipe_ids: &[i64],
) -> AppResult<Vec<Instruction>> {
    let mut instructions = Vec::new();
    for chunk in recipe_ids.chunks(IDS_PER_QUERY) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {INSTRUCTION_COLUMNS} FROM instructions WHERE recipe_id IN ("
        ));
        let mut ids = builder.separated(", ");
        for id in chunk {
            ids.push_bind(*id);
        }
        builder.push(") ORDER BY recipe_id, step_number, id");

        for row in builder.build().fetch_all(&mut *conn).await? {
            instructions.push(row_to_instruction(&row)?);
        }
    }
    Ok(instructions)
}

/// Ingredient lines of the given recipes with their lookups joined; each recipe's lines in insertion order
///
/// Ids are bound in chunks of [`IDS_PER_QUERY`].
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn load_ingredient_lines(
    conn: &mut SqliteConnection,
    recipe_ids: &[i64],
) -> AppResult<Vec<RecipeIngredient>> {
    let mut lines = Vec::new();
    for chunk in recipe_ids.chunks(IDS_PER_QUERY) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(LINE_SELECT);
        builder.push(" WHERE ri.recipe_id IN (");
        let mut ids = builder.separated(", ");
        for id in chunk {
            ids.push_bind(*id);
        }
        builder.push(") ORDER BY ri.recipe_id, ri.id");

        for row in builder.build().fetch_all(&mut *conn).await? {
            lines.push(row_to_line(&row)?);
        }
    }
    Ok(lines)
}

/// Replace the scalar fields that are present in `update`
///
/// # Errors
///
/// Returns `ResourceAlreadyExists` when renaming onto a taken name
pub async fn update_recipe(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    update: &UpdateRecipeRequest,
) -> AppResult<u64> {
    let name = update.name.as_deref().map(str::trim);
    let result = sqlx::query(
        r"
        UPDATE recipes SET
            name = COALESCE($1, name),
            difficulty = COALESCE($2, difficulty),
            description = COALESCE($3, description),
            user_id = COALESCE($4, user_id)
        WHERE id = $5
        ",
    )
    .bind(name)
    .bind(update.difficulty)
    .bind(&update.description)
    .bind(&update.user_id)
    .bind(recipe_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| name_conflict(e, name.unwrap_or_default()))?;

    Ok(result.rows_affected())
}

/// Delete a recipe and every row it owns; returns whether the recipe existed
///
/// Children go first so the foreign keys never dangle.
///
/// # Errors
///
/// Returns an error if any delete fails
pub async fn delete_recipe_cascade(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<bool> {
    sqlx::query("DELETE FROM instructions WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;
    let deleted = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;
    Ok(deleted.rows_affected() > 0)
}

/// Count child rows still pointing at a recipe id
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn count_children(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<(i64, i64)> {
    let instructions: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM instructions WHERE recipe_id = $1")
            .bind(recipe_id)
            .fetch_one(&mut *conn)
            .await?;
    let lines: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .fetch_one(&mut *conn)
            .await?;
    Ok((instructions, lines))
}
