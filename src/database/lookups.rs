// ABOUTME: Find-or-create access to the shared ingredient and unit lookup tables
// ABOUTME: Relies on the UNIQUE(label) constraint so concurrent creators converge on one row
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

use crate::constants::tables;
use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, LookupRef, Unit};
use sqlx::{Row, SqliteConnection};
use tracing::debug;

/// The two label-keyed lookup tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTable {
    /// `ingredients`
    Ingredients,
    /// `units`
    Units,
}

impl LookupTable {
    /// Table name
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Ingredients => tables::INGREDIENTS,
            Self::Units => tables::UNITS,
        }
    }

    /// Entity name for messages
    #[must_use]
    pub const fn entity(self) -> &'static str {
        match self {
            Self::Ingredients => "Ingredient",
            Self::Units => "Unit",
        }
    }
}

/// Return the row for `label`, inserting it first if it does not exist
///
/// The insert is a no-op when another writer already owns the label, and the
/// follow-up select then returns that writer's row.
///
/// # Errors
///
/// Returns an error if either statement fails
pub async fn find_or_create(
    conn: &mut SqliteConnection,
    table: LookupTable,
    label: &str,
) -> AppResult<(i64, String)> {
    let inserted = sqlx::query(&format!(
        "INSERT INTO {} (label) VALUES ($1) ON CONFLICT(label) DO NOTHING",
        table.table()
    ))
    .bind(label)
    .execute(&mut *conn)
    .await?;

    if inserted.rows_affected() == 1 {
        let id = inserted.last_insert_rowid();
        debug!(table = table.table(), id, label, "Created lookup row");
        return Ok((id, label.to_owned()));
    }

    let row = sqlx::query(&format!(
        "SELECT id, label FROM {} WHERE label = $1",
        table.table()
    ))
    .bind(label)
    .fetch_one(&mut *conn)
    .await?;
    Ok((row.try_get("id")?, row.try_get("label")?))
}

/// Fetch a lookup row by id
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn get_by_id(
    conn: &mut SqliteConnection,
    table: LookupTable,
    id: i64,
) -> AppResult<Option<(i64, String)>> {
    let row = sqlx::query(&format!(
        "SELECT id, label FROM {} WHERE id = $1",
        table.table()
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(|r| -> AppResult<(i64, String)> { Ok((r.try_get("id")?, r.try_get("label")?)) })
        .transpose()
}

async fn resolve(
    conn: &mut SqliteConnection,
    table: LookupTable,
    reference: LookupRef<'_>,
) -> AppResult<(i64, String)> {
    match reference {
        LookupRef::Label(label) => find_or_create(conn, table, label).await,
        LookupRef::Id(id) => get_by_id(conn, table, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{} {id}", table.entity()))),
    }
}

/// Resolve an ingredient reference, creating the ingredient for an unseen label
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown id, or a store error
pub async fn resolve_ingredient(
    conn: &mut SqliteConnection,
    reference: LookupRef<'_>,
) -> AppResult<Ingredient> {
    let (id, label) = resolve(conn, LookupTable::Ingredients, reference).await?;
    Ok(Ingredient { id, label })
}

/// Resolve a unit reference, creating the unit for an unseen label
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown id, or a store error
pub async fn resolve_unit(conn: &mut SqliteConnection, reference: LookupRef<'_>) -> AppResult<Unit> {
    let (id, label) = resolve(conn, LookupTable::Units, reference).await?;
    Ok(Unit { id, label })
}

/// Number of rows in a lookup table
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn count(conn: &mut SqliteConnection, table: LookupTable) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table.table()))
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}
