// ABOUTME: Transaction management with an RAII rollback guard and retry with exponential backoff
// ABOUTME: Busy or locked SQLite errors restart the whole transaction; constraint errors never do
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! Transaction management with RAII guards and retry patterns
//!
//! - `TransactionGuard`: wraps a `sqlx` transaction and rolls it back if it is
//!   dropped without `commit()`. This covers early `?` returns as well as a
//!   handler future dropped on client disconnect or request timeout.
//! - `retry_transaction`: reruns a complete transaction closure when the store
//!   reports a transient lock conflict.
//!
//! ## Combining the two
//!
//! ```text
//! retry_transaction(|| async {
//!     let mut guard = database.begin().await?;
//!     sqlx::query("INSERT INTO recipes ...").execute(guard.executor()?).await?;
//!     sqlx::query("INSERT INTO instructions ...").execute(guard.executor()?).await?;
//!     guard.commit().await
//! }, MAX_TRANSACTION_ATTEMPTS).await
//! ```

use std::future::Future;
use std::time::Duration;

use sqlx::{Database, Transaction};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::constants::retry::BASE_BACKOFF_MS;
use crate::errors::{AppError, AppResult, ErrorCode};

/// Run `f` up to `max_attempts` times, retrying only transient store errors
///
/// Backoff doubles from the base delay: 10ms, 20ms, 40ms, 80ms.
/// Non-retryable errors (constraint violations, missing rows, bad input) are
/// returned immediately.
///
/// # Errors
///
/// Returns the first non-retryable error unchanged. When every attempt hit a
/// transient error, returns a `DatabaseError` wrapping the last one.
pub async fn retry_transaction<F, Fut, T>(mut f: F, max_attempts: u32) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempts = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempts += 1;
                if !is_retryable_error(&e) {
                    debug!(
                        attempts = attempts,
                        error = %e,
                        "Transaction failed with non-retryable error"
                    );
                    return Err(e);
                }
                if attempts >= max_attempts {
                    error!(
                        attempts = attempts,
                        max_attempts = max_attempts,
                        error = %e,
                        "Transaction failed after max retries"
                    );
                    return Err(retries_exhausted(e, attempts));
                }

                let backoff_ms = BASE_BACKOFF_MS << (attempts - 1).min(16);
                warn!(
                    attempt = attempts,
                    max_attempts = max_attempts,
                    backoff_ms = backoff_ms,
                    error = %e,
                    "Transaction failed with retryable error, retrying after backoff"
                );
                sleep(Duration::from_millis(backoff_ms)).await;
            }
        }
    }
}

/// A lock conflict that outlived every attempt is a failed transaction (500)
fn retries_exhausted(error: AppError, attempts: u32) -> AppError {
    AppError::database(format!(
        "Transaction failed after {attempts} attempts: {}",
        error.message
    ))
    .with_source(error)
}

/// Whether an error is a transient lock conflict worth retrying
///
/// Classified errors carry `ResourceUnavailable`. Errors that were flattened
/// into a message elsewhere are recognised by the `SQLite` wording.
pub(crate) fn is_retryable_error(error: &AppError) -> bool {
    if error.code == ErrorCode::ResourceUnavailable {
        return true;
    }
    if error.code != ErrorCode::DatabaseError {
        return false;
    }

    let message = error.message.to_lowercase();
    if message.contains("constraint") {
        return false;
    }
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("busy")
        || message.contains("could not serialize")
}

/// RAII guard for database transactions ensuring automatic rollback on drop
///
/// If an error occurs before `commit()`, the guard is dropped and the
/// transaction is rolled back by `sqlx`.
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
    committed: bool,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Wrap a transaction obtained from `pool.begin().await`
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>) -> Self {
        debug!("TransactionGuard created - transaction will auto-rollback if not committed");
        Self {
            transaction: Some(transaction),
            committed: false,
        }
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; a busy store is reported as retryable
    pub async fn commit(mut self) -> AppResult<()> {
        match self.transaction.take() {
            Some(tx) => {
                tx.commit().await.map_err(|e| {
                    let error = AppError::from(e);
                    AppError::new(
                        error.code,
                        format!("Transaction commit failed: {}", error.message),
                    )
                })?;
                self.committed = true;
                debug!("TransactionGuard committed successfully");
                Ok(())
            }
            None => Err(AppError::internal(
                "Transaction already consumed - cannot commit",
            )),
        }
    }

    /// Explicitly roll back the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback operation fails
    pub async fn rollback(mut self) -> AppResult<()> {
        match self.transaction.take() {
            Some(tx) => {
                tx.rollback()
                    .await
                    .map_err(|e| AppError::database(format!("Transaction rollback failed: {e}")))?;
                debug!("TransactionGuard rolled back explicitly");
                Ok(())
            }
            None => Err(AppError::internal(
                "Transaction already consumed - cannot rollback",
            )),
        }
    }

    /// Check if the transaction has been committed
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// The connection to run statements on inside this transaction
    ///
    /// ```text
    /// sqlx::query("INSERT INTO ...").execute(guard.executor()?).await?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already committed or rolled back
    pub fn executor(&mut self) -> AppResult<&mut <DB as Database>::Connection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit/rollback")
        })
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !self.committed {
            warn!(
                "TransactionGuard dropped without commit - transaction will be rolled back automatically"
            );
        }
    }
}

/// Type alias for `SQLite` transaction guard
pub type SqliteTransactionGuard<'c> = TransactionGuard<'c, sqlx::Sqlite>;
