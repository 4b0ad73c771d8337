// ABOUTME: Structured error types for database operations
// ABOUTME: Classifies sqlx failures into constraint, busy and query errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

use super::{AppError, ErrorCode};
use sqlx::error::ErrorKind;
use thiserror::Error;

/// `SQLite` primary result codes that mean "try again later"
const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;

/// Database failures, classified by what the caller can do about them
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A UNIQUE constraint rejected the write
    #[error("unique constraint violated: {message}")]
    UniqueViolation {
        /// Driver message, names the offending column
        message: String,
    },

    /// A FOREIGN KEY constraint rejected the write
    #[error("foreign key constraint violated: {message}")]
    ForeignKeyViolation {
        /// Driver message
        message: String,
    },

    /// A CHECK or NOT NULL constraint rejected the write
    #[error("check constraint violated: {message}")]
    CheckViolation {
        /// Driver message
        message: String,
    },

    /// The database is locked or busy; the transaction can be retried
    #[error("database is locked: {message}")]
    Busy {
        /// Driver message
        message: String,
    },

    /// A query that expected a row returned none
    #[error("row not found")]
    RowNotFound,

    /// Pool exhausted or closed
    #[error("connection pool error: {0}")]
    Pool(String),

    /// Anything else
    #[error("query failed: {0}")]
    Query(String),
}

impl DatabaseError {
    /// Whether retrying the whole transaction may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    /// Whether this is a unique key collision
    #[must_use]
    pub const fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

fn is_busy_code(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i64>().ok())
        .is_some_and(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::RowNotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => Self::Pool(error.to_string()),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_owned();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => Self::UniqueViolation { message },
                    ErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation { message },
                    ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                        Self::CheckViolation { message }
                    }
                    _ if is_busy_code(db_err.code().as_deref())
                        || message.contains("database is locked") =>
                    {
                        Self::Busy { message }
                    }
                    _ => Self::Query(message),
                }
            }
            other => Self::Query(other.to_string()),
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        let code = match &error {
            DatabaseError::UniqueViolation { .. } => ErrorCode::ResourceAlreadyExists,
            DatabaseError::RowNotFound => ErrorCode::ResourceNotFound,
            DatabaseError::Busy { .. } | DatabaseError::Pool(_) => ErrorCode::ResourceUnavailable,
            DatabaseError::ForeignKeyViolation { .. }
            | DatabaseError::CheckViolation { .. }
            | DatabaseError::Query(_) => ErrorCode::DatabaseError,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(error).into()
    }
}
