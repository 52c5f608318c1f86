//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use sqlx::Error as SqlxError;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while acquiring or opening a connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Constraint violations reported by the database that callers may want to
/// surface as validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    Unique,
    ForeignKey,
    NotNull,
    Check,
}

impl DatabaseError {
    /// Returns the kind of constraint a failed query violated, if any.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        let DatabaseError::Query(SqlxError::Database(db_err)) = self else {
            return None;
        };

        match db_err.kind() {
            ErrorKind::UniqueViolation => Some(ConstraintViolation::Unique),
            ErrorKind::ForeignKeyViolation => Some(ConstraintViolation::ForeignKey),
            ErrorKind::NotNullViolation => Some(ConstraintViolation::NotNull),
            ErrorKind::CheckViolation => Some(ConstraintViolation::Check),
            _ => None,
        }
    }

    /// True when the error means the database could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, DatabaseError::Connection(_))
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::PoolTimedOut
            | SqlxError::PoolClosed
            | SqlxError::Io(_)
            | SqlxError::Tls(_)
            | SqlxError::WorkerCrashed => DatabaseError::Connection(err),
            other => DatabaseError::Query(other),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
