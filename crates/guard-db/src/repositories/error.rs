//! Error handling utilities for repositories

use guard_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Error for a stored enum string that no longer parses.
/// Only reachable after a bad manual edit or a skipped migration.
pub fn corrupt_row(column: &str, value: &str) -> DomainError {
    DomainError::InternalError(format!("unreadable {column} value in row: {value}"))
}
