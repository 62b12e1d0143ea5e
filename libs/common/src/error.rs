//! Custom error types for the common library
//!
//! This module defines the error types raised by the data layer and shared
//! by every service that talks to the database.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
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

impl DatabaseError {
    /// The underlying failure message, without the category prefix.
    ///
    /// This is what gets echoed back to API callers on handlers that expose
    /// the driver message.
    pub fn message(&self) -> String {
        match self {
            DatabaseError::Connection(e) | DatabaseError::Query(e) => e.to_string(),
            DatabaseError::Migration(msg) | DatabaseError::Configuration(msg) => msg.clone(),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_strips_category() {
        let err = DatabaseError::Query(SqlxError::PoolTimedOut);
        assert!(err.to_string().starts_with("Database query error: "));
        assert_eq!(err.message(), SqlxError::PoolTimedOut.to_string());

        let err = DatabaseError::Configuration("bad url".to_string());
        assert_eq!(err.message(), "bad url");
    }
}
