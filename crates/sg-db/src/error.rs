//! Error types for sg-db

use thiserror::Error;

/// Database and adapter errors.
///
/// Payloads are plain strings so the error can be cloned into every task
/// that awaits a failed row.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Model missing from the adapter's schema (D004)
    #[error("[D004] Model '{0}' is not known to this adapter")]
    UnknownModel(String),

    /// Insert did not give back an identity (D005)
    #[error("[D005] Insert into '{table}' returned no '{column}' value")]
    MissingIdentity { table: String, column: String },

    /// Association or payload shape the adapter cannot apply (D006)
    #[error("[D006] Cannot apply association '{association}': {reason}")]
    UnsupportedAssociation { association: String, reason: String },

    /// Mutex poisoned (D007)
    #[error("[D007] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Transaction statement failed (D008)
    #[error("[D008] Transaction failed: {0}")]
    TransactionError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error carries no structured variant for missing relations,
        // so the catalog message is the only signal.
        let msg = err.to_string();
        if msg.contains("Table with name")
            || (msg.contains("Catalog Error") && msg.contains("does not exist"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
