//! # Database Error Types
//!
//! Error types for persistence and bulk-transfer operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                            │
//! │                                                                 │
//! │  SQLite Error (sqlx::Error)      file/CSV/JSON failures         │
//! │       │                               │                         │
//! │       ▼                               ▼                         │
//! │  DbError (this module) ← adds context and categorisation        │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  Caller: operation succeeded, or failed with ONE typed error    │
//! │  and no partial state (transactions roll back on the way out)   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Database and transfer operation errors.
///
/// Taxonomy: `NotFound` (a referenced entity does not exist),
/// `UniqueViolation`/`ForeignKeyViolation` (store constraint errors),
/// `Io`/`Csv`/`Json` (bulk-transfer file failures) and `Validation`
/// (entity invariant violations detected before any write).
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in the database.
    ///
    /// ## When This Occurs
    /// - An order item references a product id that does not exist
    /// - An update/delete matched zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (e.g. duplicate product SKU).
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting an order for a missing customer id
    /// - Importing items whose order/product rows are absent
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Entity validation failed before anything was written.
    #[error("Validation error: {0}")]
    Validation(#[from] shoplite_core::ValidationError),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// File I/O failure during bulk transfer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write failure during bulk transfer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON read/write failure during bulk transfer.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → analyse message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE: "UNIQUE constraint failed: <table>.<column>"
                // FK:     "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
