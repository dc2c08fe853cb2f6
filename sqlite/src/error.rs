//! Error types for store operations.
//!
//! [`BuildError`] covers everything that can be rejected before a statement
//! exists; it is cheap to clone and compare, so callers can branch on it.
//! [`StoreError`] wraps it together with database, file, and import
//! failures.

use tabula_core::ValidationError;
use thiserror::Error;

/// Reasons a statement could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A name or column spec failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A column named by the caller does not exist in the table.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A not-null column without a default was left empty.
    #[error("a value is required for column '{0}'")]
    MissingRequired(String),

    /// The table has no primary key, so rows cannot be addressed.
    #[error("table '{0}' has no primary key; rows cannot be edited or deleted")]
    NoPrimaryKey(String),

    /// An edit left every field blank.
    #[error("no changes to apply")]
    NoChanges,

    /// The confirmation text did not match the required phrase.
    #[error("confirmation text did not match")]
    ConfirmationMismatch,

    /// A filter expression could not be parsed.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// An imported row has a different number of fields than the table.
    #[error("expected {expected} field(s), found {found}")]
    ColumnCountMismatch { expected: usize, found: usize },

    /// SQLite cannot apply this change with `ALTER TABLE`.
    #[error("unsupported column change: {0}")]
    UnsupportedAlter(String),
}

/// Errors that can occur while talking to the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite reported a failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// The statement was rejected before execution.
    #[error("{0}")]
    BuildError(#[from] BuildError),

    /// The table does not exist (it may have been dropped).
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// A statement used the `{table}` placeholder with no table selected.
    #[error("statement uses {{table}} but no table is selected")]
    MissingTable,

    /// File I/O failure during import or export.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV reading or writing failure.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The import file has no header row.
    #[error("import file has no header row")]
    MissingHeader,

    /// A row failed during import; nothing was committed.
    #[error("import failed at line {line}: {message}")]
    ImportRow { line: u64, message: String },
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        Self::BuildError(BuildError::Invalid(err))
    }
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
