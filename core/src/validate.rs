//! Identifier and column-spec validation.
//!
//! Table and column names are the only user-controlled text that ends up
//! inside generated statements, so they are checked here before any SQL is
//! built. Names read back from a live schema are trusted and quoted with
//! [`quote_identifier`]; names typed by a user must pass
//! [`validate_identifier`].
//!
//! # Examples
//!
//! ```
//! use tabula_core::*;
//!
//! assert!(validate_identifier("orders_2024").is_ok());
//! assert!(validate_identifier("drop table x;--").is_err());
//! assert_eq!(quote_identifier("name"), "name");
//! assert_eq!(quote_identifier("order"), "\"order\"");
//! assert_eq!(quote_identifier("my \"col\""), "\"my \"\"col\"\"\"");
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ColumnSpec, DeclaredType};

/// Validation errors for names and column specs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name is empty or whitespace-only.
    #[error("name cannot be empty")]
    EmptyName,
    /// Name contains characters outside `[A-Za-z0-9_]` or starts with a digit.
    #[error("invalid name '{0}': use letters, digits and underscores, not starting with a digit")]
    InvalidIdentifier(String),
    /// Name is an SQL keyword.
    #[error("'{0}' is a reserved SQL keyword")]
    ReservedWord(String),
    /// Name uses the store's internal `sqlite_` prefix.
    #[error("names starting with 'sqlite_' are reserved")]
    ReservedPrefix(String),
    /// A table definition needs at least one column.
    #[error("a table needs at least one column")]
    NoColumns,
    /// Two columns share a name (names are case-insensitive).
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
    /// More than one column flagged as primary key.
    #[error("only one column can be the primary key")]
    MultiplePrimaryKeys,
    /// Default is not a literal the declared type accepts unquoted.
    #[error("invalid default for {column}: {value}")]
    InvalidDefault { column: String, value: String },
}

/// Keywords that cannot be used as bare identifiers.
const KEYWORDS: &[&str] = &[
    "ABORT", "ACTION", "ADD", "AFTER", "ALL", "ALTER", "ALWAYS", "ANALYZE", "AND", "AS", "ASC",
    "ATTACH", "AUTOINCREMENT", "BEFORE", "BEGIN", "BETWEEN", "BY", "CASCADE", "CASE", "CAST",
    "CHECK", "COLLATE", "COLUMN", "COMMIT", "CONFLICT", "CONSTRAINT", "CREATE", "CROSS",
    "CURRENT", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "DATABASE", "DEFAULT",
    "DEFERRABLE", "DEFERRED", "DELETE", "DESC", "DETACH", "DISTINCT", "DO", "DROP", "EACH",
    "ELSE", "END", "ESCAPE", "EXCEPT", "EXCLUDE", "EXCLUSIVE", "EXISTS", "EXPLAIN", "FAIL",
    "FILTER", "FIRST", "FOLLOWING", "FOR", "FOREIGN", "FROM", "FULL", "GENERATED", "GLOB",
    "GROUP", "GROUPS", "HAVING", "IF", "IGNORE", "IMMEDIATE", "IN", "INDEX", "INDEXED",
    "INITIALLY", "INNER", "INSERT", "INSTEAD", "INTERSECT", "INTO", "IS", "ISNULL", "JOIN",
    "KEY", "LAST", "LEFT", "LIKE", "LIMIT", "MATCH", "MATERIALIZED", "NATURAL", "NO", "NOT",
    "NOTHING", "NOTNULL", "NULL", "NULLS", "OF", "OFFSET", "ON", "OR", "ORDER", "OTHERS",
    "OUTER", "OVER", "PARTITION", "PLAN", "PRAGMA", "PRECEDING", "PRIMARY", "QUERY", "RAISE",
    "RANGE", "RECURSIVE", "REFERENCES", "REGEXP", "REINDEX", "RELEASE", "RENAME", "REPLACE",
    "RESTRICT", "RETURNING", "RIGHT", "ROLLBACK", "ROW", "ROWS", "SAVEPOINT", "SELECT", "SET",
    "TABLE", "TEMP", "TEMPORARY", "THEN", "TIES", "TO", "TRANSACTION", "TRIGGER", "UNBOUNDED",
    "UNION", "UNIQUE", "UPDATE", "USING", "VACUUM", "VALUES", "VIEW", "VIRTUAL", "WHEN",
    "WHERE", "WINDOW", "WITH", "WITHOUT",
];

/// Bare defaults accepted for types whose literals are not quoted.
const BARE_DEFAULT_KEYWORDS: &[&str] = &[
    "NULL",
    "TRUE",
    "FALSE",
    "CURRENT_TIME",
    "CURRENT_DATE",
    "CURRENT_TIMESTAMP",
];

fn has_identifier_shape(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_keyword(name: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(name))
}

/// Returns `true` if `name` can be written into SQL without quoting.
pub fn is_plain_identifier(name: &str) -> bool {
    has_identifier_shape(name) && !is_keyword(name)
}

/// Checks a user-supplied table or column name.
///
/// # Errors
///
/// Returns the first problem found: empty, bad characters, keyword, or
/// the reserved `sqlite_` prefix.
pub fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !has_identifier_shape(name) {
        return Err(ValidationError::InvalidIdentifier(name.to_string()));
    }
    if is_keyword(name) {
        return Err(ValidationError::ReservedWord(name.to_string()));
    }
    if name.to_ascii_lowercase().starts_with("sqlite_") {
        return Err(ValidationError::ReservedPrefix(name.to_string()));
    }
    Ok(())
}

/// Renders an identifier for statement text.
///
/// Plain identifiers are written bare; anything else is wrapped in double
/// quotes with embedded quotes doubled.
pub fn quote_identifier(name: &str) -> String {
    if is_plain_identifier(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Renders a text literal with single quotes doubled.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Checks a default literal against the column's type.
///
/// Quoted types accept any text. Other types accept numeric literals and a
/// handful of keywords, since their defaults are written without quotes.
pub fn validate_default(spec: &ColumnSpec) -> Result<(), ValidationError> {
    let Some(value) = &spec.default else {
        return Ok(());
    };
    if spec.declared_type.quotes_literals() {
        return Ok(());
    }
    let trimmed = value.trim();
    let numeric = match spec.declared_type {
        DeclaredType::Integer => trimmed.parse::<i64>().is_ok(),
        _ => trimmed.parse::<i64>().is_ok() || trimmed.parse::<f64>().is_ok_and(f64::is_finite),
    };
    let keyword = BARE_DEFAULT_KEYWORDS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(trimmed));
    if numeric || keyword {
        Ok(())
    } else {
        Err(ValidationError::InvalidDefault {
            column: spec.name.clone(),
            value: value.clone(),
        })
    }
}

/// Validates a full column list for `CREATE TABLE`.
///
/// # Examples
///
/// ```
/// use tabula_core::*;
///
/// let specs = vec![
///     ColumnSpec::new("id", DeclaredType::Integer).primary(),
///     ColumnSpec::new("ID", DeclaredType::Text),
/// ];
/// assert_eq!(
///     validate_column_specs(&specs),
///     Err(ValidationError::DuplicateColumn("ID".into()))
/// );
/// ```
pub fn validate_column_specs(specs: &[ColumnSpec]) -> Result<(), ValidationError> {
    if specs.is_empty() {
        return Err(ValidationError::NoColumns);
    }

    let mut seen = HashSet::new();
    let mut primary_keys = 0usize;
    for spec in specs {
        validate_identifier(&spec.name)?;
        if !seen.insert(spec.name.to_ascii_lowercase()) {
            return Err(ValidationError::DuplicateColumn(spec.name.clone()));
        }
        if spec.primary_key {
            primary_keys += 1;
        }
        validate_default(spec)?;
    }
    if primary_keys > 1 {
        return Err(ValidationError::MultiplePrimaryKeys);
    }
    Ok(())
}
