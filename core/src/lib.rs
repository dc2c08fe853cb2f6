//! Core table model for the tabula console.
//!
//! This crate defines the types every other part of the console agrees on:
//!
//! - [`Value`]: a tagged SQLite scalar (null, integer, real, text, blob).
//! - [`ColumnDef`] / [`TableSchema`]: a table's columns as read back from
//!   the store, in storage order.
//! - [`ColumnSpec`]: a column a user asks to create.
//! - [`RowRecord`]: an ordered column → value mapping used by inserts,
//!   edits, query results, and file transfer.
//!
//! Validation ([`validate_identifier`], [`validate_column_specs`]) guards
//! the only user text that is ever written into statement text: table and
//! column names, and unquoted default literals.
//!
//! # Example
//!
//! ```
//! use tabula_core::*;
//!
//! let specs = vec![
//!     ColumnSpec::new("id", DeclaredType::Integer).primary(),
//!     ColumnSpec::new("name", DeclaredType::Text).not_null().with_default("anon"),
//! ];
//! assert!(validate_column_specs(&specs).is_ok());
//!
//! let row = RowRecord::new().with("name", "ann");
//! assert_eq!(row.get("name"), Some(&Value::text("ann")));
//! ```

mod types;
mod validate;
mod value;

pub use types::*;
pub use validate::{
    ValidationError, is_plain_identifier, quote_identifier, quote_literal, validate_column_specs,
    validate_default, validate_identifier,
};
pub use value::Value;
