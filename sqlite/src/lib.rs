//! Schema-driven statement building and execution for SQLite stores.
//!
//! This crate is the engine behind the tabula console. It reads a table's
//! column metadata at runtime and, from that alone, builds and runs the
//! statements the console needs, so no table requires hand-written SQL.
//!
//! # Architecture
//!
//! - **`introspect`**: [`SchemaIntrospector`] for tables, columns, indexes,
//!   row counts
//! - **`builder`**: pure statement construction (`CREATE TABLE`, `INSERT`,
//!   `UPDATE`, `DELETE`, filtered `SELECT`, ...) with bound parameters
//! - **`editor`**: [`TableEditor`] for inserts, edits, deletes, truncation,
//!   and table changes in autocommit mode
//! - **`query`**: [`QueryExecutor`] for filtered searches and free statements
//! - **`transfer`**: [`Transfer`] for CSV/JSON/Markdown export, atomic CSV
//!   import
//! - **`store`**: opening (and creating) the store file
//!
//! # Quick start
//!
//! ```
//! use rusqlite::Connection;
//! use tabula_core::{ColumnSpec, DeclaredType, RowRecord};
//! use tabula_sqlite::{QueryExecutor, SchemaIntrospector, TableEditor};
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let editor = TableEditor::new(&conn);
//! editor
//!     .create_table("books", &[
//!         ColumnSpec::new("id", DeclaredType::Integer).primary(),
//!         ColumnSpec::new("title", DeclaredType::Text).not_null(),
//!         ColumnSpec::new("year", DeclaredType::Integer),
//!     ])
//!     .unwrap();
//!
//! let schema = SchemaIntrospector::new(&conn).describe_table("books").unwrap();
//! editor
//!     .insert(&schema, &RowRecord::new().with("title", "Dune").with("year", "1965"))
//!     .unwrap();
//!
//! let found = QueryExecutor::new(&conn).search(&schema, "year", "< 1970").unwrap();
//! assert_eq!(found.len(), 1);
//! ```
//!
//! # Safety of generated SQL
//!
//! Row values and filter operands are always bound as positional
//! parameters. Table and column names come either from the live schema or
//! from validated user input, and are quoted when they are not plain
//! identifiers.

pub mod builder;
mod convert;
mod editor;
mod error;
mod introspect;
mod query;
mod store;
mod transfer;

pub use builder::{Filter, Statement};
pub use editor::{TableEditor, TruncateOutcome, UpdateOutcome, parse_key};
pub use error::{BuildError, Result, StoreError};
pub use introspect::SchemaIntrospector;
pub use query::{
    ExecOutcome, QueryExecutor, ResultSet, TABLE_PLACEHOLDER, is_read_statement,
    substitute_table,
};
pub use store::{open_store, store_path};
pub use transfer::{
    ExportFormat, ImportReport, Transfer, write_csv, write_json, write_markdown,
};
