//! Row and table mutations.
//!
//! [`TableEditor`] executes the statements built by
//! [`builder`](crate::builder) against a connection in autocommit mode, so
//! each successful call is committed before it returns. Validation failures
//! surface as [`StoreError::BuildError`] and leave the store untouched.
//!
//! # Example
//!
//! ```
//! use rusqlite::Connection;
//! use tabula_core::{ColumnSpec, DeclaredType, RowRecord, Value};
//! use tabula_sqlite::{SchemaIntrospector, TableEditor, UpdateOutcome};
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let editor = TableEditor::new(&conn);
//! editor
//!     .create_table(
//!         "people",
//!         &[
//!             ColumnSpec::new("id", DeclaredType::Integer).primary(),
//!             ColumnSpec::new("name", DeclaredType::Text).not_null(),
//!         ],
//!     )
//!     .unwrap();
//!
//! let schema = SchemaIntrospector::new(&conn).describe_table("people").unwrap();
//! let id = editor.insert(&schema, &RowRecord::new().with("name", "ann")).unwrap();
//!
//! let outcome = editor
//!     .update(&schema, &Value::Integer(id), &RowRecord::new().with("name", "bob"))
//!     .unwrap();
//! assert_eq!(outcome, UpdateOutcome::Updated(1));
//! ```

use rusqlite::Connection;
use tabula_core::{ColumnDef, ColumnSpec, DeclaredType, RowRecord, TableSchema, Value};
use tracing::info;

use crate::builder::{
    build_add_column, build_create_table, build_delete, build_drop_table, build_insert,
    build_rename_table, build_select_by_key, build_truncate, build_update,
};
use crate::convert;
use crate::error::{BuildError, Result, StoreError};

/// Result of an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The statement ran; the count is the number of rows it changed.
    Updated(usize),
    /// Every field was blank, so no statement was issued.
    NoChanges,
}

/// Result of a truncate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncateOutcome {
    /// All rows were deleted; the count is how many.
    Truncated(usize),
    /// The confirmation text did not match, so nothing was deleted.
    NotConfirmed,
}

/// Interprets typed key text using the key column's affinity, so integer
/// keys compare as integers.
///
/// # Examples
///
/// ```
/// use tabula_core::{ColumnDef, DeclaredType, Value};
/// use tabula_sqlite::parse_key;
///
/// let id = ColumnDef::new("id", DeclaredType::Integer, 0).primary();
/// assert_eq!(parse_key(&id, " 42 "), Value::Integer(42));
///
/// let code = ColumnDef::new("code", DeclaredType::Text, 0).primary();
/// assert_eq!(parse_key(&code, "42"), Value::text("42"));
/// ```
pub fn parse_key(column: &ColumnDef, text: &str) -> Value {
    let trimmed = text.trim();
    match column.declared_type {
        DeclaredType::Integer => trimmed
            .parse::<i64>()
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::text(text)),
        DeclaredType::Real | DeclaredType::Numeric => trimmed
            .parse::<i64>()
            .map(Value::Integer)
            .or_else(|_| trimmed.parse::<f64>().map(Value::Real))
            .unwrap_or_else(|_| Value::text(text)),
        DeclaredType::Text | DeclaredType::Blob => Value::text(text),
    }
}

/// Executes inserts, edits, deletes, and table changes.
pub struct TableEditor<'a> {
    conn: &'a Connection,
}

impl<'a> TableEditor<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Creates a table from column specs.
    pub fn create_table(&self, name: &str, specs: &[ColumnSpec]) -> Result<()> {
        let statement = build_create_table(name, specs)?;
        convert::execute(self.conn, &statement)?;
        info!(table = name, columns = specs.len(), "created table");
        Ok(())
    }

    /// Inserts one row and returns its rowid.
    ///
    /// # Errors
    ///
    /// [`BuildError::MissingRequired`] (wrapped) if a required value is
    /// blank; database errors such as constraint violations.
    pub fn insert(&self, schema: &TableSchema, values: &RowRecord) -> Result<i64> {
        let statement = build_insert(schema, values)?;
        convert::execute(self.conn, &statement)?;
        let rowid = self.conn.last_insert_rowid();
        info!(table = %schema.name, rowid, "inserted row");
        Ok(rowid)
    }

    /// Loads the row whose primary key equals `key`.
    pub fn fetch(&self, schema: &TableSchema, key: &Value) -> Result<Option<RowRecord>> {
        let statement = build_select_by_key(schema, key)?;
        let result = convert::query(self.conn, &statement)?;
        Ok(result.records().into_iter().next())
    }

    /// Applies the non-blank values in `changes` to the row keyed by `key`.
    ///
    /// # Errors
    ///
    /// [`BuildError::NoPrimaryKey`] (wrapped) if the table has no primary
    /// key; database errors.
    pub fn update(
        &self,
        schema: &TableSchema,
        key: &Value,
        changes: &RowRecord,
    ) -> Result<UpdateOutcome> {
        let statement = match build_update(schema, key, changes) {
            Ok(statement) => statement,
            Err(BuildError::NoChanges) => return Ok(UpdateOutcome::NoChanges),
            Err(err) => return Err(err.into()),
        };
        let affected = convert::execute(self.conn, &statement)?;
        info!(table = %schema.name, affected, "updated row");
        Ok(UpdateOutcome::Updated(affected))
    }

    /// Deletes the row keyed by `key`; returns how many rows were removed.
    pub fn delete(&self, schema: &TableSchema, key: &Value) -> Result<usize> {
        let statement = build_delete(schema, key)?;
        let affected = convert::execute(self.conn, &statement)?;
        info!(table = %schema.name, affected, "deleted row");
        Ok(affected)
    }

    /// Deletes every row if `confirmation` equals `phrase` exactly.
    pub fn truncate(
        &self,
        schema: &TableSchema,
        confirmation: &str,
        phrase: &str,
    ) -> Result<TruncateOutcome> {
        let statement = match build_truncate(schema, confirmation, phrase) {
            Ok(statement) => statement,
            Err(BuildError::ConfirmationMismatch) => return Ok(TruncateOutcome::NotConfirmed),
            Err(err) => return Err(err.into()),
        };
        let affected = convert::execute(self.conn, &statement)?;
        info!(table = %schema.name, affected, "truncated table");
        Ok(TruncateOutcome::Truncated(affected))
    }

    /// Adds a column to an existing table.
    pub fn add_column(&self, schema: &TableSchema, spec: &ColumnSpec) -> Result<()> {
        let statement = build_add_column(schema, spec)?;
        convert::execute(self.conn, &statement)?;
        info!(table = %schema.name, column = %spec.name, "added column");
        Ok(())
    }

    /// Renames a table.
    pub fn rename_table(&self, schema: &TableSchema, new_name: &str) -> Result<()> {
        let statement = build_rename_table(schema, new_name)?;
        convert::execute(self.conn, &statement)?;
        info!(from = %schema.name, to = new_name, "renamed table");
        Ok(())
    }

    /// Drops a table if `confirmation` is exactly the table's name.
    ///
    /// # Errors
    ///
    /// [`BuildError::ConfirmationMismatch`] (wrapped) for any other text.
    pub fn drop_table(&self, schema: &TableSchema, confirmation: &str) -> Result<()> {
        if confirmation != schema.name {
            return Err(StoreError::BuildError(BuildError::ConfirmationMismatch));
        }
        convert::execute(self.conn, &build_drop_table(schema))?;
        info!(table = %schema.name, "dropped table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaIntrospector;

    fn setup() -> (Connection, TableSchema) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
CREATE TABLE people (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    nick TEXT NOT NULL DEFAULT 'anon',
    email TEXT UNIQUE
);
INSERT INTO people (name, email) VALUES ('ann', 'ann@x');
"#,
        )
        .unwrap();
        let schema = SchemaIntrospector::new(&conn)
            .describe_table("people")
            .unwrap();
        (conn, schema)
    }

    fn count(conn: &Connection) -> i64 {
        SchemaIntrospector::new(conn).count_rows("people").unwrap()
    }

    #[test]
    fn test_insert_applies_defaults() {
        let (conn, schema) = setup();
        let editor = TableEditor::new(&conn);
        let id = editor
            .insert(&schema, &RowRecord::new().with("name", "bob"))
            .unwrap();
        let row = editor.fetch(&schema, &Value::Integer(id)).unwrap().unwrap();
        assert_eq!(row.get("nick"), Some(&Value::text("anon")));
        assert_eq!(row.get("email"), Some(&Value::Null));
    }

    #[test]
    fn test_insert_constraint_violation_is_database_error() {
        let (conn, schema) = setup();
        let err = TableEditor::new(&conn)
            .insert(
                &schema,
                &RowRecord::new().with("name", "dup").with("email", "ann@x"),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DatabaseError(_)));
        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn test_update_blank_is_no_change() {
        let (conn, schema) = setup();
        let editor = TableEditor::new(&conn);
        let before = editor.fetch(&schema, &Value::Integer(1)).unwrap();
        let outcome = editor
            .update(
                &schema,
                &Value::Integer(1),
                &RowRecord::new().with("name", "").with("nick", ""),
            )
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NoChanges);
        assert_eq!(editor.fetch(&schema, &Value::Integer(1)).unwrap(), before);
    }

    #[test]
    fn test_update_missing_row_changes_nothing() {
        let (conn, schema) = setup();
        let outcome = TableEditor::new(&conn)
            .update(
                &schema,
                &Value::Integer(99),
                &RowRecord::new().with("name", "x"),
            )
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated(0));
    }

    #[test]
    fn test_delete_and_truncate() {
        let (conn, schema) = setup();
        let editor = TableEditor::new(&conn);
        editor
            .insert(&schema, &RowRecord::new().with("name", "bob"))
            .unwrap();
        assert_eq!(editor.delete(&schema, &Value::Integer(1)).unwrap(), 1);
        assert_eq!(count(&conn), 1);

        assert_eq!(
            editor.truncate(&schema, "yes", "DELETE ALL").unwrap(),
            TruncateOutcome::NotConfirmed
        );
        assert_eq!(count(&conn), 1);
        assert_eq!(
            editor.truncate(&schema, "DELETE ALL", "DELETE ALL").unwrap(),
            TruncateOutcome::Truncated(1)
        );
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn test_keyless_table_refuses_edit_and_delete() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE log (msg TEXT); INSERT INTO log VALUES ('a');")
            .unwrap();
        let schema = SchemaIntrospector::new(&conn).describe_table("log").unwrap();
        let editor = TableEditor::new(&conn);

        let err = editor
            .update(&schema, &Value::Integer(1), &RowRecord::new().with("msg", "b"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::BuildError(BuildError::NoPrimaryKey(_))
        ));
        let err = editor.delete(&schema, &Value::Integer(1)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::BuildError(BuildError::NoPrimaryKey(_))
        ));
        assert_eq!(SchemaIntrospector::new(&conn).count_rows("log").unwrap(), 1);
    }

    #[test]
    fn test_schema_changes() {
        let (conn, schema) = setup();
        let editor = TableEditor::new(&conn);
        editor
            .add_column(&schema, &ColumnSpec::new("age", DeclaredType::Integer))
            .unwrap();
        let schema = SchemaIntrospector::new(&conn)
            .describe_table("people")
            .unwrap();
        assert!(schema.has_column("age"));

        editor.rename_table(&schema, "persons").unwrap();
        let introspector = SchemaIntrospector::new(&conn);
        assert_eq!(introspector.list_tables().unwrap(), vec!["persons"]);

        let schema = introspector.describe_table("persons").unwrap();
        assert!(editor.drop_table(&schema, "people").is_err());
        editor.drop_table(&schema, "persons").unwrap();
        assert!(introspector.list_tables().unwrap().is_empty());
    }

    #[test]
    fn test_parse_key_for_real_columns() {
        let col = ColumnDef::new("k", DeclaredType::Real, 0).primary();
        assert_eq!(parse_key(&col, "1.5"), Value::Real(1.5));
        assert_eq!(parse_key(&col, "2"), Value::Integer(2));
        assert_eq!(parse_key(&col, "x"), Value::text("x"));
    }
}
