//! Runtime catalog lookups.
//!
//! [`SchemaIntrospector`] is the only component that reads table metadata.
//! Everything else works from the [`TableSchema`] it returns, which callers
//! fetch once per screen and re-fetch after a schema change.
//!
//! Catalog queries use SQLite's table-valued pragma functions so the table
//! name is bound as a parameter rather than written into the statement.

use rusqlite::{Connection, OptionalExtension, params};
use tabula_core::{ColumnDef, DeclaredType, IndexInfo, TableSchema, quote_identifier};

use crate::error::{Result, StoreError};

/// Reads table, column, and index metadata from a store.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use tabula_sqlite::SchemaIntrospector;
///
/// let conn = Connection::open_in_memory().unwrap();
/// conn.execute_batch("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT NOT NULL)").unwrap();
///
/// let introspector = SchemaIntrospector::new(&conn);
/// assert_eq!(introspector.list_tables().unwrap(), vec!["people"]);
///
/// let schema = introspector.describe_table("people").unwrap();
/// assert_eq!(schema.primary_key().unwrap().name, "id");
/// assert!(schema.column("name").unwrap().not_null);
/// ```
pub struct SchemaIntrospector<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaIntrospector<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Lists user tables in catalog order, which is normally creation order.
    ///
    /// Internal `sqlite_` tables are excluded.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Returns `true` if a table with this exact name exists.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn ensure_exists(&self, name: &str) -> Result<()> {
        if self.table_exists(name)? {
            Ok(())
        } else {
            Err(StoreError::TableNotFound(name.to_string()))
        }
    }

    /// Reads a table's columns in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`] if the table no longer exists.
    pub fn describe_table(&self, name: &str) -> Result<TableSchema> {
        self.ensure_exists(name)?;

        let mut stmt = self.conn.prepare(
            "SELECT cid, name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1)",
        )?;
        let mut columns = stmt
            .query_map(params![name], |row| {
                let ordinal: i64 = row.get(0)?;
                let raw_type: String = row.get::<_, Option<String>>(2)?.unwrap_or_default();
                Ok(ColumnDef {
                    name: row.get(1)?,
                    declared_type: DeclaredType::from_declared(&raw_type),
                    raw_type,
                    primary_key: row.get::<_, i64>(5)? > 0,
                    not_null: row.get::<_, i64>(3)? != 0,
                    unique: false,
                    default: row.get(4)?,
                    ordinal: usize::try_from(ordinal).unwrap_or_default(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for column_name in self.single_column_unique_indexes(name)? {
            if let Some(column) = columns.iter_mut().find(|c| c.name == column_name) {
                column.unique = true;
            }
        }

        Ok(TableSchema::new(name, columns))
    }

    /// Names of columns covered on their own by a unique index.
    fn single_column_unique_indexes(&self, table: &str) -> Result<Vec<String>> {
        let mut covered = Vec::new();
        let mut info = self
            .conn
            .prepare("SELECT name FROM pragma_index_info(?1)")?;
        for index in self.list_indexes(table)? {
            if !index.unique {
                continue;
            }
            let columns = info
                .query_map(params![index.name], |row| row.get::<_, Option<String>>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            if let [Some(column)] = columns.as_slice() {
                covered.push(column.clone());
            }
        }
        Ok(covered)
    }

    /// Lists a table's indexes, including the automatic ones SQLite creates
    /// for `UNIQUE` and non-rowid `PRIMARY KEY` constraints.
    pub fn list_indexes(&self, name: &str) -> Result<Vec<IndexInfo>> {
        self.ensure_exists(name)?;
        let mut stmt = self
            .conn
            .prepare("SELECT name, \"unique\" FROM pragma_index_list(?1)")?;
        let indexes = stmt
            .query_map(params![name], |row| {
                Ok(IndexInfo {
                    name: row.get(0)?,
                    unique: row.get::<_, i64>(1)? != 0,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(indexes)
    }

    /// Counts the rows in a table.
    pub fn count_rows(&self, name: &str) -> Result<i64> {
        self.ensure_exists(name)?;
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(name)),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// The `CREATE TABLE` text stored in the catalog.
    pub fn table_sql(&self, name: &str) -> Result<String> {
        let sql: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        match sql {
            Some(text) => Ok(text.unwrap_or_default()),
            None => Err(StoreError::TableNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
CREATE TABLE people (
    id INTEGER PRIMARY KEY,
    email VARCHAR(80) NOT NULL UNIQUE,
    name TEXT DEFAULT 'anon',
    score DOUBLE,
    pair_a TEXT,
    pair_b TEXT,
    UNIQUE (pair_a, pair_b)
);
CREATE INDEX idx_people_name ON people(name);
CREATE TABLE notes (body TEXT);
INSERT INTO people (email) VALUES ('a@x'), ('b@x');
"#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_list_tables_in_creation_order() {
        let conn = store();
        let tables = SchemaIntrospector::new(&conn).list_tables().unwrap();
        assert_eq!(tables, vec!["people", "notes"]);
    }

    #[test]
    fn test_list_tables_skips_internal_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, v TEXT)")
            .unwrap();
        // AUTOINCREMENT creates sqlite_sequence.
        let tables = SchemaIntrospector::new(&conn).list_tables().unwrap();
        assert_eq!(tables, vec!["t"]);
    }

    #[test]
    fn test_describe_reads_constraints() {
        let conn = store();
        let schema = SchemaIntrospector::new(&conn)
            .describe_table("people")
            .unwrap();

        assert_eq!(
            schema.column_names(),
            vec!["id", "email", "name", "score", "pair_a", "pair_b"]
        );
        let id = schema.column("id").unwrap();
        assert!(id.primary_key);
        assert!(id.is_auto_key());

        let email = schema.column("email").unwrap();
        assert_eq!(email.declared_type, DeclaredType::Text);
        assert_eq!(email.raw_type, "VARCHAR(80)");
        assert!(email.not_null);
        assert!(email.unique);

        let name = schema.column("name").unwrap();
        assert_eq!(name.default.as_deref(), Some("'anon'"));
        assert!(!name.unique);

        assert_eq!(schema.column("score").unwrap().declared_type, DeclaredType::Real);
        // Composite unique constraints do not make either column unique.
        assert!(!schema.column("pair_a").unwrap().unique);
        assert_eq!(schema.column("pair_b").unwrap().ordinal, 5);
    }

    #[test]
    fn test_describe_missing_table() {
        let conn = store();
        let err = SchemaIntrospector::new(&conn)
            .describe_table("gone")
            .unwrap_err();
        assert!(matches!(err, StoreError::TableNotFound(name) if name == "gone"));
    }

    #[test]
    fn test_count_rows_and_indexes() {
        let conn = store();
        let introspector = SchemaIntrospector::new(&conn);
        assert_eq!(introspector.count_rows("people").unwrap(), 2);
        assert_eq!(introspector.count_rows("notes").unwrap(), 0);

        let indexes = introspector.list_indexes("people").unwrap();
        let named = indexes
            .iter()
            .find(|i| i.name == "idx_people_name")
            .unwrap();
        assert!(!named.unique);
        assert!(indexes.iter().filter(|i| i.unique).count() >= 2);
    }

    #[test]
    fn test_table_sql() {
        let conn = store();
        let sql = SchemaIntrospector::new(&conn).table_sql("notes").unwrap();
        assert_eq!(sql, "CREATE TABLE notes (body TEXT)");
        assert!(SchemaIntrospector::new(&conn).table_sql("nope").is_err());
    }

    #[test]
    fn test_quoted_table_names() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE \"odd name\" (v TEXT); INSERT INTO \"odd name\" VALUES ('x');")
            .unwrap();
        let introspector = SchemaIntrospector::new(&conn);
        assert_eq!(introspector.count_rows("odd name").unwrap(), 1);
        assert_eq!(introspector.describe_table("odd name").unwrap().len(), 1);
    }
}
