//! Conversion between [`Value`] and SQLite's native value types, plus the
//! small execution helpers every store-facing module shares.
//!
//! Statements built by [`builder`](crate::builder) carry their parameters as
//! [`Value`]s; these helpers bind them positionally and read result rows
//! back without coercing storage classes.

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use tabula_core::Value;
use tracing::debug;

use crate::builder::Statement;
use crate::error::Result;
use crate::query::ResultSet;

/// Converts a [`Value`] into an owned SQLite value for binding.
pub(crate) fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

/// Reads a column value, keeping the storage class the store reports.
pub(crate) fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

/// Executes a data-modifying statement and returns the affected row count.
///
/// Outside an explicit transaction SQLite commits immediately.
pub(crate) fn execute(conn: &Connection, statement: &Statement) -> Result<usize> {
    debug!(sql = %statement.sql, params = statement.params.len(), "executing statement");
    let affected = conn.execute(
        &statement.sql,
        params_from_iter(statement.params.iter().map(to_sql)),
    )?;
    Ok(affected)
}

/// Runs a row-returning statement and collects every row.
pub(crate) fn query(conn: &Connection, statement: &Statement) -> Result<ResultSet> {
    debug!(sql = %statement.sql, params = statement.params.len(), "running query");
    let mut stmt = conn.prepare(&statement.sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();

    let rows = stmt
        .query_map(
            params_from_iter(statement.params.iter().map(to_sql)),
            |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(from_sql))
                    .collect::<rusqlite::Result<Vec<_>>>()
            },
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ResultSet { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_classes_survive_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        let statement = Statement {
            sql: "SELECT ?1, ?2, ?3, ?4, ?5".to_string(),
            params: vec![
                Value::Null,
                Value::Integer(7),
                Value::Real(1.5),
                Value::text("hi"),
                Value::Blob(vec![1, 2]),
            ],
        };
        let result = query(&conn, &statement).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0], statement.params);
    }

    #[test]
    fn test_execute_reports_affected_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT); INSERT INTO t VALUES ('a'), ('b');")
            .unwrap();
        let statement = Statement {
            sql: "UPDATE t SET v = ?1".to_string(),
            params: vec![Value::text("z")],
        };
        assert_eq!(execute(&conn, &statement).unwrap(), 2);
    }
}
