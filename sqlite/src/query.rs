//! Searches and ad-hoc statements.
//!
//! [`QueryExecutor`] runs filtered searches built from a table's schema and
//! arbitrary statement text typed by the user. Free text is classified as a
//! read or a write by its leading keyword: reads return a [`ResultSet`],
//! writes are committed immediately and report the affected row count.
//!
//! # Example
//!
//! ```
//! use rusqlite::Connection;
//! use tabula_sqlite::{ExecOutcome, QueryExecutor};
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let executor = QueryExecutor::new(&conn);
//!
//! executor.execute("CREATE TABLE t (v INTEGER)", None).unwrap();
//! let outcome = executor.execute("INSERT INTO {table} VALUES (1), (2)", Some("t")).unwrap();
//! assert_eq!(outcome, ExecOutcome::Affected(2));
//!
//! match executor.execute("select count(*) from t", None).unwrap() {
//!     ExecOutcome::Rows(rows) => assert_eq!(rows.rows[0][0].cell_text(), "2"),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

use rusqlite::Connection;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::tokenizer::{Token, Tokenizer};
use tabula_core::{RowRecord, TableSchema, Value, quote_identifier};
use tracing::{debug, info};

use crate::builder::{Statement, build_filtered_select, build_page};
use crate::convert;
use crate::error::{Result, StoreError};

/// Placeholder replaced with the current table's name in free statements.
pub const TABLE_PLACEHOLDER: &str = "{table}";

/// Leading keywords that mark a statement as a read.
const READ_PREFIXES: [&str; 5] = ["SELECT", "WITH", "PRAGMA", "EXPLAIN", "VALUES"];

/// Column names and rows returned by a read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Rows as column-keyed records.
    pub fn records(&self) -> Vec<RowRecord> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// Outcome of a free-form statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// A read and the rows it returned.
    Rows(ResultSet),
    /// A write and the number of rows it changed.
    Affected(usize),
}

/// Returns `true` if the statement starts with a read keyword
/// (case-insensitive). Whitespace, comments and opening parentheses before
/// the keyword are skipped.
///
/// # Examples
///
/// ```
/// use tabula_sqlite::is_read_statement;
///
/// assert!(is_read_statement("  select 1"));
/// assert!(is_read_statement("WITH x AS (SELECT 1) SELECT * FROM x"));
/// assert!(is_read_statement("-- count\nSELECT 1"));
/// assert!(is_read_statement("/* x */ select 1"));
/// assert!(is_read_statement("(SELECT 1)"));
/// assert!(!is_read_statement("DELETE FROM t"));
/// assert!(!is_read_statement("selection"));
/// ```
pub fn is_read_statement(sql: &str) -> bool {
    leading_keyword(sql).is_some_and(|word| {
        READ_PREFIXES
            .iter()
            .any(|prefix| prefix.eq_ignore_ascii_case(&word))
    })
}

fn leading_keyword(sql: &str) -> Option<String> {
    let dialect = SQLiteDialect {};
    let Ok(tokens) = Tokenizer::new(&dialect, sql).tokenize() else {
        // Text the tokenizer rejects is left to SQLite; only its first word counts.
        return Some(
            sql.trim_start()
                .chars()
                .take_while(|c| c.is_ascii_alphabetic())
                .collect(),
        );
    };
    for token in tokens {
        match token {
            Token::Whitespace(_) | Token::LParen => continue,
            Token::Word(word) if word.quote_style.is_none() => return Some(word.value),
            _ => return None,
        }
    }
    None
}

/// Replaces every `{table}` with the quoted table name.
///
/// # Errors
///
/// [`StoreError::MissingTable`] if the placeholder is present and no table
/// is given.
pub fn substitute_table(sql: &str, table: Option<&str>) -> Result<String> {
    if !sql.contains(TABLE_PLACEHOLDER) {
        return Ok(sql.to_string());
    }
    match table {
        Some(table) => Ok(sql.replace(TABLE_PLACEHOLDER, &quote_identifier(table))),
        None => Err(StoreError::MissingTable),
    }
}

/// Runs searches and free-form statements.
pub struct QueryExecutor<'a> {
    conn: &'a Connection,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Runs `SELECT * FROM <table> WHERE <column> <expression>`.
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Build errors for an unknown column or malformed expression; database
    /// errors.
    pub fn search(&self, schema: &TableSchema, column: &str, expression: &str) -> Result<ResultSet> {
        let statement = build_filtered_select(schema, column, expression)?;
        let result = convert::query(self.conn, &statement)?;
        debug!(table = %schema.name, column, rows = result.len(), "search finished");
        Ok(result)
    }

    /// Reads one page of a table.
    pub fn page(&self, schema: &TableSchema, limit: usize, offset: usize) -> Result<ResultSet> {
        convert::query(self.conn, &build_page(schema, limit, offset))
    }

    /// Runs free statement text after `{table}` substitution.
    ///
    /// # Errors
    ///
    /// [`StoreError::MissingTable`] for a placeholder without a table;
    /// database errors for anything SQLite rejects.
    pub fn execute(&self, text: &str, table: Option<&str>) -> Result<ExecOutcome> {
        let sql = substitute_table(text.trim(), table)?;
        let statement = Statement {
            sql,
            params: Vec::new(),
        };
        if is_read_statement(&statement.sql) {
            let result = convert::query(self.conn, &statement)?;
            Ok(ExecOutcome::Rows(result))
        } else {
            let affected = convert::execute(self.conn, &statement)?;
            info!(affected, "statement executed");
            Ok(ExecOutcome::Affected(affected))
        }
    }
}
