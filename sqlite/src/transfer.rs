//! Bulk row transfer between tables and files.
//!
//! Export writes every row of a table, columns in storage order, as CSV,
//! JSON, or a Markdown pipe table. Import reads CSV into a table inside one
//! transaction: the first row that fails rolls the whole file back.
//!
//! # Example
//!
//! ```
//! use rusqlite::Connection;
//! use tabula_sqlite::{ExportFormat, SchemaIntrospector, Transfer};
//!
//! let conn = Connection::open_in_memory().unwrap();
//! conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);
//!                     INSERT INTO t (name) VALUES ('ann'), (NULL);").unwrap();
//! let schema = SchemaIntrospector::new(&conn).describe_table("t").unwrap();
//!
//! let mut out = Vec::new();
//! let rows = Transfer::new(&conn).export(&schema, ExportFormat::Csv, &mut out).unwrap();
//! assert_eq!(rows, 2);
//! assert_eq!(String::from_utf8(out).unwrap(), "id,name\n1,ann\n2,\n");
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use rusqlite::Connection;
use tabula_core::TableSchema;
use tracing::{info, warn};

use crate::builder::{build_import_insert, build_select_all};
use crate::convert;
use crate::error::{Result, StoreError};
use crate::query::ResultSet;

/// File formats supported by export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Markdown];

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Markdown => "Markdown",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Summary of a committed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows inserted.
    pub rows: usize,
}

/// Writes a result set as CSV: a header row, then one record per row.
/// `NULL` becomes an empty field.
pub fn write_csv<W: Write>(result: &ResultSet, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&result.columns)?;
    for row in &result.rows {
        csv.write_record(row.iter().map(|value| value.cell_text()))?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes a result set as a JSON array of objects keyed by column name.
/// Numbers stay numbers, `NULL` becomes `null`.
pub fn write_json<W: Write>(result: &ResultSet, mut writer: W) -> Result<()> {
    let records: Vec<serde_json::Value> = result.records().iter().map(|r| r.to_json()).collect();
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writeln!(writer)?;
    Ok(())
}

fn markdown_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

/// Writes a result set as a GitHub-style pipe table.
pub fn write_markdown<W: Write>(result: &ResultSet, mut writer: W) -> Result<()> {
    let header: Vec<String> = result.columns.iter().map(|c| markdown_cell(c)).collect();
    writeln!(writer, "| {} |", header.join(" | "))?;
    let rule: Vec<&str> = result.columns.iter().map(|_| "---").collect();
    writeln!(writer, "| {} |", rule.join(" | "))?;
    for row in &result.rows {
        let cells: Vec<String> = row.iter().map(|v| markdown_cell(&v.cell_text())).collect();
        writeln!(writer, "| {} |", cells.join(" | "))?;
    }
    writer.flush()?;
    Ok(())
}

/// Moves whole tables to and from files.
pub struct Transfer<'a> {
    conn: &'a Connection,
}

impl<'a> Transfer<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Writes every row of the table; returns the row count.
    pub fn export<W: Write>(
        &self,
        schema: &TableSchema,
        format: ExportFormat,
        writer: W,
    ) -> Result<usize> {
        let result = convert::query(self.conn, &build_select_all(schema))?;
        match format {
            ExportFormat::Csv => write_csv(&result, writer)?,
            ExportFormat::Json => write_json(&result, writer)?,
            ExportFormat::Markdown => write_markdown(&result, writer)?,
        }
        info!(table = %schema.name, %format, rows = result.len(), "exported table");
        Ok(result.len())
    }

    /// Exports to a file, creating or replacing it.
    pub fn export_to_path(
        &self,
        schema: &TableSchema,
        format: ExportFormat,
        path: impl AsRef<Path>,
    ) -> Result<usize> {
        let file = File::create(path)?;
        self.export(schema, format, BufWriter::new(file))
    }

    /// Imports CSV rows into the table.
    ///
    /// The header row is required and must have one field per column; after
    /// that, fields map positionally onto the table's columns. All rows are
    /// inserted in one transaction.
    ///
    /// # Errors
    ///
    /// [`StoreError::MissingHeader`] for an empty file, and
    /// [`StoreError::ImportRow`] naming the 1-based file line of the first
    /// row that could not be read or inserted. Nothing is committed on
    /// error.
    pub fn import_csv<R: Read>(&self, schema: &TableSchema, reader: R) -> Result<ImportReport> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        if headers.is_empty() {
            return Err(StoreError::MissingHeader);
        }
        if headers.len() != schema.len() {
            return Err(StoreError::ImportRow {
                line: 1,
                message: format!(
                    "header has {} field(s), table '{}' has {} column(s)",
                    headers.len(),
                    schema.name,
                    schema.len()
                ),
            });
        }
        let names = schema.column_names();
        if !headers.iter().eq(names.iter().copied()) {
            warn!(
                table = %schema.name,
                "import header names differ from the table; fields are matched by position"
            );
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut rows = 0usize;
        for (index, record) in csv.records().enumerate() {
            let fallback_line = index as u64 + 2;
            let record = record.map_err(|err| StoreError::ImportRow {
                line: err.position().map_or(fallback_line, |p| p.line()),
                message: err.to_string(),
            })?;
            let line = record.position().map_or(fallback_line, |p| p.line());

            let fields: Vec<&str> = record.iter().collect();
            let statement =
                build_import_insert(schema, &fields).map_err(|err| StoreError::ImportRow {
                    line,
                    message: err.to_string(),
                })?;
            convert::execute(&tx, &statement).map_err(|err| StoreError::ImportRow {
                line,
                message: err.to_string(),
            })?;
            rows += 1;
        }
        tx.commit()?;

        info!(table = %schema.name, rows, "imported CSV");
        Ok(ImportReport { rows })
    }

    /// Imports from a CSV file.
    pub fn import_csv_path(
        &self,
        schema: &TableSchema,
        path: impl AsRef<Path>,
    ) -> Result<ImportReport> {
        let file = File::open(path)?;
        self.import_csv(schema, BufReader::new(file))
    }
}
