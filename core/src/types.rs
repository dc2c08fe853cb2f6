//! Table and column model.
//!
//! These types describe what the console knows about a table at runtime:
//! the columns read back from the store ([`ColumnDef`], [`TableSchema`]),
//! the columns a user asks to create ([`ColumnSpec`]), and the rows moved
//! between prompts, statements, and files ([`RowRecord`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Value;

/// Declared column type, reduced to SQLite's five affinities.
///
/// # Examples
///
/// ```
/// use tabula_core::DeclaredType;
///
/// assert_eq!(DeclaredType::from_declared("VARCHAR(40)"), DeclaredType::Text);
/// assert_eq!(DeclaredType::from_declared("BIGINT"), DeclaredType::Integer);
/// assert_eq!(DeclaredType::from_declared("DOUBLE PRECISION"), DeclaredType::Real);
/// assert_eq!(DeclaredType::from_declared(""), DeclaredType::Blob);
/// assert_eq!(DeclaredType::from_declared("DECIMAL(10,2)"), DeclaredType::Numeric);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclaredType {
    Integer,
    Text,
    Real,
    Blob,
    Numeric,
}

impl DeclaredType {
    /// Every type, in the order offered to users.
    pub const ALL: [DeclaredType; 5] = [
        DeclaredType::Integer,
        DeclaredType::Text,
        DeclaredType::Real,
        DeclaredType::Blob,
        DeclaredType::Numeric,
    ];

    /// Maps declared type text to an affinity using SQLite's rules, which
    /// are checked in this order: `INT`, then `CHAR`/`CLOB`/`TEXT`, then
    /// `BLOB` or no type, then `REAL`/`FLOA`/`DOUB`, else `NUMERIC`.
    pub fn from_declared(raw: &str) -> Self {
        let upper = raw.to_ascii_uppercase();
        if upper.contains("INT") {
            Self::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            Self::Text
        } else if upper.contains("BLOB") || upper.trim().is_empty() {
            Self::Blob
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            Self::Real
        } else {
            Self::Numeric
        }
    }

    /// SQL keyword for this type.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
            Self::Blob => "BLOB",
            Self::Numeric => "NUMERIC",
        }
    }

    /// Whether default literals of this type are written as quoted strings.
    pub fn quotes_literals(&self) -> bool {
        matches!(self, Self::Text | Self::Blob)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for DeclaredType {
    type Err = String;

    /// Parses one of the five exact type keywords (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_sql().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown column type: {s}"))
    }
}

/// A column as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Affinity derived from the declared type text.
    pub declared_type: DeclaredType,
    /// Declared type text exactly as written in the table definition.
    pub raw_type: String,
    /// Part of the primary key.
    pub primary_key: bool,
    /// Declared `NOT NULL`.
    pub not_null: bool,
    /// Covered by a single-column unique index or constraint.
    pub unique: bool,
    /// Default expression text as stored in the catalog.
    pub default: Option<String>,
    /// Zero-based storage position.
    pub ordinal: usize,
}

impl ColumnDef {
    /// Creates a plain nullable column at `ordinal`.
    pub fn new(name: impl Into<String>, declared_type: DeclaredType, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            declared_type,
            raw_type: declared_type.as_sql().to_string(),
            primary_key: false,
            not_null: false,
            unique: false,
            default: None,
            ordinal,
        }
    }

    /// Marks the column as the primary key.
    pub fn primary(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column `NOT NULL`.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Marks the column unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the default expression text.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// An `INTEGER` primary key is a rowid alias and gets its value from
    /// the store, so inserts leave it out.
    pub fn is_auto_key(&self) -> bool {
        self.primary_key && self.declared_type == DeclaredType::Integer
    }

    /// Effective not-null: primary keys are always treated as not null.
    pub fn is_not_null(&self) -> bool {
        self.not_null || self.primary_key
    }

    /// Effective uniqueness: primary keys are always unique.
    pub fn is_unique(&self) -> bool {
        self.unique || self.primary_key
    }

    /// A value must be supplied: not null and nothing to fall back on.
    pub fn is_required(&self) -> bool {
        self.is_not_null() && self.default.is_none() && !self.is_auto_key()
    }

    /// Short constraint summary used in prompts and schema listings,
    /// e.g. `TEXT NOT NULL DEFAULT 'anon'`.
    pub fn describe(&self) -> String {
        let mut out = self.raw_type.clone();
        if out.is_empty() {
            out.push_str(self.declared_type.as_sql());
        }
        if self.primary_key {
            out.push_str(" PRIMARY KEY");
        } else {
            if self.not_null {
                out.push_str(" NOT NULL");
            }
            if self.unique {
                out.push_str(" UNIQUE");
            }
        }
        if let Some(default) = &self.default {
            out.push_str(" DEFAULT ");
            out.push_str(default);
        }
        out
    }
}

/// A column requested by the user for `CREATE TABLE` or `ADD COLUMN`.
///
/// # Examples
///
/// ```
/// use tabula_core::{ColumnSpec, DeclaredType};
///
/// let name = ColumnSpec::new("name", DeclaredType::Text)
///     .not_null()
///     .with_default("anon");
/// assert!(name.not_null);
/// assert_eq!(name.default.as_deref(), Some("anon"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub declared_type: DeclaredType,
    pub primary_key: bool,
    pub not_null: bool,
    pub unique: bool,
    /// Unquoted default literal; quoting is decided by the type.
    pub default: Option<String>,
}

impl ColumnSpec {
    /// Creates a plain nullable column spec.
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            primary_key: false,
            not_null: false,
            unique: false,
            default: None,
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A table name with its columns in storage order.
///
/// # Examples
///
/// ```
/// use tabula_core::{ColumnDef, DeclaredType, TableSchema};
///
/// let schema = TableSchema::new(
///     "people",
///     vec![
///         ColumnDef::new("id", DeclaredType::Integer, 0).primary(),
///         ColumnDef::new("name", DeclaredType::Text, 1).not_null(),
///     ],
/// );
/// assert_eq!(schema.primary_key().unwrap().name, "id");
/// assert_eq!(schema.column_names(), vec!["id", "name"]);
/// assert!(schema.column("missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Creates a schema, ordering columns by ordinal.
    pub fn new(name: impl Into<String>, mut columns: Vec<ColumnDef>) -> Self {
        columns.sort_by_key(|c| c.ordinal);
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns `true` if the table has a column with this exact name.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// First column flagged as primary key, in storage order.
    ///
    /// Composite keys are not addressed: only this first column is used.
    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Column names in storage order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// An index attached to a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    pub name: String,
    pub unique: bool,
}

/// Ordered column-name → value mapping.
///
/// Used uniformly for insert intents, edit intents, query results, and
/// import/export rows. Setting an existing column replaces its value in
/// place, so insertion order is the order columns were first set.
///
/// # Examples
///
/// ```
/// use tabula_core::{RowRecord, Value};
///
/// let mut row = RowRecord::new().with("id", 1i64).with("name", "ann");
/// row.set("name", "bob");
/// assert_eq!(row.get("name"), Some(&Value::text("bob")));
/// assert_eq!(row.columns(), vec!["id", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowRecord {
    entries: Vec<(String, Value)>,
}

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a column's value, replacing any previous value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Value for a column, if set.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts to a JSON object whose keys keep column order.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RowRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RowRecord::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affinity_rules_check_int_first() {
        // "POINT" contains "INT", so SQLite gives it INTEGER affinity.
        assert_eq!(DeclaredType::from_declared("POINT"), DeclaredType::Integer);
        assert_eq!(DeclaredType::from_declared("CHARINT"), DeclaredType::Integer);
        assert_eq!(DeclaredType::from_declared("clob"), DeclaredType::Text);
        assert_eq!(DeclaredType::from_declared("FLOATING"), DeclaredType::Real);
        assert_eq!(DeclaredType::from_declared("BOOLEAN"), DeclaredType::Numeric);
    }

    #[test]
    fn test_declared_type_from_str() {
        assert_eq!("text".parse::<DeclaredType>(), Ok(DeclaredType::Text));
        assert_eq!(" REAL ".parse::<DeclaredType>(), Ok(DeclaredType::Real));
        assert!("varchar".parse::<DeclaredType>().is_err());
    }

    #[test]
    fn test_primary_key_implies_not_null_and_unique() {
        let col = ColumnDef::new("code", DeclaredType::Text, 0).primary();
        assert!(col.is_not_null());
        assert!(col.is_unique());
        assert!(col.is_required());
        assert!(!col.is_auto_key());
    }

    #[test]
    fn test_integer_primary_key_is_auto_and_not_required() {
        let col = ColumnDef::new("id", DeclaredType::Integer, 0).primary();
        assert!(col.is_auto_key());
        assert!(!col.is_required());
    }

    #[test]
    fn test_default_makes_not_null_optional() {
        let col = ColumnDef::new("name", DeclaredType::Text, 1)
            .not_null()
            .with_default("'anon'");
        assert!(!col.is_required());
        assert_eq!(col.describe(), "TEXT NOT NULL DEFAULT 'anon'");
    }

    #[test]
    fn test_schema_sorts_columns_by_ordinal() {
        let schema = TableSchema::new(
            "t",
            vec![
                ColumnDef::new("b", DeclaredType::Text, 1),
                ColumnDef::new("a", DeclaredType::Integer, 0),
            ],
        );
        assert_eq!(schema.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_first_primary_key_wins() {
        let schema = TableSchema::new(
            "pairs",
            vec![
                ColumnDef::new("left", DeclaredType::Text, 0).primary(),
                ColumnDef::new("right", DeclaredType::Text, 1).primary(),
            ],
        );
        assert_eq!(schema.primary_key().map(|c| c.name.as_str()), Some("left"));
    }

    #[test]
    fn test_row_record_json_keeps_order() {
        let row = RowRecord::new()
            .with("z", 1i64)
            .with("a", Value::Null)
            .with("m", "x");
        let json = serde_json::to_string(&row.to_json()).unwrap();
        assert_eq!(json, r#"{"z":1,"a":null,"m":"x"}"#);
    }
}
