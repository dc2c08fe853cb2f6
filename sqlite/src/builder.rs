//! Statement construction from table metadata.
//!
//! Every function here is pure: it takes a [`TableSchema`] (or column specs)
//! plus an intent and returns a [`Statement`], or a [`BuildError`] explaining
//! why no statement can be built. Row values always travel as positional
//! parameters. The only text spliced into SQL is identifiers, which are
//! either validated user input or names taken from the live schema and
//! quoted with [`quote_identifier`].
//!
//! # Example
//!
//! ```
//! use tabula_core::{ColumnSpec, DeclaredType};
//! use tabula_sqlite::builder::build_create_table;
//!
//! let statement = build_create_table(
//!     "t",
//!     &[
//!         ColumnSpec::new("id", DeclaredType::Integer).primary(),
//!         ColumnSpec::new("name", DeclaredType::Text).not_null().with_default("anon"),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(
//!     statement.sql,
//!     "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT NULL DEFAULT 'anon')"
//! );
//! assert!(statement.params.is_empty());
//! ```

use std::fmt;

use sqlparser::ast::{BinaryOperator, Expr, UnaryOperator, Value as SqlValue};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer};
use tabula_core::{
    ColumnDef, ColumnSpec, DeclaredType, RowRecord, TableSchema, ValidationError, Value,
    quote_identifier, quote_literal, validate_column_specs, validate_default, validate_identifier,
};

use crate::error::BuildError;

/// Statement text with its positional parameters (`?1`, `?2`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }
}

type BuildResult = Result<Statement, BuildError>;

fn column_definition(spec: &ColumnSpec) -> String {
    let mut out = format!("{} {}", spec.name, spec.declared_type.as_sql());
    if spec.primary_key {
        out.push_str(" PRIMARY KEY");
    }
    if spec.not_null && !spec.primary_key {
        out.push_str(" NOT NULL");
    }
    if spec.unique && !spec.primary_key {
        out.push_str(" UNIQUE");
    }
    if let Some(default) = &spec.default {
        out.push_str(" DEFAULT ");
        if spec.declared_type.quotes_literals() {
            out.push_str(&quote_literal(default));
        } else {
            out.push_str(default.trim());
        }
    }
    out
}

/// Builds `CREATE TABLE` from user column specs.
///
/// Constraints are appended in a fixed order: `PRIMARY KEY`, `NOT NULL`,
/// `UNIQUE`, `DEFAULT`. A primary key implies the other two, so they are
/// not repeated for it.
///
/// # Errors
///
/// [`BuildError::Invalid`] for a bad table or column name, no columns,
/// duplicate columns, more than one primary key, or an unquoted default
/// that is not a literal.
pub fn build_create_table(name: &str, specs: &[ColumnSpec]) -> BuildResult {
    validate_identifier(name)?;
    validate_column_specs(specs)?;

    let columns: Vec<String> = specs.iter().map(column_definition).collect();
    Ok(Statement::new(
        format!("CREATE TABLE {name} ({})", columns.join(", ")),
        Vec::new(),
    ))
}

fn check_known_columns(schema: &TableSchema, row: &RowRecord) -> Result<(), BuildError> {
    match row.columns().into_iter().find(|c| !schema.has_column(c)) {
        Some(unknown) => Err(BuildError::UnknownColumn(unknown.to_string())),
        None => Ok(()),
    }
}

/// Shared insert policy: auto keys and blank values fall back to the store,
/// unless the column is required.
fn insert_statement<'s>(
    schema: &'s TableSchema,
    supplied: impl Iterator<Item = (&'s ColumnDef, Option<Value>)>,
) -> BuildResult {
    let mut columns = Vec::new();
    let mut params = Vec::new();

    for (column, value) in supplied {
        match value {
            Some(value) => {
                columns.push(quote_identifier(&column.name));
                params.push(value);
            }
            None if column.is_required() => {
                return Err(BuildError::MissingRequired(column.name.clone()));
            }
            None => {}
        }
    }

    let table = quote_identifier(&schema.name);
    if columns.is_empty() {
        return Ok(Statement::new(
            format!("INSERT INTO {table} DEFAULT VALUES"),
            params,
        ));
    }

    let placeholders: Vec<String> = (1..=params.len()).map(|i| format!("?{i}")).collect();
    Ok(Statement::new(
        format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        ),
        params,
    ))
}

/// Builds an `INSERT` for the values a user supplied.
///
/// `INTEGER PRIMARY KEY` columns are skipped so the store assigns them.
/// A blank or missing value leaves the column out of both the column list
/// and the value list, so the column's default (or `NULL`) applies.
///
/// # Errors
///
/// [`BuildError::MissingRequired`] if a not-null column without a default
/// has no value, and [`BuildError::UnknownColumn`] if `values` names a
/// column the table does not have.
///
/// # Examples
///
/// ```
/// use tabula_core::{ColumnDef, DeclaredType, RowRecord, TableSchema};
/// use tabula_sqlite::BuildError;
/// use tabula_sqlite::builder::build_insert;
///
/// let schema = TableSchema::new(
///     "people",
///     vec![
///         ColumnDef::new("id", DeclaredType::Integer, 0).primary(),
///         ColumnDef::new("name", DeclaredType::Text, 1).not_null(),
///     ],
/// );
///
/// let ok = build_insert(&schema, &RowRecord::new().with("name", "ann")).unwrap();
/// assert_eq!(ok.sql, "INSERT INTO people (name) VALUES (?1)");
///
/// let missing = build_insert(&schema, &RowRecord::new());
/// assert_eq!(missing, Err(BuildError::MissingRequired("name".into())));
/// ```
pub fn build_insert(schema: &TableSchema, values: &RowRecord) -> BuildResult {
    check_known_columns(schema, values)?;
    insert_statement(
        schema,
        schema
            .columns
            .iter()
            .filter(|column| !column.is_auto_key())
            .map(|column| {
                let value = values.get(&column.name).filter(|v| !v.is_blank()).cloned();
                (column, value)
            }),
    )
}

/// Builds the `INSERT` used for one imported CSV row.
///
/// Fields map positionally onto every column in storage order, including an
/// `INTEGER PRIMARY KEY`, so exported ids survive a round trip. Fields are
/// bound as text and left to the column's affinity.
///
/// An empty field in a TEXT column is the empty string, which is how an
/// export writes one. In every other column an empty field means "not
/// supplied" and follows the same default/not-null policy as
/// [`build_insert`].
///
/// # Errors
///
/// [`BuildError::ColumnCountMismatch`] if the field count differs from the
/// column count, [`BuildError::MissingRequired`] for an empty required
/// non-TEXT field.
pub fn build_import_insert<S: AsRef<str>>(schema: &TableSchema, fields: &[S]) -> BuildResult {
    if fields.len() != schema.len() {
        return Err(BuildError::ColumnCountMismatch {
            expected: schema.len(),
            found: fields.len(),
        });
    }
    insert_statement(
        schema,
        schema.columns.iter().zip(fields).map(|(column, field)| {
            let field = field.as_ref();
            let supplied = !field.is_empty() || column.declared_type == DeclaredType::Text;
            (column, supplied.then(|| Value::text(field)))
        }),
    )
}

fn primary_key(schema: &TableSchema) -> Result<&ColumnDef, BuildError> {
    schema
        .primary_key()
        .ok_or_else(|| BuildError::NoPrimaryKey(schema.name.clone()))
}

/// Builds an `UPDATE` for the row whose primary key equals `key`.
///
/// Only columns with a non-blank new value are set; everything else is left
/// as it is. The first primary-key column addresses the row.
///
/// # Errors
///
/// [`BuildError::NoPrimaryKey`] if the table has no primary key,
/// [`BuildError::NoChanges`] if every value is blank, and
/// [`BuildError::UnknownColumn`] for columns the table does not have.
///
/// # Examples
///
/// ```
/// use tabula_core::{ColumnDef, DeclaredType, RowRecord, TableSchema, Value};
/// use tabula_sqlite::BuildError;
/// use tabula_sqlite::builder::build_update;
///
/// let schema = TableSchema::new(
///     "people",
///     vec![
///         ColumnDef::new("id", DeclaredType::Integer, 0).primary(),
///         ColumnDef::new("name", DeclaredType::Text, 1),
///         ColumnDef::new("city", DeclaredType::Text, 2),
///     ],
/// );
/// let changes = RowRecord::new().with("name", "").with("city", "Oslo");
/// let statement = build_update(&schema, &Value::Integer(3), &changes).unwrap();
/// assert_eq!(statement.sql, "UPDATE people SET city = ?1 WHERE id = ?2");
///
/// let blank = RowRecord::new().with("name", "").with("city", "");
/// assert_eq!(
///     build_update(&schema, &Value::Integer(3), &blank),
///     Err(BuildError::NoChanges)
/// );
/// ```
pub fn build_update(schema: &TableSchema, key: &Value, changes: &RowRecord) -> BuildResult {
    let pk = primary_key(schema)?;
    check_known_columns(schema, changes)?;

    let mut assignments = Vec::new();
    let mut params = Vec::new();
    for column in &schema.columns {
        if let Some(value) = changes.get(&column.name).filter(|v| !v.is_blank()) {
            params.push(value.clone());
            assignments.push(format!("{} = ?{}", quote_identifier(&column.name), params.len()));
        }
    }
    if assignments.is_empty() {
        return Err(BuildError::NoChanges);
    }

    params.push(key.clone());
    Ok(Statement::new(
        format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            quote_identifier(&schema.name),
            assignments.join(", "),
            quote_identifier(&pk.name),
            params.len()
        ),
        params,
    ))
}

/// Builds a `DELETE` for the row whose primary key equals `key`.
///
/// # Errors
///
/// [`BuildError::NoPrimaryKey`] if the table has no primary key.
pub fn build_delete(schema: &TableSchema, key: &Value) -> BuildResult {
    let pk = primary_key(schema)?;
    Ok(Statement::new(
        format!(
            "DELETE FROM {} WHERE {} = ?1",
            quote_identifier(&schema.name),
            quote_identifier(&pk.name)
        ),
        vec![key.clone()],
    ))
}

/// Builds a `DELETE` of every row, only if `confirmation` is exactly
/// `phrase`.
///
/// # Errors
///
/// [`BuildError::ConfirmationMismatch`] for any other confirmation text.
pub fn build_truncate(schema: &TableSchema, confirmation: &str, phrase: &str) -> BuildResult {
    if confirmation != phrase {
        return Err(BuildError::ConfirmationMismatch);
    }
    Ok(Statement::new(
        format!("DELETE FROM {}", quote_identifier(&schema.name)),
        Vec::new(),
    ))
}

fn column_list(schema: &TableSchema) -> String {
    schema
        .columns
        .iter()
        .map(|c| quote_identifier(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds a `SELECT` of every row, columns in storage order.
pub fn build_select_all(schema: &TableSchema) -> Statement {
    Statement::new(
        format!(
            "SELECT {} FROM {}",
            column_list(schema),
            quote_identifier(&schema.name)
        ),
        Vec::new(),
    )
}

/// Builds a `SELECT` of one page of rows.
pub fn build_page(schema: &TableSchema, limit: usize, offset: usize) -> Statement {
    let to_param = |n: usize| Value::Integer(i64::try_from(n).unwrap_or(i64::MAX));
    Statement::new(
        format!(
            "SELECT {} FROM {} LIMIT ?1 OFFSET ?2",
            column_list(schema),
            quote_identifier(&schema.name)
        ),
        vec![to_param(limit), to_param(offset)],
    )
}

/// Builds a `SELECT` of the row whose primary key equals `key`.
///
/// # Errors
///
/// [`BuildError::NoPrimaryKey`] if the table has no primary key.
pub fn build_select_by_key(schema: &TableSchema, key: &Value) -> BuildResult {
    let pk = primary_key(schema)?;
    Ok(Statement::new(
        format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            column_list(schema),
            quote_identifier(&schema.name),
            quote_identifier(&pk.name)
        ),
        vec![key.clone()],
    ))
}

/// Builds `SELECT * FROM <table> WHERE <column> <expression>`.
///
/// The column must exist in `schema`. The expression is parsed into a
/// [`Filter`] and its operands are bound as parameters, so no user text is
/// spliced into the statement.
///
/// # Errors
///
/// [`BuildError::UnknownColumn`] for a column outside the schema and
/// [`BuildError::InvalidFilter`] for an expression that does not parse.
///
/// # Examples
///
/// ```
/// use tabula_core::{ColumnDef, DeclaredType, TableSchema, Value};
/// use tabula_sqlite::builder::build_filtered_select;
///
/// let schema = TableSchema::new("t", vec![ColumnDef::new("age", DeclaredType::Integer, 0)]);
/// let statement = build_filtered_select(&schema, "age", "BETWEEN 18 AND 30").unwrap();
/// assert_eq!(statement.sql, "SELECT * FROM t WHERE age BETWEEN ?1 AND ?2");
/// assert_eq!(statement.params, vec![Value::Integer(18), Value::Integer(30)]);
/// ```
pub fn build_filtered_select(schema: &TableSchema, column: &str, expression: &str) -> BuildResult {
    if !schema.has_column(column) {
        return Err(BuildError::UnknownColumn(column.to_string()));
    }
    let filter = Filter::parse(expression)?;
    let (condition, params) = filter.to_sql();
    Ok(Statement::new(
        format!(
            "SELECT * FROM {} WHERE {} {condition}",
            quote_identifier(&schema.name),
            quote_identifier(column)
        ),
        params,
    ))
}

/// Builds `ALTER TABLE ... ADD COLUMN`.
///
/// # Errors
///
/// [`BuildError::UnsupportedAlter`] for primary-key or unique columns and
/// for `NOT NULL` without a default, which SQLite cannot add to an existing
/// table; [`BuildError::Invalid`] for bad names, duplicates, or defaults.
pub fn build_add_column(schema: &TableSchema, spec: &ColumnSpec) -> BuildResult {
    validate_identifier(&spec.name)?;
    if schema
        .columns
        .iter()
        .any(|c| c.name.eq_ignore_ascii_case(&spec.name))
    {
        return Err(ValidationError::DuplicateColumn(spec.name.clone()).into());
    }
    if spec.primary_key {
        return Err(BuildError::UnsupportedAlter(
            "cannot add a PRIMARY KEY column".to_string(),
        ));
    }
    if spec.unique {
        return Err(BuildError::UnsupportedAlter(
            "cannot add a UNIQUE column".to_string(),
        ));
    }
    if spec.not_null && spec.default.is_none() {
        return Err(BuildError::UnsupportedAlter(
            "a NOT NULL column needs a default".to_string(),
        ));
    }
    validate_default(spec)?;

    Ok(Statement::new(
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            quote_identifier(&schema.name),
            column_definition(spec)
        ),
        Vec::new(),
    ))
}

/// Builds `ALTER TABLE ... RENAME TO`.
///
/// # Errors
///
/// [`BuildError::Invalid`] if the new name is not a valid identifier.
pub fn build_rename_table(schema: &TableSchema, new_name: &str) -> BuildResult {
    validate_identifier(new_name)?;
    Ok(Statement::new(
        format!(
            "ALTER TABLE {} RENAME TO {new_name}",
            quote_identifier(&schema.name)
        ),
        Vec::new(),
    ))
}

/// Builds `DROP TABLE`.
pub fn build_drop_table(schema: &TableSchema) -> Statement {
    Statement::new(
        format!("DROP TABLE {}", quote_identifier(&schema.name)),
        Vec::new(),
    )
}

// ---------------------------------------------------------------------------
// Filter expressions
// ---------------------------------------------------------------------------

/// Column name the condition is parsed against. Only the shape of the
/// resulting expression matters; the real column is spliced in later.
const FILTER_SUBJECT: &str = "filter_subject";

/// Comparison operators accepted in filter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    fn from_operator(op: &BinaryOperator) -> Option<Self> {
        match op {
            BinaryOperator::Eq => Some(Self::Eq),
            BinaryOperator::NotEq => Some(Self::Ne),
            BinaryOperator::Lt => Some(Self::Lt),
            BinaryOperator::LtEq => Some(Self::Le),
            BinaryOperator::Gt => Some(Self::Gt),
            BinaryOperator::GtEq => Some(Self::Ge),
            _ => None,
        }
    }
}

/// A parsed filter condition: everything after the column name in a
/// `WHERE` clause.
///
/// # Examples
///
/// ```
/// use tabula_core::Value;
/// use tabula_sqlite::builder::{CompareOp, Filter};
///
/// assert_eq!(
///     Filter::parse(">= 2.5").unwrap(),
///     Filter::Compare(CompareOp::Ge, Value::Real(2.5))
/// );
/// assert_eq!(
///     Filter::parse("not like 'a%'").unwrap(),
///     Filter::Like { negated: true, pattern: Value::text("a%") }
/// );
/// assert!(Filter::parse("= 1; DROP TABLE t").is_err());
/// assert!(Filter::parse("= 1 OR 1 = 1").is_err());
/// assert!(Filter::parse("ORDER BY 1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare(CompareOp, Value),
    Like { negated: bool, pattern: Value },
    Glob(Value),
    Null { negated: bool },
    Between { low: Value, high: Value },
    In { negated: bool, values: Vec<Value> },
}

impl Filter {
    /// Parses a raw comparison expression such as `= 'ann'`, `> 10`,
    /// `LIKE 'a%'`, `GLOB '*x*'`, `IS NOT NULL`, `BETWEEN 1 AND 5`, or
    /// `IN (1, 2)`.
    ///
    /// The expression is parsed with the SQLite dialect as if it followed a
    /// column name. Only a single condition on that column is accepted, and
    /// every operand must be a literal: quoted strings are text, numbers are
    /// integers or reals, and bare words are taken as text.
    ///
    /// # Errors
    ///
    /// [`BuildError::InvalidFilter`] if the text does not parse, has
    /// anything after the condition, or uses an unsupported operator or
    /// operand.
    pub fn parse(expression: &str) -> Result<Self, BuildError> {
        let dialect = SQLiteDialect {};
        let tokens: Vec<Token> = Tokenizer::new(&dialect, expression)
            .tokenize()
            .map_err(|e| BuildError::InvalidFilter(e.to_string()))?
            .into_iter()
            .filter(|token| !matches!(token, Token::Whitespace(_)))
            .collect();

        let Some(first) = tokens.first() else {
            return Err(BuildError::InvalidFilter("empty expression".to_string()));
        };

        // SQLite's GLOB has no node in the generic expression tree, so only
        // its operand goes through the parser.
        let glob = matches!(
            first,
            Token::Word(word) if word.quote_style.is_none() && word.value.eq_ignore_ascii_case("GLOB")
        );
        if glob {
            let pattern = parse_tokens(&dialect, tokens.into_iter().skip(1).collect())?;
            return Ok(Self::Glob(literal(pattern)?));
        }

        let mut input = Vec::with_capacity(tokens.len() + 1);
        input.push(Token::make_word(FILTER_SUBJECT, Some('"')));
        input.extend(tokens);
        Self::from_expr(parse_tokens(&dialect, input)?)
    }

    fn from_expr(expr: Expr) -> Result<Self, BuildError> {
        match expr {
            Expr::BinaryOp { left, op, right } if is_subject(&left) => {
                let op = CompareOp::from_operator(&op).ok_or_else(|| {
                    BuildError::InvalidFilter(format!("unsupported operator {op}"))
                })?;
                Ok(Self::Compare(op, literal(*right)?))
            }
            Expr::Like {
                negated,
                expr,
                pattern,
                escape_char,
                ..
            } if is_subject(&expr) && escape_char.is_none() => Ok(Self::Like {
                negated,
                pattern: literal(*pattern)?,
            }),
            Expr::IsNull(expr) if is_subject(&expr) => Ok(Self::Null { negated: false }),
            Expr::IsNotNull(expr) if is_subject(&expr) => Ok(Self::Null { negated: true }),
            Expr::Between {
                expr,
                negated: false,
                low,
                high,
            } if is_subject(&expr) => Ok(Self::Between {
                low: literal(*low)?,
                high: literal(*high)?,
            }),
            Expr::InList {
                expr,
                list,
                negated,
            } if is_subject(&expr) => Ok(Self::In {
                negated,
                values: list.into_iter().map(literal).collect::<Result<_, _>>()?,
            }),
            _ => Err(BuildError::InvalidFilter(
                "expected a single condition on the column".to_string(),
            )),
        }
    }

    /// Renders the condition with `?N` placeholders starting at `?1`.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        match self {
            Self::Compare(op, value) => (format!("{} ?1", op.as_sql()), vec![value.clone()]),
            Self::Like { negated, pattern } => {
                let not = if *negated { "NOT " } else { "" };
                (format!("{not}LIKE ?1"), vec![pattern.clone()])
            }
            Self::Glob(pattern) => ("GLOB ?1".to_string(), vec![pattern.clone()]),
            Self::Null { negated: false } => ("IS NULL".to_string(), Vec::new()),
            Self::Null { negated: true } => ("IS NOT NULL".to_string(), Vec::new()),
            Self::Between { low, high } => (
                "BETWEEN ?1 AND ?2".to_string(),
                vec![low.clone(), high.clone()],
            ),
            Self::In { negated, values } => {
                let not = if *negated { "NOT " } else { "" };
                let placeholders: Vec<String> =
                    (1..=values.len()).map(|i| format!("?{i}")).collect();
                (
                    format!("{not}IN ({})", placeholders.join(", ")),
                    values.clone(),
                )
            }
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql().0)
    }
}

/// Parses one expression from `tokens` and requires that nothing follows it.
fn parse_tokens(dialect: &SQLiteDialect, tokens: Vec<Token>) -> Result<Expr, BuildError> {
    let mut parser = Parser::new(dialect).with_tokens(tokens);
    let expr = parser
        .parse_expr()
        .map_err(|e| BuildError::InvalidFilter(e.to_string()))?;
    parser
        .expect_token(&Token::EOF)
        .map_err(|_| BuildError::InvalidFilter("unexpected text after the condition".to_string()))?;
    Ok(expr)
}

fn is_subject(expr: &Expr) -> bool {
    matches!(expr, Expr::Identifier(ident) if ident.value == FILTER_SUBJECT)
}

/// Turns an operand into a bound value. Anything that is not a literal
/// (column references aside, which read as text) is refused.
fn literal(expr: Expr) -> Result<Value, BuildError> {
    match expr {
        Expr::Value(SqlValue::Number(text, _)) => number(&text),
        Expr::Value(SqlValue::SingleQuotedString(text) | SqlValue::DoubleQuotedString(text)) => {
            Ok(Value::Text(text))
        }
        Expr::Identifier(ident) => Ok(Value::Text(ident.value)),
        Expr::Nested(inner) => literal(*inner),
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr,
        } => match literal(*expr)? {
            Value::Integer(i) => Ok(Value::Integer(-i)),
            Value::Real(f) => Ok(Value::Real(-f)),
            _ => Err(BuildError::InvalidFilter(
                "'-' applies to numbers only".to_string(),
            )),
        },
        other => Err(BuildError::InvalidFilter(format!(
            "expected a literal value, found {other}"
        ))),
    }
}

fn number(text: &str) -> Result<Value, BuildError> {
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Value::Integer(i));
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Value::Real(f)),
        _ => Err(BuildError::InvalidFilter(format!("'{text}' is not a number"))),
    }
}
