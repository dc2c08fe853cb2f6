//! Plain-text rendering of result sets and schemas.

use tabula_core::{IndexInfo, TableSchema, Value};
use tabula_sqlite::ResultSet;

/// Widest a rendered cell may be before it is cut.
const MAX_CELL_WIDTH: usize = 40;

fn cell(value: &Value) -> String {
    let text = value.to_string().replace(['\n', '\r', '\t'], " ");
    if text.chars().count() > MAX_CELL_WIDTH {
        let cut: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{cut}...")
    } else {
        text
    }
}

/// Renders rows as an aligned text table with a header rule.
///
/// `NULL` is shown as `NULL` so it stays distinct from empty text.
///
/// # Examples
///
/// ```
/// use tabula_core::Value;
/// use tabula_sqlite::ResultSet;
///
/// let result = ResultSet {
///     columns: vec!["id".into(), "name".into()],
///     rows: vec![vec![Value::Integer(1), Value::Null]],
/// };
/// assert_eq!(
///     tabula_cli::render::format_table(&result),
///     "id  name\n--  ----\n1   NULL\n"
/// );
/// ```
pub fn format_table(result: &ResultSet) -> String {
    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(cell).collect())
        .collect();
    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_row(&mut out, result.columns.iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &cells {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(text, &width)| format!("{text:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Describes a table's columns, indexes and creating statement.
pub fn format_schema(
    schema: &TableSchema,
    indexes: &[IndexInfo],
    rows: i64,
    sql: &str,
) -> String {
    let mut out = format!("Table: {}  Rows: {rows}\n", schema.name);

    out.push_str("\nColumns:\n");
    let max_name = schema
        .columns
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(4);
    for column in &schema.columns {
        out.push_str(&format!(
            "  {:>2}  {:<width$}  {}\n",
            column.ordinal,
            column.name,
            column.describe(),
            width = max_name
        ));
    }
    if schema.primary_key().is_none() {
        out.push_str("  (no primary key: rows cannot be edited or deleted here)\n");
    }

    out.push_str("\nIndexes:\n");
    if indexes.is_empty() {
        out.push_str("  (none)\n");
    }
    for index in indexes {
        let kind = if index.unique { "UNIQUE" } else { "" };
        let line = format!("  {}  {kind}", index.name);
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if !sql.is_empty() {
        out.push_str(&format!("\n{sql}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::{ColumnDef, DeclaredType};

    #[test]
    fn test_table_alignment() {
        let result = ResultSet {
            columns: vec!["n".into(), "label".into()],
            rows: vec![
                vec![Value::Integer(100), Value::text("a")],
                vec![Value::Integer(2), Value::text("")],
            ],
        };
        assert_eq!(
            format_table(&result),
            "n    label\n---  -----\n100  a\n2\n"
        );
    }

    #[test]
    fn test_long_cells_are_cut() {
        let long = "x".repeat(60);
        let result = ResultSet {
            columns: vec!["v".into()],
            rows: vec![vec![Value::text(long)]],
        };
        let rendered = format_table(&result);
        let last = rendered.lines().last().unwrap();
        assert_eq!(last.chars().count(), MAX_CELL_WIDTH);
        assert!(last.ends_with("..."));
    }

    #[test]
    fn test_empty_result_keeps_header() {
        let result = ResultSet {
            columns: vec!["id".into()],
            rows: Vec::new(),
        };
        assert_eq!(format_table(&result), "id\n--\n");
    }

    #[test]
    fn test_schema_lists_columns_and_missing_key() {
        let schema = TableSchema::new(
            "log",
            vec![
                ColumnDef::new("at", DeclaredType::Text, 0).not_null(),
                ColumnDef::new("msg", DeclaredType::Text, 1),
            ],
        );
        let text = format_schema(&schema, &[], 0, "CREATE TABLE log (at TEXT NOT NULL, msg TEXT)");
        assert!(text.starts_with("Table: log  Rows: 0\n"));
        assert!(text.contains("   0  at   TEXT NOT NULL\n"));
        assert!(text.contains("no primary key"));
        assert!(text.contains("(none)"));
    }
}
