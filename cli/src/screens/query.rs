//! Filtered searches and free statements.

use std::io;

use tabula_core::TableSchema;
use tabula_sqlite::{ExecOutcome, ResultSet, TABLE_PLACEHOLDER};
use tracing::warn;

use crate::console::Console;
use crate::menu::SelectMenu;
use crate::render;
use crate::session::Session;

fn show_result<C: Console>(session: &mut Session<C>, result: &ResultSet) -> io::Result<()> {
    session.console.clear()?;
    session.console.show(&render::format_table(result))?;
    session.notify(&format!("{} row(s).", result.len()))
}

/// Picks a column, asks for a condition such as `> 10` or `LIKE 'a%'`, and
/// shows the matching rows.
pub fn search<C: Console>(session: &mut Session<C>, schema: &TableSchema) -> io::Result<()> {
    let columns: Vec<(String, String)> = schema
        .columns
        .iter()
        .map(|c| (format!("{} ({})", c.name, c.declared_type), c.name.clone()))
        .collect();
    let title = format!("Search {}: pick a column", schema.name);
    let Some(mut menu) = SelectMenu::new(title, columns) else {
        return session.notify(&format!("{} has no columns to search.", schema.name));
    };
    let Some(column) = menu.run(&mut session.console)? else {
        return Ok(());
    };

    let label = format!("{column} (= 'x', > 5, LIKE 'a%', IN (1, 2), IS NULL, ...)");
    let Some(expression) = session.ask(&label)? else {
        return Ok(());
    };
    if expression.trim().is_empty() {
        return Ok(());
    }

    match session.executor().search(schema, &column, &expression) {
        Ok(result) if result.is_empty() => session.notify("No rows matched."),
        Ok(result) => show_result(session, &result),
        Err(err) => {
            warn!(table = %schema.name, %column, %err, "search failed");
            session.notify(&format!("Search failed: {err}"))
        }
    }
}

/// Runs one statement typed by the user.
///
/// Inside a table screen `{table}` stands for that table. Reads show their
/// rows; writes report how many rows they changed.
pub fn run_statement<C: Console>(session: &mut Session<C>, table: Option<&str>) -> io::Result<()> {
    let label = match table {
        Some(table) => format!("SQL ({TABLE_PLACEHOLDER} = {table})"),
        None => "SQL".to_string(),
    };
    let Some(text) = session.ask(&label)? else {
        return Ok(());
    };
    if text.trim().is_empty() {
        return Ok(());
    }

    match session.executor().execute(&text, table) {
        Ok(ExecOutcome::Rows(result)) => show_result(session, &result),
        Ok(ExecOutcome::Affected(n)) => session.notify(&format!("OK, {n} row(s) affected.")),
        Err(err) => {
            warn!(%err, "statement failed");
            session.notify(&format!("Statement failed: {err}"))
        }
    }
}
