//! Row workflows: browsing, inserting, editing, deleting, truncating.

use std::io;

use tabula_core::{RowRecord, TableSchema};
use tabula_sqlite::{TruncateOutcome, UpdateOutcome, parse_key};
use tracing::warn;

use crate::console::{Console, Key};
use crate::menu::confirm;
use crate::render;
use crate::screens::{field_label, no_key_message};
use crate::session::Session;

/// Pages through the table, `page_size` rows at a time.
///
/// Right/Down and Left/Up turn pages, Home and End jump to the first and
/// last page, Enter or an abort key goes back.
pub fn browse<C: Console>(session: &mut Session<C>, schema: &TableSchema) -> io::Result<()> {
    let page_size = session.config.page_size.max(1);
    let total = match session.introspector().count_rows(&schema.name) {
        Ok(total) => usize::try_from(total).unwrap_or(0),
        Err(err) => return session.notify(&format!("Cannot read {}: {err}", schema.name)),
    };

    let mut offset = 0;
    loop {
        let page = match session.executor().page(schema, page_size, offset) {
            Ok(page) => page,
            Err(err) => return session.notify(&format!("Cannot read {}: {err}", schema.name)),
        };
        let end = offset + page.len();
        let position = if total == 0 {
            "No rows.".to_string()
        } else {
            format!("Rows {}-{end} of {total}", offset + 1)
        };

        session.console.clear()?;
        session.console.show(&render::format_table(&page))?;
        session
            .console
            .show(&format!("{position}   Left/Right page  Esc back"))?;

        match session.console.read_key()? {
            Key::Right | Key::Down if end < total => offset += page_size,
            Key::Left | Key::Up => offset = offset.saturating_sub(page_size),
            Key::Home => offset = 0,
            Key::End if total > 0 => offset = (total - 1) / page_size * page_size,
            Key::Enter | Key::Escape | Key::Interrupt => return Ok(()),
            _ => {}
        }
    }
}

/// Asks for every non-generated column and inserts the row.
///
/// A blank answer for a required column is refused and asked again; blank
/// answers elsewhere leave the value to the column's default.
pub fn insert_row<C: Console>(session: &mut Session<C>, schema: &TableSchema) -> io::Result<()> {
    let mut row = RowRecord::new();
    for column in schema.columns.iter().filter(|c| !c.is_auto_key()) {
        let label = field_label(column);
        loop {
            let Some(answer) = session.ask(&label)? else {
                return session.notify("Insert cancelled.");
            };
            if answer.trim().is_empty() && column.is_required() {
                session
                    .console
                    .show(&format!("{} is required.", column.name))?;
                continue;
            }
            row.set(column.name.as_str(), answer);
            break;
        }
    }

    match session.editor().insert(schema, &row) {
        Ok(rowid) => session.notify(&format!("Inserted row {rowid} into {}.", schema.name)),
        Err(err) => {
            warn!(table = %schema.name, %err, "insert failed");
            session.notify(&format!("Insert failed: {err}"))
        }
    }
}

/// Edits the row whose primary key the user names.
///
/// Each field shows its current value; a blank answer keeps it. When every
/// answer is blank no statement is run.
pub fn edit_row<C: Console>(session: &mut Session<C>, schema: &TableSchema) -> io::Result<()> {
    let Some(pk) = schema.primary_key() else {
        return session.notify(&no_key_message(schema));
    };
    let Some(answer) = session.ask(&format!("{} of the row to edit", pk.name))? else {
        return Ok(());
    };
    if answer.trim().is_empty() {
        return Ok(());
    }
    let key = parse_key(pk, &answer);

    let current = match session.editor().fetch(schema, &key) {
        Ok(Some(row)) => row,
        Ok(None) => return session.notify(&format!("No row has {} = {key}.", pk.name)),
        Err(err) => return session.notify(&format!("Cannot read the row: {err}")),
    };

    session
        .console
        .show("Blank keeps the current value, shown in brackets.")?;
    let mut changes = RowRecord::new();
    for column in schema.columns.iter().filter(|c| c.name != pk.name) {
        let shown = current
            .get(&column.name)
            .map(ToString::to_string)
            .unwrap_or_default();
        let Some(answer) = session.ask(&format!("{} [{shown}]", column.name))? else {
            return session.notify("Edit cancelled.");
        };
        changes.set(column.name.as_str(), answer);
    }

    match session.editor().update(schema, &key, &changes) {
        Ok(UpdateOutcome::NoChanges) => session.notify("No changes made."),
        Ok(UpdateOutcome::Updated(n)) => session.notify(&format!("Updated {n} row(s).")),
        Err(err) => {
            warn!(table = %schema.name, %err, "update failed");
            session.notify(&format!("Update failed: {err}"))
        }
    }
}

/// Deletes the row whose primary key the user names, after a yes/no check.
pub fn delete_row<C: Console>(session: &mut Session<C>, schema: &TableSchema) -> io::Result<()> {
    let Some(pk) = schema.primary_key() else {
        return session.notify(&no_key_message(schema));
    };
    let Some(answer) = session.ask(&format!("{} of the row to delete", pk.name))? else {
        return Ok(());
    };
    if answer.trim().is_empty() {
        return Ok(());
    }
    let key = parse_key(pk, &answer);

    let question = format!("Delete the row where {} = {key}?", pk.name);
    if confirm(&mut session.console, &question)? != Some(true) {
        return session.notify("Nothing was deleted.");
    }

    match session.editor().delete(schema, &key) {
        Ok(0) => session.notify(&format!("No row has {} = {key}.", pk.name)),
        Ok(n) => session.notify(&format!("Deleted {n} row(s).")),
        Err(err) => {
            warn!(table = %schema.name, %err, "delete failed");
            session.notify(&format!("Delete failed: {err}"))
        }
    }
}

/// Empties the table once the user types the configured phrase exactly.
pub fn truncate_table<C: Console>(
    session: &mut Session<C>,
    schema: &TableSchema,
) -> io::Result<()> {
    let phrase = session.config.truncate_phrase.clone();
    let label = format!("Type {phrase} to delete every row in {}", schema.name);
    let Some(typed) = session.ask(&label)? else {
        return Ok(());
    };

    match session.editor().truncate(schema, &typed, &phrase) {
        Ok(TruncateOutcome::NotConfirmed) => {
            session.notify("Confirmation did not match. Nothing was deleted.")
        }
        Ok(TruncateOutcome::Truncated(n)) => {
            session.notify(&format!("Deleted {n} row(s) from {}.", schema.name))
        }
        Err(err) => {
            warn!(table = %schema.name, %err, "truncate failed");
            session.notify(&format!("Delete failed: {err}"))
        }
    }
}
