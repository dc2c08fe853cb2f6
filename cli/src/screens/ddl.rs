//! Table-level screens: the create-table wizard, adding columns, renaming,
//! dropping and the schema view.

use std::io;

use tabula_core::{ColumnSpec, DeclaredType, TableSchema, validate_default, validate_identifier};
use tabula_sqlite::{BuildError, StoreError};
use tracing::warn;

use crate::console::Console;
use crate::menu::{choose, confirm};
use crate::render;
use crate::session::Session;

/// One pass of the column questions.
enum ColumnStep {
    Column(ColumnSpec),
    Done,
    Cancelled,
}

/// Constraints the column questions may offer.
#[derive(Clone, Copy)]
struct ColumnRules {
    allow_primary: bool,
    allow_unique: bool,
}

/// Reads an identifier, asking again until it is valid.
///
/// Blank input yields `Some("")` when `allow_blank` is set.
fn ask_name<C: Console>(
    session: &mut Session<C>,
    label: &str,
    allow_blank: bool,
) -> io::Result<Option<String>> {
    loop {
        let Some(answer) = session.ask(label)? else {
            return Ok(None);
        };
        let name = answer.trim();
        if name.is_empty() && allow_blank {
            return Ok(Some(String::new()));
        }
        match validate_identifier(name) {
            Ok(()) => return Ok(Some(name.to_string())),
            Err(err) => session.console.show(&err.to_string())?,
        }
    }
}

fn ask_column<C: Console>(
    session: &mut Session<C>,
    position: usize,
    rules: ColumnRules,
    taken: &[String],
) -> io::Result<ColumnStep> {
    let label = format!("Column {position} name (blank to finish)");
    let name = loop {
        let Some(name) = ask_name(session, &label, true)? else {
            return Ok(ColumnStep::Cancelled);
        };
        if name.is_empty() {
            return Ok(ColumnStep::Done);
        }
        if taken.iter().any(|t| t.eq_ignore_ascii_case(&name)) {
            session.console.show(&format!("{name} is already a column."))?;
            continue;
        }
        break name;
    };

    let types: Vec<(String, DeclaredType)> = DeclaredType::ALL
        .iter()
        .map(|ty| (ty.to_string(), *ty))
        .collect();
    let Some(declared_type) = choose(&mut session.console, format!("Type of {name}"), types)? else {
        return Ok(ColumnStep::Cancelled);
    };
    let mut spec = ColumnSpec::new(name.as_str(), declared_type);

    if rules.allow_primary {
        match confirm(&mut session.console, &format!("Is {name} the primary key?"))? {
            None => return Ok(ColumnStep::Cancelled),
            Some(true) => spec = spec.primary(),
            Some(false) => {}
        }
    }
    if !spec.primary_key {
        match confirm(&mut session.console, &format!("Must {name} always have a value?"))? {
            None => return Ok(ColumnStep::Cancelled),
            Some(true) => spec = spec.not_null(),
            Some(false) => {}
        }
        if rules.allow_unique {
            match confirm(&mut session.console, &format!("Must {name} be unique?"))? {
                None => return Ok(ColumnStep::Cancelled),
                Some(true) => spec = spec.unique(),
                Some(false) => {}
            }
        }
    }

    loop {
        let Some(answer) = session.ask(&format!("Default for {name} (blank for none)"))? else {
            return Ok(ColumnStep::Cancelled);
        };
        if answer.trim().is_empty() {
            break;
        }
        let candidate = spec.clone().with_default(answer.trim());
        match validate_default(&candidate) {
            Ok(()) => {
                spec = candidate;
                break;
            }
            Err(err) => session.console.show(&err.to_string())?,
        }
    }
    Ok(ColumnStep::Column(spec))
}

/// Walks the user through naming a table and its columns, then creates it.
pub fn create_table<C: Console>(session: &mut Session<C>) -> io::Result<()> {
    let Some(name) = ask_name(session, "New table name", false)? else {
        return Ok(());
    };
    if let Ok(true) = session.introspector().table_exists(&name) {
        return session.notify(&format!("{name} already exists."));
    }

    let mut specs: Vec<ColumnSpec> = Vec::new();
    loop {
        let taken: Vec<String> = specs.iter().map(|s| s.name.clone()).collect();
        let rules = ColumnRules {
            allow_primary: !specs.iter().any(|s| s.primary_key),
            allow_unique: true,
        };
        match ask_column(session, specs.len() + 1, rules, &taken)? {
            ColumnStep::Column(spec) => specs.push(spec),
            ColumnStep::Done if specs.is_empty() => {
                session.console.show("A table needs at least one column.")?
            }
            ColumnStep::Done => break,
            ColumnStep::Cancelled => return session.notify("Table not created."),
        }
    }

    match session.editor().create_table(&name, &specs) {
        Ok(()) => session.notify(&format!("Created {name} with {} column(s).", specs.len())),
        Err(err) => {
            warn!(table = %name, %err, "create table failed");
            session.notify(&format!("Create failed: {err}"))
        }
    }
}

/// Adds one column to an existing table.
///
/// Primary key and unique constraints cannot be added this way, so those
/// questions are skipped.
pub fn add_column<C: Console>(session: &mut Session<C>, schema: &TableSchema) -> io::Result<()> {
    let taken: Vec<String> = schema.columns.iter().map(|c| c.name.clone()).collect();
    let rules = ColumnRules {
        allow_primary: false,
        allow_unique: false,
    };
    let ColumnStep::Column(spec) = ask_column(session, schema.len() + 1, rules, &taken)? else {
        return Ok(());
    };

    match session.editor().add_column(schema, &spec) {
        Ok(()) => session.notify(&format!("Added {} to {}.", spec.name, schema.name)),
        Err(err) => {
            warn!(table = %schema.name, %err, "add column failed");
            session.notify(&format!("Add column failed: {err}"))
        }
    }
}

/// Renames the table; returns the new name on success.
pub fn rename_table<C: Console>(
    session: &mut Session<C>,
    schema: &TableSchema,
) -> io::Result<Option<String>> {
    let Some(new_name) = ask_name(session, &format!("New name for {}", schema.name), false)? else {
        return Ok(None);
    };

    match session.editor().rename_table(schema, &new_name) {
        Ok(()) => {
            session.notify(&format!("Renamed {} to {new_name}.", schema.name))?;
            Ok(Some(new_name))
        }
        Err(err) => {
            warn!(table = %schema.name, %err, "rename failed");
            session.notify(&format!("Rename failed: {err}"))?;
            Ok(None)
        }
    }
}

/// Drops the table once the user retypes its name; returns `true` if it
/// was dropped.
pub fn drop_table<C: Console>(session: &mut Session<C>, schema: &TableSchema) -> io::Result<bool> {
    let label = format!("Type {} to drop it with all its rows", schema.name);
    let Some(typed) = session.ask(&label)? else {
        return Ok(false);
    };

    match session.editor().drop_table(schema, &typed) {
        Ok(()) => {
            session.notify(&format!("Dropped {}.", schema.name))?;
            Ok(true)
        }
        Err(StoreError::BuildError(BuildError::ConfirmationMismatch)) => {
            session.notify("Name did not match. Nothing was dropped.")?;
            Ok(false)
        }
        Err(err) => {
            warn!(table = %schema.name, %err, "drop failed");
            session.notify(&format!("Drop failed: {err}"))?;
            Ok(false)
        }
    }
}

fn schema_text<C: Console>(
    session: &Session<C>,
    schema: &TableSchema,
) -> tabula_sqlite::Result<String> {
    let introspector = session.introspector();
    let indexes = introspector.list_indexes(&schema.name)?;
    let rows = introspector.count_rows(&schema.name)?;
    let sql = introspector.table_sql(&schema.name)?;
    Ok(render::format_schema(schema, &indexes, rows, &sql))
}

/// Shows columns, constraints, indexes and the creating statement.
pub fn show_schema<C: Console>(session: &mut Session<C>, schema: &TableSchema) -> io::Result<()> {
    match schema_text(session, schema) {
        Ok(text) => {
            session.console.clear()?;
            session.console.show(&text)?;
            session.console.pause()
        }
        Err(err) => session.notify(&format!("Cannot read the schema: {err}")),
    }
}
