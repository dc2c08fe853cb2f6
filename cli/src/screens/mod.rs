//! Interactive workflows.
//!
//! Each screen takes the [`Session`](crate::Session) mutably, reads what it
//! needs from the console, runs one store operation and reports the outcome.
//! Store failures are shown to the user and never end the session; only
//! terminal I/O errors propagate.

pub mod ddl;
pub mod query;
pub mod root;
pub mod rows;
pub mod table;
pub mod transfer;

use tabula_core::{ColumnDef, TableSchema};

/// Prompt label for one field: name, type and whether it may be left blank.
pub(crate) fn field_label(column: &ColumnDef) -> String {
    let mut label = format!("{} ({}", column.name, column.declared_type);
    if column.is_required() {
        label.push_str(", required");
    } else if let Some(default) = &column.default {
        label.push_str(&format!(", default {default}"));
    }
    label.push(')');
    label
}

pub(crate) fn no_key_message(schema: &TableSchema) -> String {
    format!(
        "{} has no primary key, so its rows cannot be edited or deleted here.",
        schema.name
    )
}
