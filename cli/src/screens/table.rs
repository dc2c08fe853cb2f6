//! The per-table menu.

use std::io;

use tabula_core::TableSchema;

use crate::console::Console;
use crate::menu::SelectMenu;
use crate::screens::{ddl, query, rows, transfer};
use crate::session::Session;

/// Entries of the table menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    Browse,
    Insert,
    Edit,
    Delete,
    Search,
    RunSql,
    Export,
    Import,
    Schema,
    AddColumn,
    Rename,
    Truncate,
    Drop,
    Back,
}

impl TableAction {
    pub const ALL: [TableAction; 14] = [
        Self::Browse,
        Self::Insert,
        Self::Edit,
        Self::Delete,
        Self::Search,
        Self::RunSql,
        Self::Export,
        Self::Import,
        Self::Schema,
        Self::AddColumn,
        Self::Rename,
        Self::Truncate,
        Self::Drop,
        Self::Back,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Browse => "Browse rows",
            Self::Insert => "Insert row",
            Self::Edit => "Edit row",
            Self::Delete => "Delete row",
            Self::Search => "Search",
            Self::RunSql => "Run SQL",
            Self::Export => "Export",
            Self::Import => "Import CSV",
            Self::Schema => "Schema & indexes",
            Self::AddColumn => "Add column",
            Self::Rename => "Rename table",
            Self::Truncate => "Delete all rows",
            Self::Drop => "Drop table",
            Self::Back => "Back",
        }
    }

    fn needs_primary_key(self) -> bool {
        matches!(self, Self::Edit | Self::Delete)
    }
}

fn options(schema: &TableSchema) -> Vec<(String, TableAction)> {
    let keyed = schema.primary_key().is_some();
    TableAction::ALL
        .iter()
        .map(|action| {
            let mut label = action.label().to_string();
            if action.needs_primary_key() && !keyed {
                label.push_str(" (needs a primary key)");
            }
            (label, *action)
        })
        .collect()
}

/// Shows the menu for `table` until the user goes back or the table is
/// dropped.
///
/// The schema is re-read each time the menu is shown, so column and name
/// changes made from here are always reflected.
pub fn run<C: Console>(session: &mut Session<C>, table: &str) -> io::Result<()> {
    let mut name = table.to_string();
    let mut selected = 0;
    loop {
        let schema = match session.introspector().describe_table(&name) {
            Ok(schema) => schema,
            Err(err) => return session.notify(&format!("Cannot open {name}: {err}")),
        };
        let count = session
            .introspector()
            .count_rows(&name)
            .map(|n| n.to_string())
            .unwrap_or_else(|_| "?".to_string());

        let Some(menu) = SelectMenu::new(format!("{name} ({count} rows)"), options(&schema)) else {
            return Ok(());
        };
        let mut menu = menu.with_selected(selected);
        let action = menu.run(&mut session.console)?;
        selected = menu.selected();

        match action {
            None | Some(TableAction::Back) => return Ok(()),
            Some(TableAction::Browse) => rows::browse(session, &schema)?,
            Some(TableAction::Insert) => rows::insert_row(session, &schema)?,
            Some(TableAction::Edit) => rows::edit_row(session, &schema)?,
            Some(TableAction::Delete) => rows::delete_row(session, &schema)?,
            Some(TableAction::Search) => query::search(session, &schema)?,
            Some(TableAction::RunSql) => query::run_statement(session, Some(schema.name.as_str()))?,
            Some(TableAction::Export) => transfer::export(session, &schema)?,
            Some(TableAction::Import) => transfer::import(session, &schema)?,
            Some(TableAction::Schema) => ddl::show_schema(session, &schema)?,
            Some(TableAction::AddColumn) => ddl::add_column(session, &schema)?,
            Some(TableAction::Truncate) => rows::truncate_table(session, &schema)?,
            Some(TableAction::Rename) => {
                if let Some(new_name) = ddl::rename_table(session, &schema)? {
                    name = new_name;
                }
            }
            Some(TableAction::Drop) => {
                if ddl::drop_table(session, &schema)? {
                    return Ok(());
                }
            }
        }
    }
}
