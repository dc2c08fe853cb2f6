//! The root menu: every table in the store plus store-wide actions.

use std::io;

use tracing::warn;

use crate::console::Console;
use crate::menu::SelectMenu;
use crate::screens::{ddl, query, table};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
enum RootAction {
    Open(String),
    Create,
    RunSql,
    Quit,
}

/// Shows the root menu until the user quits or aborts.
///
/// The table list is re-read every time the menu is shown, so tables
/// created, renamed or dropped in a sub-screen appear at once.
pub fn run<C: Console>(session: &mut Session<C>) -> io::Result<()> {
    let mut selected = 0;
    loop {
        let options = match root_options(session) {
            Ok(options) => options,
            Err(err) => {
                warn!(%err, "could not list tables");
                return session.notify(&format!("Could not read the table list: {err}"));
            }
        };
        let title = format!("{}.{}", session.name, session.config.extension());
        let Some(menu) = SelectMenu::new(title, options) else {
            return Ok(());
        };
        let mut menu = menu.with_selected(selected);
        let action = menu.run(&mut session.console)?;
        selected = menu.selected();

        match action {
            None | Some(RootAction::Quit) => return Ok(()),
            Some(RootAction::Open(name)) => table::run(session, &name)?,
            Some(RootAction::Create) => ddl::create_table(session)?,
            Some(RootAction::RunSql) => query::run_statement(session, None)?,
        }
    }
}

fn root_options<C: Console>(
    session: &Session<C>,
) -> tabula_sqlite::Result<Vec<(String, RootAction)>> {
    let introspector = session.introspector();
    let mut options = Vec::new();
    for name in introspector.list_tables()? {
        let rows = introspector.count_rows(&name)?;
        options.push((format!("{name} ({rows} rows)"), RootAction::Open(name)));
    }
    options.push(("+ Create table".to_string(), RootAction::Create));
    options.push(("> Run SQL".to_string(), RootAction::RunSql));
    options.push(("x Quit".to_string(), RootAction::Quit));
    Ok(options)
}
