//! The per-run context handed to every screen.

use std::io;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tabula_sqlite::{QueryExecutor, SchemaIntrospector, TableEditor, Transfer};
use tracing::info;

use crate::config::ConsoleConfig;
use crate::console::Console;
use crate::screens;

/// One open store, its settings and the console the user is sitting at.
///
/// The connection lives exactly as long as the session and is closed when
/// the session is dropped, whichever way the run ends.
pub struct Session<C> {
    pub(crate) conn: Connection,
    pub(crate) config: ConsoleConfig,
    pub(crate) console: C,
    pub(crate) name: String,
    pub(crate) workdir: PathBuf,
}

impl<C: Console> Session<C> {
    pub fn new(
        conn: Connection,
        config: ConsoleConfig,
        console: C,
        name: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            config,
            console,
            name: name.into(),
            workdir: PathBuf::from("."),
        }
    }

    /// Directory relative file paths are resolved against.
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = dir.into();
        self
    }

    /// Runs the root menu until the user leaves it.
    pub fn run(&mut self) -> io::Result<()> {
        info!(store = %self.name, "session started");
        let result = screens::root::run(self);
        info!(store = %self.name, ok = result.is_ok(), "session ended");
        result
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub(crate) fn introspector(&self) -> SchemaIntrospector<'_> {
        SchemaIntrospector::new(&self.conn)
    }

    pub(crate) fn editor(&self) -> TableEditor<'_> {
        TableEditor::new(&self.conn)
    }

    pub(crate) fn executor(&self) -> QueryExecutor<'_> {
        QueryExecutor::new(&self.conn)
    }

    pub(crate) fn transfer(&self) -> Transfer<'_> {
        Transfer::new(&self.conn)
    }

    /// Resolves a user-typed path against the working directory.
    pub(crate) fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path.trim());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        }
    }

    /// Shows a message and waits for a key.
    pub(crate) fn notify(&mut self, message: &str) -> io::Result<()> {
        self.console.show(message)?;
        self.console.pause()
    }

    /// Reads a line; `Ok(None)` if aborted.
    pub(crate) fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        self.console.prompt(label)
    }
}
