//! Opening the store file.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Path of the store for `name`: `<dir>/<name>.<extension>`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tabula_sqlite::store_path;
///
/// assert_eq!(
///     store_path(Path::new("/data"), "shop", "db"),
///     Path::new("/data/shop.db")
/// );
/// ```
pub fn store_path(dir: &Path, name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{name}.{extension}"))
}

/// Opens the store at `path`, creating an empty one if the file is absent.
///
/// Foreign key enforcement is switched on for the session.
pub fn open_store(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    let existed = path.exists();
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    info!(path = %path.display(), created = !existed, "opened store");
    Ok(conn)
}
