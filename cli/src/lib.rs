//! Keyboard-driven console for a SQLite store.
//!
//! The console opens one store, lists its tables and offers menu-driven
//! browsing, editing, searching, import/export and table changes. All SQL
//! is produced by [`tabula_sqlite`] from the live schema.
//!
//! # Architecture
//!
//! - **`console`**: the [`Console`] trait every screen talks to
//! - **`terminal`**: the crossterm implementation used by the binary
//! - **`menu`**: [`SelectMenu`], the cyclic menu behind every choice
//! - **`session`**: [`Session`], owning the connection, settings and console
//! - **`screens`**: one module per group of workflows
//! - **`config`**: [`ConsoleConfig`] loaded from YAML

pub mod config;
pub mod console;
pub mod error;
pub mod menu;
pub mod render;
pub mod screens;
pub mod session;
pub mod terminal;

pub use config::{ConfigError, ConsoleConfig, DEFAULT_CONFIG_FILE};
pub use console::{Console, Key};
pub use error::{CliError, Result};
pub use menu::{MenuEvent, SelectMenu, choose, confirm};
pub use session::Session;
pub use terminal::Terminal;
