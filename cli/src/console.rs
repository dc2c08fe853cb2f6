//! Terminal abstraction used by every screen.
//!
//! Screens never touch the terminal directly. They talk to a [`Console`],
//! which the binary backs with crossterm and tests back with a script of
//! keys and answers.

use std::io;

/// A decoded keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Backspace,
    /// Escape: leave the current screen.
    Escape,
    /// Ctrl-C, Ctrl-X or Ctrl-Z: treated exactly like [`Key::Escape`].
    Interrupt,
    Char(char),
    Other,
}

impl Key {
    /// Returns `true` for keys that leave the current screen.
    pub fn is_abort(self) -> bool {
        matches!(self, Self::Escape | Self::Interrupt)
    }
}

/// Keyboard input and text output for one session.
pub trait Console {
    /// Blocks until the next keystroke.
    fn read_key(&mut self) -> io::Result<Key>;

    /// Reads one line of text after showing `label`.
    ///
    /// Returns `Ok(None)` if the user aborted with an abort key. An empty
    /// line is `Ok(Some(""))`.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>>;

    /// Prints text followed by a newline.
    fn show(&mut self, text: &str) -> io::Result<()>;

    /// Draws a menu with the entry at `selected` highlighted.
    fn render_menu(&mut self, title: &str, labels: &[&str], selected: usize) -> io::Result<()>;

    /// Clears the screen.
    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Waits for any key so the user can read what was shown.
    fn pause(&mut self) -> io::Result<()> {
        self.show("Press any key to continue...")?;
        self.read_key().map(|_| ())
    }
}
