//! crossterm-backed [`Console`].
//!
//! Raw mode is held only while a key or a line is being read, so plain
//! output between reads behaves like ordinary terminal output.

use std::io::{self, Stdout, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use crossterm::{cursor, queue, terminal};

use crate::console::{Console, Key};

/// Menu footer listing the navigation keys.
const MENU_HINT: &str = "Up/Down move  Home/End jump  Enter select  Esc back";

/// Console on the process's own terminal.
pub struct Terminal {
    out: Stdout,
}

impl Terminal {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw mode for the lifetime of the guard.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Maps a crossterm key event to a [`Key`].
///
/// Ctrl-C, Ctrl-X and Ctrl-Z all become [`Key::Interrupt`].
pub fn map_key(event: KeyEvent) -> Key {
    match event.code {
        KeyCode::Char('c' | 'x' | 'z') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Key::Interrupt
        }
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => Key::Char(c),
        _ => Key::Other,
    }
}

/// Next key press, skipping releases, repeats and non-key events.
fn next_key_event() -> io::Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}

impl Console for Terminal {
    fn read_key(&mut self) -> io::Result<Key> {
        let _raw = RawMode::enable()?;
        next_key_event().map(map_key)
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;

        let _raw = RawMode::enable()?;
        let mut line = String::new();
        loop {
            match map_key(next_key_event()?) {
                Key::Enter => {
                    write!(self.out, "\r\n")?;
                    return Ok(Some(line));
                }
                Key::Escape | Key::Interrupt => {
                    write!(self.out, "\r\n")?;
                    return Ok(None);
                }
                Key::Backspace => {
                    if line.pop().is_some() {
                        write!(self.out, "\x08 \x08")?;
                    }
                }
                Key::Char(c) => {
                    line.push(c);
                    write!(self.out, "{c}")?;
                }
                _ => {}
            }
            self.out.flush()?;
        }
    }

    fn show(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    fn render_menu(&mut self, title: &str, labels: &[&str], selected: usize) -> io::Result<()> {
        self.clear()?;
        writeln!(self.out, "{}", title.bold())?;
        writeln!(self.out)?;
        for (index, label) in labels.iter().enumerate() {
            if index == selected {
                writeln!(self.out, "{}", format!("> {label}").reverse())?;
            } else {
                writeln!(self.out, "  {label}")?;
            }
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", MENU_HINT.dark_grey())?;
        self.out.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        self.out.flush()
    }
}
