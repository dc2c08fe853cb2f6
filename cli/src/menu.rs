//! Cyclic selection menus.
//!
//! A [`SelectMenu`] pairs display labels with actions. Up and Down wrap
//! around, Home and End jump to the ends, Enter commits the highlighted
//! action and any abort key leaves the menu without one. A menu always has
//! at least one entry.
//!
//! # Examples
//!
//! ```
//! use tabula_cli::{Key, MenuEvent, SelectMenu};
//!
//! let mut menu = SelectMenu::new("Pick", vec![("one", 1), ("two", 2), ("three", 3)]).unwrap();
//! assert_eq!(menu.handle(Key::Up), MenuEvent::Moved);
//! assert_eq!(menu.selected(), 2);
//! assert_eq!(menu.handle(Key::Enter), MenuEvent::Committed(3));
//!
//! assert!(SelectMenu::<u8>::new("Nothing", Vec::<(&str, u8)>::new()).is_none());
//! ```

use std::io;

use crate::console::{Console, Key};

/// Result of feeding one key to a [`SelectMenu`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent<A> {
    /// The highlight moved (or the key was ignored).
    Moved,
    /// Enter was pressed on this action.
    Committed(A),
    /// An abort key was pressed.
    Aborted,
}

/// Labeled actions with one highlighted entry.
#[derive(Debug, Clone)]
pub struct SelectMenu<A> {
    title: String,
    options: Vec<(String, A)>,
    selected: usize,
}

impl<A: Clone> SelectMenu<A> {
    /// Builds a menu with the first entry highlighted, or `None` when there
    /// is nothing to choose from.
    pub fn new<L: Into<String>>(title: impl Into<String>, options: Vec<(L, A)>) -> Option<Self> {
        if options.is_empty() {
            return None;
        }
        Some(Self {
            title: title.into(),
            options: options
                .into_iter()
                .map(|(label, action)| (label.into(), action))
                .collect(),
            selected: 0,
        })
    }

    /// Highlights `index`, clamped to the last entry.
    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected = index.min(self.options.len().saturating_sub(1));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// Applies one key.
    pub fn handle(&mut self, key: Key) -> MenuEvent<A> {
        let len = self.options.len();
        match key {
            Key::Escape | Key::Interrupt => return MenuEvent::Aborted,
            Key::Enter => {
                if let Some((_, action)) = self.options.get(self.selected) {
                    return MenuEvent::Committed(action.clone());
                }
            }
            Key::Up | Key::Left => self.selected = (self.selected + len - 1) % len,
            Key::Down | Key::Right => self.selected = (self.selected + 1) % len,
            Key::Home => self.selected = 0,
            Key::End => self.selected = len - 1,
            _ => {}
        }
        MenuEvent::Moved
    }

    /// Renders and reads keys until an action is committed.
    ///
    /// Returns `Ok(None)` when the user aborts.
    pub fn run<C: Console + ?Sized>(&mut self, console: &mut C) -> io::Result<Option<A>> {
        loop {
            console.render_menu(&self.title, &self.labels(), self.selected)?;
            match self.handle(console.read_key()?) {
                MenuEvent::Moved => {}
                MenuEvent::Committed(action) => return Ok(Some(action)),
                MenuEvent::Aborted => return Ok(None),
            }
        }
    }
}

/// Shows a one-off menu and returns the committed action.
///
/// `Ok(None)` if the user aborts or `options` is empty.
pub fn choose<C, L, A>(
    console: &mut C,
    title: impl Into<String>,
    options: Vec<(L, A)>,
) -> io::Result<Option<A>>
where
    C: Console + ?Sized,
    L: Into<String>,
    A: Clone,
{
    match SelectMenu::new(title, options) {
        Some(mut menu) => menu.run(console),
        None => Ok(None),
    }
}

/// Asks a yes/no question; `Ok(None)` if aborted.
pub fn confirm<C: Console + ?Sized>(console: &mut C, question: &str) -> io::Result<Option<bool>> {
    choose(console, question, vec![("No", false), ("Yes", true)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn three() -> SelectMenu<u8> {
        SelectMenu::new("t", vec![("a", 0), ("b", 1), ("c", 2)]).unwrap()
    }

    #[test]
    fn test_up_wraps_to_last() {
        let mut menu = three();
        assert_eq!(menu.handle(Key::Up), MenuEvent::Moved);
        assert_eq!(menu.selected(), 2);
    }

    #[test]
    fn test_down_wraps_to_first() {
        let mut menu = three();
        menu.handle(Key::Up);
        menu.handle(Key::Down);
        assert_eq!(menu.selected(), 0);
    }

    #[test]
    fn test_left_right_mirror_up_down() {
        let mut menu = three();
        menu.handle(Key::Left);
        assert_eq!(menu.selected(), 2);
        menu.handle(Key::Right);
        menu.handle(Key::Right);
        assert_eq!(menu.selected(), 1);
    }

    #[test]
    fn test_home_end() {
        let mut menu = three().with_selected(1);
        menu.handle(Key::End);
        assert_eq!(menu.selected(), 2);
        menu.handle(Key::Home);
        assert_eq!(menu.selected(), 0);
    }

    #[test]
    fn test_abort_keys() {
        let mut menu = three();
        assert_eq!(menu.handle(Key::Escape), MenuEvent::Aborted);
        assert_eq!(menu.handle(Key::Interrupt), MenuEvent::Aborted);
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let mut menu = three().with_selected(1);
        assert_eq!(menu.handle(Key::Char('j')), MenuEvent::Moved);
        assert_eq!(menu.handle(Key::Other), MenuEvent::Moved);
        assert_eq!(menu.selected(), 1);
    }

    #[test]
    fn test_with_selected_clamps() {
        assert_eq!(three().with_selected(9).selected(), 2);
    }

    #[test]
    fn test_empty_menu_is_refused() {
        assert!(SelectMenu::new("empty", Vec::<(&str, u8)>::new()).is_none());
        let single = SelectMenu::new("one", vec![("only", 7u8)]).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single.with_selected(3).selected(), 0);
    }

    struct Keys {
        keys: VecDeque<Key>,
        frames: Vec<usize>,
    }

    impl Console for Keys {
        fn read_key(&mut self) -> io::Result<Key> {
            Ok(self.keys.pop_front().unwrap_or(Key::Escape))
        }

        fn prompt(&mut self, _label: &str) -> io::Result<Option<String>> {
            Ok(None)
        }

        fn show(&mut self, _text: &str) -> io::Result<()> {
            Ok(())
        }

        fn render_menu(&mut self, _title: &str, _labels: &[&str], selected: usize) -> io::Result<()> {
            self.frames.push(selected);
            Ok(())
        }
    }

    #[test]
    fn test_run_commits_highlighted_action() {
        let mut console = Keys {
            keys: VecDeque::from([Key::Down, Key::Down, Key::Enter]),
            frames: Vec::new(),
        };
        assert_eq!(three().run(&mut console).unwrap(), Some(2));
        assert_eq!(console.frames, vec![0, 1, 2]);
    }

    #[test]
    fn test_confirm() {
        let mut console = Keys {
            keys: VecDeque::from([Key::Down, Key::Enter]),
            frames: Vec::new(),
        };
        assert_eq!(confirm(&mut console, "sure?").unwrap(), Some(true));
        assert_eq!(confirm(&mut console, "sure?").unwrap(), None);
    }

    #[test]
    fn test_choose_with_nothing_to_choose() {
        let mut console = Keys {
            keys: VecDeque::from([Key::Enter]),
            frames: Vec::new(),
        };
        let picked = choose(&mut console, "none", Vec::<(String, u8)>::new()).unwrap();
        assert_eq!(picked, None);
        assert!(console.frames.is_empty());
        assert_eq!(console.keys.len(), 1);
    }
}
