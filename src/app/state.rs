use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::config::Config;
use crate::document::{normalize, Document, FileStore, LinkResolver};
use crate::editor::{Command, Outcome, Position};
use crate::error::{Error, Result};
use crate::theme::Theme;

const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    AddressBar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
    pub expires_at: SystemTime,
}

/// Screen regions from the last frame, used to route mouse events.
#[derive(Debug, Clone, Copy, Default)]
pub struct Areas {
    pub address: Rect,
    pub nav: Rect,
    pub editor: Rect,
}

/// Pointer state for the navigation panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavPointer {
    pub hovered: Option<usize>,
    pub pressed: Option<usize>,
}

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub focus: Focus,
    pub address: String,
    pub nav: NavPointer,
    pub areas: Areas,
    /// First grid row shown in the editor pane.
    pub scroll: usize,
    pub notification: Option<Notification>,
    pub should_quit: bool,
    store: Box<dyn FileStore>,
    documents: Vec<Document>,
    current: Option<usize>,
}

impl App {
    pub fn new(config: Config, store: Box<dyn FileStore>) -> Self {
        let theme = Theme::from_config(&config.theme);
        let address = config.wiki_path().to_string_lossy().to_string();
        Self {
            config,
            theme,
            focus: Focus::AddressBar,
            address,
            nav: NavPointer::default(),
            areas: Areas::default(),
            scroll: 0,
            notification: None,
            should_quit: false,
            store,
            documents: Vec::new(),
            current: None,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_document(&self) -> Option<&Document> {
        self.current.and_then(|idx| self.documents.get(idx))
    }

    pub fn current_document_mut(&mut self) -> Option<&mut Document> {
        self.current.and_then(move |idx| self.documents.get_mut(idx))
    }

    /// Open `path` and make it current. A path that does not exist is
    /// ignored; one already open is just switched to.
    pub fn open(&mut self, path: &Path, now: SystemTime) -> Result<bool> {
        let path = absolute(path);

        if let Some(idx) = self.documents.iter().position(|d| d.path() == path) {
            self.switch_to(idx);
            return Ok(true);
        }

        let document = match Document::open(&path, self.store.as_ref(), now) {
            Ok(document) => document,
            Err(Error::MissingFile(path)) => {
                debug!(path = %path.display(), "ignoring open of missing file");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        let document = document
            .with_tab_width(self.config.editor.tab_width as usize)
            .with_check_interval(Duration::from_millis(self.config.editor.check_interval_ms));
        self.documents.push(document);
        self.switch_to(self.documents.len() - 1);
        Ok(true)
    }

    pub fn switch_to(&mut self, idx: usize) {
        if idx >= self.documents.len() {
            return;
        }
        if self.current != Some(idx) {
            self.scroll = 0;
        }
        self.current = Some(idx);
        self.address = self.documents[idx].path().to_string_lossy().to_string();
        self.focus = Focus::Editor;
    }

    pub fn notify(&mut self, message: impl Into<String>, is_error: bool, now: SystemTime) {
        let message = message.into();
        if is_error {
            warn!("{}", message);
        }
        self.notification = Some(Notification {
            message,
            is_error,
            expires_at: now + NOTIFICATION_TTL,
        });
    }

    /// Run an editing command on the current document.
    pub fn execute(&mut self, command: Command, now: SystemTime) -> Outcome {
        let Some(idx) = self.current else {
            return Outcome::Unchanged;
        };
        let result = self.documents[idx].execute(command, self.store.as_ref(), now);
        match result {
            Ok(outcome) => {
                if command == Command::Save {
                    let name = self.documents[idx].display_name().to_string();
                    self.notify(format!("Saved {}", name), false, now);
                }
                outcome
            }
            Err(err) => {
                self.notify(err.to_string(), true, now);
                Outcome::Unchanged
            }
        }
    }

    /// Feed a pointer sample over the editor pane (`None` when elsewhere).
    /// A release over a link follows it.
    pub fn editor_pointer(&mut self, cell: Option<Position>, left_down: bool, now: SystemTime) {
        let Some(document) = self.current_document_mut() else {
            return;
        };
        if let Some(target) = document.pointer(cell, left_down) {
            self.follow_link(&target, now);
        }
    }

    pub fn follow_link(&mut self, target: &str, now: SystemTime) {
        let Some(containing) = self.current_document().map(|d| d.path().to_path_buf()) else {
            return;
        };
        let resolution = LinkResolver::new(self.store.as_ref()).follow(target, &containing);
        let opened = resolution.and_then(|resolution| self.open(&resolution.path, now));
        if let Err(err) = opened {
            self.notify(err.to_string(), true, now);
        }
    }

    /// Feed a pointer sample over the navigation panel; `row` is the entry
    /// under the pointer. Releasing over the entry that was pressed switches
    /// to it.
    pub fn nav_pointer(&mut self, row: Option<usize>, left_down: bool) {
        let row = row.filter(|&r| r < self.documents.len());
        let was_down = self.nav.pressed.is_some();

        if left_down && !was_down {
            self.nav.pressed = row;
        } else if !left_down {
            if let (Some(pressed), Some(row)) = (self.nav.pressed, row) {
                if pressed == row {
                    self.switch_to(row);
                }
            }
            self.nav.pressed = None;
        }
        self.nav.hovered = row;
    }

    pub fn focus_address_bar(&mut self) {
        self.focus = Focus::AddressBar;
    }

    pub fn focus_editor(&mut self) {
        if self.current.is_some() {
            self.focus = Focus::Editor;
        }
        if let Some(doc) = self.current_document() {
            self.address = doc.path().to_string_lossy().to_string();
        }
    }

    pub fn address_input(&mut self, c: char) {
        self.address.push(c);
    }

    pub fn address_backspace(&mut self) {
        self.address.pop();
    }

    pub fn submit_address(&mut self, now: SystemTime) {
        let path = PathBuf::from(shellexpand::tilde(self.address.trim()).to_string());
        if let Err(err) = self.open(&path, now) {
            self.notify(err.to_string(), true, now);
        }
    }

    /// Periodic work after input: document save-state checks and
    /// notification expiry.
    pub fn tick(&mut self, now: SystemTime) {
        for document in &mut self.documents {
            document.tick(self.store.as_ref(), now);
        }
        if self.notification.as_ref().is_some_and(|n| n.expires_at <= now) {
            self.notification = None;
        }
    }

    /// Keep the cursor row inside a pane `height` rows tall.
    pub fn scroll_to(&mut self, cursor_row: usize, height: usize) {
        let height = height.max(1);
        if cursor_row < self.scroll {
            self.scroll = cursor_row;
        } else if cursor_row >= self.scroll + height {
            self.scroll = cursor_row + 1 - height;
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => normalize(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tests::{at, MemoryStore};
    use crate::document::SaveState;

    fn app_with(files: &[(&str, &str)]) -> App {
        let store = MemoryStore::new(at(0));
        for (path, text) in files {
            store.write_all_text(Path::new(path), text).unwrap();
        }
        App::new(Config::default(), Box::new(store))
    }

    #[test]
    fn test_open_missing_is_ignored() {
        let mut app = app_with(&[]);
        assert!(!app.open(Path::new("/wiki/none.txt"), at(0)).unwrap());
        assert!(app.documents().is_empty());
        assert!(app.current_document().is_none());
    }

    #[test]
    fn test_open_switches_and_dedupes() {
        let mut app = app_with(&[("/wiki/a.txt", "A"), ("/wiki/b.txt", "B")]);
        app.open(Path::new("/wiki/a.txt"), at(0)).unwrap();
        app.open(Path::new("/wiki/b.txt"), at(0)).unwrap();
        assert_eq!(app.current_index(), Some(1));

        app.open(Path::new("/wiki/./sub/../a.txt"), at(0)).unwrap();
        assert_eq!(app.documents().len(), 2);
        assert_eq!(app.current_index(), Some(0));
        assert_eq!(app.address, "/wiki/a.txt");
        assert_eq!(app.focus, Focus::Editor);
    }

    #[test]
    fn test_edit_and_save_through_app() {
        let mut app = app_with(&[("/wiki/a.txt", "")]);
        app.open(Path::new("/wiki/a.txt"), at(0)).unwrap();
        assert_eq!(app.execute(Command::InsertChar('h'), at(10)), Outcome::Edited);
        app.tick(at(10));
        assert_eq!(app.current_document().unwrap().state(), SaveState::Dirty);

        app.execute(Command::Save, at(20));
        app.tick(at(20));
        assert_eq!(app.current_document().unwrap().state(), SaveState::Clean);
        assert!(app.notification.as_ref().is_some_and(|n| !n.is_error));

        app.tick(at(20) + NOTIFICATION_TTL);
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_following_link_creates_and_opens_target() {
        let mut app = app_with(&[("/wiki/a.txt", "[[b.txt#Intro|B]]")]);
        app.open(Path::new("/wiki/a.txt"), at(0)).unwrap();
        app.current_document_mut().unwrap().layout(40);

        app.editor_pointer(Some(Position::new(0, 0)), true, at(5));
        app.editor_pointer(Some(Position::new(0, 0)), false, at(5));

        assert_eq!(app.documents().len(), 2);
        let current = app.current_document().unwrap();
        assert_eq!(current.path(), Path::new("/wiki/b.txt"));
        assert_eq!(current.text(), "");
    }

    #[test]
    fn test_nav_release_switches_document() {
        let mut app = app_with(&[("/wiki/a.txt", "A"), ("/wiki/b.txt", "B")]);
        app.open(Path::new("/wiki/a.txt"), at(0)).unwrap();
        app.open(Path::new("/wiki/b.txt"), at(0)).unwrap();

        app.nav_pointer(Some(0), false);
        assert_eq!(app.nav.hovered, Some(0));
        app.nav_pointer(Some(0), true);
        assert_eq!(app.nav.pressed, Some(0));
        assert_eq!(app.current_index(), Some(1));
        app.nav_pointer(Some(0), false);
        assert_eq!(app.current_index(), Some(0));
        assert_eq!(app.nav.pressed, None);
    }

    #[test]
    fn test_nav_release_elsewhere_does_not_switch() {
        let mut app = app_with(&[("/wiki/a.txt", "A"), ("/wiki/b.txt", "B")]);
        app.open(Path::new("/wiki/a.txt"), at(0)).unwrap();
        app.open(Path::new("/wiki/b.txt"), at(0)).unwrap();

        app.nav_pointer(Some(0), true);
        app.nav_pointer(Some(7), true);
        app.nav_pointer(None, false);
        assert_eq!(app.current_index(), Some(1));
    }

    #[test]
    fn test_address_bar_opens_typed_path() {
        let mut app = app_with(&[("/wiki/c.txt", "C")]);
        app.address.clear();
        for c in "/wiki/c.txq".chars() {
            app.address_input(c);
        }
        app.address_backspace();
        app.address_input('t');
        app.submit_address(at(0));
        assert_eq!(app.current_document().map(|d| d.text()), Some("C".to_string()));

        app.focus_address_bar();
        app.address = "/wiki/missing.txt".to_string();
        app.submit_address(at(1));
        assert_eq!(app.documents().len(), 1);
        assert_eq!(app.current_index(), Some(0));
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_scroll_keeps_cursor_visible() {
        let mut app = app_with(&[]);
        app.scroll_to(10, 5);
        assert_eq!(app.scroll, 6);
        app.scroll_to(8, 5);
        assert_eq!(app.scroll, 6);
        app.scroll_to(2, 5);
        assert_eq!(app.scroll, 2);
    }
}
