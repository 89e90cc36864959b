mod resolver;
mod store;

pub use resolver::{normalize, LinkResolver, LinkTarget, Resolution};
pub use store::{DiskStore, FileStore};

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::editor::{Command, Editor, Grid, Outcome, Position};
use crate::error::{Error, Result};

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    /// Matches what was last loaded or saved.
    Clean,
    /// Edited locally or changed on disk since then.
    Dirty,
}

/// One open file: its editor plus save-state bookkeeping.
pub struct Document {
    path: PathBuf,
    editor: Editor,
    state: SaveState,
    pending_change: bool,
    last_saved_at: SystemTime,
    last_changed_at: SystemTime,
    last_checked_at: SystemTime,
    check_interval: Duration,
}

impl Document {
    pub fn open(path: impl AsRef<Path>, store: &dyn FileStore, now: SystemTime) -> Result<Self> {
        let path = path.as_ref();
        if !store.exists(path) {
            return Err(Error::MissingFile(path.to_path_buf()));
        }
        let text = store.read_all_text(path)?;
        debug!(path = %path.display(), chars = text.chars().count(), "document loaded");

        Ok(Self {
            path: path.to_path_buf(),
            editor: Editor::new(&text),
            state: SaveState::Clean,
            pending_change: false,
            last_saved_at: now,
            last_changed_at: now,
            last_checked_at: now,
            check_interval: DEFAULT_CHECK_INTERVAL,
        })
    }

    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.editor.set_tab_width(tab_width);
        self
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("[No Name]")
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SaveState::Dirty
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn text(&self) -> String {
        self.editor.text()
    }

    pub fn execute(&mut self, command: Command, store: &dyn FileStore, now: SystemTime) -> Result<Outcome> {
        if command == Command::Save {
            self.save(store, now)?;
            return Ok(Outcome::Unchanged);
        }

        let outcome = self.editor.apply(command)?;
        if outcome == Outcome::Edited {
            self.state = SaveState::Dirty;
            self.pending_change = true;
            self.last_changed_at = now;
        }
        Ok(outcome)
    }

    pub fn save(&mut self, store: &dyn FileStore, now: SystemTime) -> Result<()> {
        store.write_all_text(&self.path, &self.editor.text())?;
        // Never let our own write look like an external change.
        self.last_saved_at = store
            .last_modified(&self.path)
            .map_or(now, |modified| modified.max(now));
        self.state = SaveState::Clean;
        debug!(path = %self.path.display(), "document saved");
        Ok(())
    }

    /// Periodic bookkeeping, called once per host tick after input.
    ///
    /// Right after a local edit only timestamps are compared. Otherwise, at
    /// most once per check interval, the file's modification time is checked
    /// and a dirty buffer whose content hashes equal to disk is reconciled.
    pub fn tick(&mut self, store: &dyn FileStore, now: SystemTime) {
        if self.pending_change {
            self.pending_change = false;
            self.check_unsaved(store, now);
            return;
        }

        let elapsed = now.duration_since(self.last_checked_at).unwrap_or_default();
        if elapsed < self.check_interval {
            return;
        }

        self.check_unsaved(store, now);
        if self.state == SaveState::Dirty && self.matches_disk(store) {
            debug!(path = %self.path.display(), "buffer matches disk, marking clean");
            self.state = SaveState::Clean;
            self.last_saved_at = now;
        }
    }

    fn check_unsaved(&mut self, store: &dyn FileStore, now: SystemTime) {
        let disk_newer = match store.last_modified(&self.path) {
            Ok(modified) => modified > self.last_saved_at,
            Err(err) => {
                warn!(%err, "cannot stat document");
                true
            }
        };
        self.state = if disk_newer || self.last_changed_at > self.last_saved_at {
            SaveState::Dirty
        } else {
            SaveState::Clean
        };
        self.last_checked_at = now;
    }

    fn matches_disk(&self, store: &dyn FileStore) -> bool {
        match store.read_all_text(&self.path) {
            Ok(disk) => content_hash(&disk) == content_hash(&self.editor.text()),
            Err(err) => {
                warn!(%err, "cannot read document for comparison");
                false
            }
        }
    }

    pub fn layout(&mut self, width: usize) -> &Grid {
        self.editor.layout(width)
    }

    pub fn pointer(&mut self, cell: Option<Position>, left_down: bool) -> Option<String> {
        self.editor.pointer(cell, left_down)
    }
}

fn content_hash(text: &str) -> [u8; 32] {
    Sha256::digest(text.as_bytes()).into()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::io;
    use std::time::UNIX_EPOCH;

    /// In-memory files with a settable clock for modification times.
    pub(crate) struct MemoryStore {
        files: RefCell<HashMap<PathBuf, (String, SystemTime)>>,
        clock: Cell<SystemTime>,
    }

    impl MemoryStore {
        pub(crate) fn new(clock: SystemTime) -> Self {
            Self {
                files: RefCell::new(HashMap::new()),
                clock: Cell::new(clock),
            }
        }

        pub(crate) fn set_clock(&self, clock: SystemTime) {
            self.clock.set(clock);
        }

        pub(crate) fn contents(&self, path: &Path) -> Option<String> {
            self.files.borrow().get(path).map(|(text, _)| text.clone())
        }

        fn missing(path: &Path) -> Error {
            Error::io(path, io::Error::from(io::ErrorKind::NotFound))
        }
    }

    impl FileStore for MemoryStore {
        fn read_all_text(&self, path: &Path) -> Result<String> {
            self.contents(path).ok_or_else(|| Self::missing(path))
        }

        fn write_all_text(&self, path: &Path, text: &str) -> Result<()> {
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), (text.to_string(), self.clock.get()));
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.borrow().contains_key(path)
        }

        fn last_modified(&self, path: &Path) -> Result<SystemTime> {
            self.files
                .borrow()
                .get(path)
                .map(|(_, modified)| *modified)
                .ok_or_else(|| Self::missing(path))
        }

        fn create_empty_file(&self, path: &Path) -> Result<()> {
            if !self.exists(path) {
                self.write_all_text(path, "")?;
            }
            Ok(())
        }
    }

    pub(crate) fn at(millis: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_700_000_000) + Duration::from_millis(millis)
    }

    fn setup(text: &str) -> (MemoryStore, Document) {
        let store = MemoryStore::new(at(0));
        store.write_all_text(Path::new("/wiki/a.txt"), text).unwrap();
        let doc = Document::open("/wiki/a.txt", &store, at(0)).unwrap();
        (store, doc)
    }

    #[test]
    fn test_open_missing_file() {
        let store = MemoryStore::new(at(0));
        let result = Document::open("/wiki/none.txt", &store, at(0));
        assert!(matches!(result, Err(Error::MissingFile(_))));
    }

    #[test]
    fn test_open_is_clean() {
        let (store, mut doc) = setup("hello");
        assert_eq!(doc.text(), "hello");
        assert_eq!(doc.state(), SaveState::Clean);
        assert_eq!(doc.display_name(), "a.txt");
        doc.tick(&store, at(1500));
        assert_eq!(doc.state(), SaveState::Clean);
    }

    #[test]
    fn test_edit_marks_dirty() {
        let (store, mut doc) = setup("hello");
        doc.execute(Command::InsertChar('x'), &store, at(100)).unwrap();
        assert!(doc.is_dirty());
        doc.tick(&store, at(100));
        assert!(doc.is_dirty());
        doc.tick(&store, at(2000));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_motion_does_not_dirty() {
        let (store, mut doc) = setup("hello");
        doc.execute(Command::MoveRight, &store, at(100)).unwrap();
        doc.tick(&store, at(100));
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_save_then_check_is_clean() {
        for text in ["", "plain", "[[a|b]]\n  indented\n", "unicode ünïcödé"] {
            let (store, mut doc) = setup(text);
            doc.execute(Command::InsertChar('!'), &store, at(100)).unwrap();
            store.set_clock(at(200));
            doc.execute(Command::Save, &store, at(200)).unwrap();
            assert_eq!(store.contents(Path::new("/wiki/a.txt")), Some(format!("!{text}")));

            doc.tick(&store, at(200));
            assert_eq!(doc.state(), SaveState::Clean);
            doc.tick(&store, at(1300));
            assert_eq!(doc.state(), SaveState::Clean);
        }
    }

    #[test]
    fn test_save_with_late_disk_timestamp_stays_clean() {
        let (store, mut doc) = setup("x");
        doc.execute(Command::InsertChar('y'), &store, at(100)).unwrap();
        store.set_clock(at(900));
        doc.save(&store, at(100)).unwrap();
        doc.tick(&store, at(100));
        assert_eq!(doc.state(), SaveState::Clean);
    }

    #[test]
    fn test_external_change_is_throttled_then_detected() {
        let (store, mut doc) = setup("hello");
        store.set_clock(at(300));
        store.write_all_text(Path::new("/wiki/a.txt"), "changed elsewhere").unwrap();

        doc.tick(&store, at(500));
        assert_eq!(doc.state(), SaveState::Clean);
        doc.tick(&store, at(1000));
        assert_eq!(doc.state(), SaveState::Dirty);
    }

    #[test]
    fn test_touched_file_with_same_content_reconciles() {
        let (store, mut doc) = setup("hello");
        store.set_clock(at(300));
        store.write_all_text(Path::new("/wiki/a.txt"), "hello").unwrap();
        doc.tick(&store, at(1200));
        assert_eq!(doc.state(), SaveState::Clean);
    }

    #[test]
    fn test_edit_reverted_by_hand_reconciles() {
        let (store, mut doc) = setup("hello");
        doc.execute(Command::InsertChar('x'), &store, at(100)).unwrap();
        doc.execute(Command::Backspace, &store, at(150)).unwrap();
        doc.tick(&store, at(150));
        assert!(doc.is_dirty());
        doc.tick(&store, at(1200));
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_deleted_file_is_dirty() {
        let (store, mut doc) = setup("hello");
        store.files.borrow_mut().clear();
        doc.tick(&store, at(1500));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_on_disk_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("page.txt");
        std::fs::write(&path, "    foo").unwrap();

        let mut doc = Document::open(&path, &DiskStore, SystemTime::now()).unwrap();
        doc.editor_mut().set_cursor(7);
        doc.execute(Command::Enter, &DiskStore, SystemTime::now()).unwrap();
        doc.execute(Command::InsertChar('b'), &DiskStore, SystemTime::now()).unwrap();
        doc.execute(Command::Save, &DiskStore, SystemTime::now()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "    foo\n    b");
        doc.tick(&DiskStore, SystemTime::now() + Duration::from_secs(2));
        assert!(!doc.is_dirty());
    }
}
