use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::error::{Error, Result};

/// File access the document layer needs. Every call is a complete,
/// standalone operation; nothing keeps a handle open.
pub trait FileStore {
    fn read_all_text(&self, path: &Path) -> Result<String>;
    fn write_all_text(&self, path: &Path, text: &str) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn last_modified(&self, path: &Path) -> Result<SystemTime>;
    fn create_empty_file(&self, path: &Path) -> Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl FileStore for DiskStore {
    fn read_all_text(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| Error::io(path, e))
    }

    fn write_all_text(&self, path: &Path, text: &str) -> Result<()> {
        fs::write(path, text).map_err(|e| Error::io(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn last_modified(&self, path: &Path) -> Result<SystemTime> {
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|e| Error::io(path, e))
    }

    fn create_empty_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map(|_| ())
            .map_err(|e| Error::io(path, e))
    }
}
