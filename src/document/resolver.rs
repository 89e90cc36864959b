use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::store::FileStore;
use crate::error::{Error, Result};

/// A link target split into its file part and optional `#section`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget<'a> {
    pub file: &'a str,
    pub section: Option<&'a str>,
}

impl<'a> LinkTarget<'a> {
    pub fn parse(target: &'a str) -> Self {
        match target.split_once('#') {
            Some((file, section)) => Self {
                file,
                section: (!section.is_empty()).then_some(section),
            },
            None => Self { file: target, section: None },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub section: Option<String>,
    /// The file did not exist and was created empty.
    pub created: bool,
}

pub struct LinkResolver<'s> {
    store: &'s dyn FileStore,
}

impl<'s> LinkResolver<'s> {
    pub fn new(store: &'s dyn FileStore) -> Self {
        Self { store }
    }

    /// Absolute path and section for `target`, relative to the directory of
    /// the `containing` document. Does not touch the filesystem.
    pub fn resolve(&self, target: &str, containing: &Path) -> (PathBuf, Option<String>) {
        let parsed = LinkTarget::parse(target);
        let section = parsed.section.map(str::to_string);

        if parsed.file.is_empty() {
            return (normalize(containing), section);
        }

        let file = Path::new(parsed.file);
        let joined = if file.is_absolute() {
            file.to_path_buf()
        } else {
            containing.parent().unwrap_or(Path::new("")).join(file)
        };
        (normalize(&joined), section)
    }

    /// Resolve `target` and make sure the file exists, creating it empty if
    /// needed, so the host can open it.
    pub fn follow(&self, target: &str, containing: &Path) -> Result<Resolution> {
        let (path, section) = self.resolve(target, containing);
        let mut created = false;

        if !self.store.exists(&path) {
            self.store
                .create_empty_file(&path)
                .map_err(|err| unresolvable(target, &path, err))?;
            created = true;
            debug!(path = %path.display(), "created link target");
        }

        Ok(Resolution { path, section, created })
    }
}

fn unresolvable(target: &str, path: &Path, err: Error) -> Error {
    let source = match err {
        Error::Io { source, .. } => source,
        other => io::Error::other(other.to_string()),
    };
    Error::Unresolvable {
        target: target.to_string(),
        path: path.to_path_buf(),
        source,
    }
}

/// Collapse `.` and `..` components without consulting the filesystem.
/// `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
