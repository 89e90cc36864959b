//! Plain-text personal wiki editor.
//!
//! `[[target]]` and `[[target|label]]` links fold to their label unless the
//! cursor sits in the target. The core (`editor`, `document`) knows nothing
//! about terminals; `app`, `event` and `ui` host it in a ratatui shell.

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod event;
pub mod logging;
pub mod theme;
pub mod ui;

pub use document::{Document, DiskStore, FileStore, LinkResolver, Resolution, SaveState};
pub use editor::{Command, Editor, Grid, Outcome, Position, Projection, TextBuffer};
pub use error::{Error, Result};
