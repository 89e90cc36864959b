use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "LINKPAD_LOG";
pub const LOG_FILE: &str = "linkpad.log";

/// Send tracing output to `dir/linkpad.log`; the terminal belongs to the UI.
///
/// The returned guard must live as long as the program or buffered lines are
/// lost. `None` when the log file cannot be opened or a subscriber is already
/// installed.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    let file_appender = file_appender(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|_| guard)
}

/// A single never-rotated log file in `dir`, creating `dir` if needed.
fn file_appender(dir: &Path) -> Option<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)
        .map_err(|err| eprintln!("linkpad: logging disabled: {}", err))
        .ok()
}

pub fn install_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(target: "linkpad::panic", %info, "panic");
        default_panic(info);
    }));
}
