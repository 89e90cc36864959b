use std::env;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use linkpad::app::App;
use linkpad::config::Config;
use linkpad::document::DiskStore;
use linkpad::event::run_app;
use linkpad::logging;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!("linkpad {}", VERSION);
    println!("A plain-text personal wiki editor for the terminal");
    println!();
    println!("USAGE:");
    println!("    linkpad [OPTIONS] [FILE]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print help information");
    println!("    -v, --version    Print version information");
    println!("    -c, --config     Print config file path");
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut file = None;
    if args.len() > 1 {
        match args[1].as_str() {
            "-v" | "--version" => {
                println!("linkpad {}", VERSION);
                return Ok(());
            }
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            "-c" | "--config" => {
                println!("{}", Config::config_path().display());
                return Ok(());
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                eprintln!("Run 'linkpad --help' for usage information");
                return Ok(());
            }
            arg => file = Some(PathBuf::from(arg)),
        }
    }

    let config = Config::load_or_create();
    let _log_guard = logging::init(&Config::config_dir());
    logging::install_panic_hook();
    info!(version = VERSION, "starting linkpad");

    let mut app = App::new(config, Box::new(DiskStore));
    if let Some(path) = file {
        let now = SystemTime::now();
        match app.open(&path, now) {
            Ok(true) => {}
            Ok(false) => app.address = path.to_string_lossy().to_string(),
            Err(err) => app.notify(err.to_string(), true, now),
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    info!("exiting");

    Ok(())
}
