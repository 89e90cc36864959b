mod address_bar;
mod editor;
mod sidebar;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;

pub use address_bar::render_address_bar;
pub use editor::render_editor;
pub use sidebar::render_sidebar;
pub use status_bar::render_status_bar;

pub fn render(f: &mut Frame, app: &mut App) {
    // Address bar, main area, status bar
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(app.config.editor.nav_width),
            Constraint::Min(10),
        ])
        .split(vertical_chunks[1]);

    render_address_bar(f, app, vertical_chunks[0]);
    render_sidebar(f, app, chunks[0]);
    render_editor(f, app, chunks[1]);
    render_status_bar(f, app, vertical_chunks[2]);
}
