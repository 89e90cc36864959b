use std::io;
use std::time::{Duration, SystemTime};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use super::input::{address_action, editor_action, AddressAction, EditorAction};
use crate::app::{App, Focus};
use crate::editor::Position;
use crate::ui;

const TICK: Duration = Duration::from_millis(50);

/// Poll input, apply it, tick documents, draw. Repeats until quit.
pub fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    terminal.draw(|f| ui::render(f, app))?;

    while !app.should_quit {
        if event::poll(TICK)? {
            process_events(app)?;
        }
        app.tick(SystemTime::now());
        terminal.draw(|f| ui::render(f, app))?;
    }
    Ok(())
}

// Drain everything already queued so one frame covers a burst of input.
fn process_events(app: &mut App) -> io::Result<()> {
    const MAX_EVENTS_PER_BATCH: u8 = 32;
    let mut count = 0u8;

    loop {
        let event = event::read()?;
        count += 1;
        let now = SystemTime::now();

        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key, now),
            Event::Mouse(mouse) => handle_mouse_event(app, mouse, now),
            _ => {}
        }

        if app.should_quit || count >= MAX_EVENTS_PER_BATCH || !event::poll(Duration::ZERO)? {
            break;
        }
    }

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent, now: SystemTime) {
    match app.focus {
        Focus::Editor => match editor_action(key) {
            Some(EditorAction::Edit(command)) => {
                app.execute(command, now);
            }
            Some(EditorAction::FocusAddressBar) => app.focus_address_bar(),
            Some(EditorAction::Quit) => app.should_quit = true,
            None => {}
        },
        Focus::AddressBar => match address_action(key) {
            Some(AddressAction::Insert(c)) => app.address_input(c),
            Some(AddressAction::Backspace) => app.address_backspace(),
            Some(AddressAction::Submit) => app.submit_address(now),
            Some(AddressAction::Cancel) => app.focus_editor(),
            Some(AddressAction::Quit) => app.should_quit = true,
            None => {}
        },
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent, now: SystemTime) {
    let left_down = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => true,
        MouseEventKind::Up(MouseButton::Left) | MouseEventKind::Moved => false,
        _ => return,
    };
    let pressed = mouse.kind == MouseEventKind::Down(MouseButton::Left);
    let (x, y) = (mouse.column, mouse.row);
    let areas = app.areas;

    if pressed && contains(areas.address, x, y) {
        app.focus_address_bar();
    }

    let nav = inner(areas.nav);
    let nav_row = contains(nav, x, y).then(|| (y - nav.y) as usize);
    app.nav_pointer(nav_row, left_down);

    let editor = inner(areas.editor);
    let cell = contains(editor, x, y)
        .then(|| Position::new((y - editor.y) as usize + app.scroll, (x - editor.x) as usize));
    if pressed && cell.is_some() {
        app.focus_editor();
    }
    app.editor_pointer(cell, left_down, now);
}

fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}
