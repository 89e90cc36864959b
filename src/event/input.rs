use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::editor::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Edit(Command),
    FocusAddressBar,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressAction {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
    Quit,
}

/// Keys while the editor pane has focus. Unknown chords map to `None`.
pub fn editor_action(key: KeyEvent) -> Option<EditorAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let command = match key.code {
        KeyCode::Char('q') if ctrl => return Some(EditorAction::Quit),
        KeyCode::Char('l') if ctrl => return Some(EditorAction::FocusAddressBar),
        KeyCode::Char('s') if ctrl => Command::Save,
        // Many terminals report Ctrl+Backspace as Ctrl+H.
        KeyCode::Char('h') if ctrl => Command::WordBackspace,
        KeyCode::Char(c) if !ctrl && !alt => Command::InsertChar(c),
        KeyCode::Left if ctrl => Command::WordLeft,
        KeyCode::Right if ctrl => Command::WordRight,
        KeyCode::Left => Command::MoveLeft,
        KeyCode::Right => Command::MoveRight,
        KeyCode::Up => Command::MoveUp,
        KeyCode::Down => Command::MoveDown,
        KeyCode::Home => Command::Home,
        KeyCode::End => Command::End,
        KeyCode::Backspace if ctrl || alt => Command::WordBackspace,
        KeyCode::Backspace => Command::Backspace,
        KeyCode::Enter => Command::Enter,
        KeyCode::Tab if !ctrl && !alt => Command::Tab,
        _ => return None,
    };
    Some(EditorAction::Edit(command))
}

/// Keys while the address bar has focus.
pub fn address_action(key: KeyEvent) -> Option<AddressAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('q') if ctrl => Some(AddressAction::Quit),
        KeyCode::Char(c) if !ctrl && !alt => Some(AddressAction::Insert(c)),
        KeyCode::Backspace => Some(AddressAction::Backspace),
        KeyCode::Enter => Some(AddressAction::Submit),
        KeyCode::Esc => Some(AddressAction::Cancel),
        _ => None,
    }
}
