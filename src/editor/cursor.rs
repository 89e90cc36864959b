use super::buffer::TextBuffer;
use crate::error::Result;

/// A cell on the rendered grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Logical editing commands. Key codes are translated into these outside the
/// core, so nothing here knows about a particular input library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    WordLeft,
    WordRight,
    Home,
    End,
    MoveUp,
    MoveDown,
    Backspace,
    WordBackspace,
    Enter,
    Tab,
    InsertChar(char),
    Save,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Moved,
    Edited,
}

#[derive(Debug, Clone)]
pub struct Cursor {
    index: usize,
    column_memory: usize,
    tab_width: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            index: 0,
            column_memory: 0,
            tab_width: 4,
        }
    }

    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn column_memory(&self) -> usize {
        self.column_memory
    }

    /// Place the cursor at a raw index (clamped) and remember its column.
    pub fn set_position(&mut self, buffer: &TextBuffer, index: usize) {
        self.index = index.min(buffer.len());
        self.remember_column(buffer);
    }

    fn remember_column(&mut self, buffer: &TextBuffer) {
        self.column_memory = buffer.column(self.index);
    }

    pub fn apply(&mut self, buffer: &mut TextBuffer, command: Command) -> Result<Outcome> {
        self.index = self.index.min(buffer.len());
        let before = self.index;

        let edited = match command {
            Command::MoveLeft => {
                self.index = self.index.saturating_sub(1);
                false
            }
            Command::MoveRight => {
                self.index = (self.index + 1).min(buffer.len());
                false
            }
            Command::WordLeft => {
                self.index = word_left(buffer.chars(), self.index);
                false
            }
            Command::WordRight => {
                self.index = word_right(buffer.chars(), self.index);
                false
            }
            Command::Home => {
                self.index = buffer.line_start(self.index);
                false
            }
            Command::End => {
                // Falls back to 0 on the last line; kept as documented.
                self.index = buffer.next_line_start(self.index).unwrap_or(0);
                false
            }
            Command::MoveUp => {
                self.index = match buffer.prev_line_start(self.index) {
                    Some(start) => start + self.column_memory.min(buffer.line_len(start)),
                    None => 0,
                };
                return Ok(moved_or_unchanged(before, self.index));
            }
            Command::MoveDown => {
                self.index = match buffer.next_line_start(self.index) {
                    Some(start) => start + self.column_memory.min(buffer.line_len(start)),
                    None => buffer.len(),
                };
                return Ok(moved_or_unchanged(before, self.index));
            }
            Command::Backspace => {
                if self.index == 0 {
                    false
                } else {
                    self.index -= 1;
                    buffer.delete(self.index, 1)?;
                    true
                }
            }
            Command::WordBackspace => {
                if self.index == 0 {
                    false
                } else {
                    let start = match buffer.char_at(self.index - 1) {
                        Some(' ') => self.index - 1,
                        _ => word_run_start(buffer.chars(), self.index),
                    };
                    buffer.delete(start, self.index - start)?;
                    self.index = start;
                    true
                }
            }
            Command::Enter => {
                let indent = buffer.indent_before(self.index);
                let text = format!("\n{}", " ".repeat(indent));
                self.index += buffer.insert(self.index, &text)?;
                true
            }
            Command::Tab => {
                self.index += buffer.insert(self.index, &" ".repeat(self.tab_width))?;
                true
            }
            Command::InsertChar(c) => {
                let mut encoded = [0u8; 4];
                self.index += buffer.insert(self.index, c.encode_utf8(&mut encoded))?;
                true
            }
            Command::Save => return Ok(Outcome::Unchanged),
        };

        self.remember_column(buffer);
        if edited {
            Ok(Outcome::Edited)
        } else {
            Ok(moved_or_unchanged(before, self.index))
        }
    }
}

fn moved_or_unchanged(before: usize, after: usize) -> Outcome {
    if before == after {
        Outcome::Unchanged
    } else {
        Outcome::Moved
    }
}

/// Step left until a space has just been crossed or the buffer start is hit.
pub fn word_left(chars: &[char], at: usize) -> usize {
    let mut pos = at.min(chars.len());
    while pos > 0 {
        pos -= 1;
        if chars[pos] == ' ' {
            break;
        }
    }
    pos
}

/// Step right across non-space characters, stopping just before the next space.
pub fn word_right(chars: &[char], at: usize) -> usize {
    let len = chars.len();
    let mut pos = at.min(len);
    while pos + 1 < len && chars[pos + 1] != ' ' {
        pos += 1;
    }
    if pos < len {
        pos += 1;
    }
    pos
}

/// Start of the run of non-space characters ending at `at`.
pub fn word_run_start(chars: &[char], at: usize) -> usize {
    let mut pos = at.min(chars.len());
    while pos > 0 && chars[pos - 1] != ' ' {
        pos -= 1;
    }
    pos
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::MoveLeft),
            Just(Command::MoveRight),
            Just(Command::WordLeft),
            Just(Command::WordRight),
            Just(Command::Home),
            Just(Command::End),
            Just(Command::MoveUp),
            Just(Command::MoveDown),
            Just(Command::Backspace),
            Just(Command::WordBackspace),
            Just(Command::Enter),
            Just(Command::Tab),
            Just(Command::Save),
            prop_oneof![Just('['), Just(']'), Just('|'), Just('\n'), Just(' '), prop::char::range('a', 'c')]
                .prop_map(Command::InsertChar),
        ]
    }

    proptest! {
        #[test]
        fn prop_commands_never_fail(
            text in "[ab \\[\\]|\n]{0,40}",
            start in 0usize..50,
            commands in prop::collection::vec(command(), 0..100),
        ) {
            let mut buffer = TextBuffer::from(text.as_str());
            let mut cursor = Cursor::new();
            cursor.set_position(&buffer, start);
            prop_assert!(cursor.index() <= buffer.len());

            for command in commands {
                prop_assert!(cursor.apply(&mut buffer, command).is_ok());
                prop_assert!(cursor.index() <= buffer.len());
            }
        }
    }
}
