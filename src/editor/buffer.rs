use crate::error::{Error, Result};

/// Raw character storage for one document.
///
/// Indices are character offsets, never byte offsets. The revision counter
/// bumps on every successful mutation so derived views know when to rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    chars: Vec<char>,
    revision: u64,
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            revision: 0,
        }
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn char_at(&self, at: usize) -> Option<char> {
        self.chars.get(at).copied()
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Insert `text` before raw index `at`. Returns the number of characters inserted.
    pub fn insert(&mut self, at: usize, text: &str) -> Result<usize> {
        let inserted: Vec<char> = text.chars().collect();
        if at > self.chars.len() {
            return Err(Error::OutOfRange {
                at,
                count: inserted.len(),
                len: self.chars.len(),
            });
        }

        let count = inserted.len();
        self.chars.splice(at..at, inserted);
        self.revision += 1;
        Ok(count)
    }

    /// Remove `count` characters starting at `at`, returning them.
    pub fn delete(&mut self, at: usize, count: usize) -> Result<String> {
        let end = at.checked_add(count).filter(|end| *end <= self.chars.len());
        let Some(end) = end else {
            return Err(Error::OutOfRange {
                at,
                count,
                len: self.chars.len(),
            });
        };

        let removed: String = self.chars.drain(at..end).collect();
        self.revision += 1;
        Ok(removed)
    }

    // ==================== Line math ====================

    /// Offset just after the nearest `\n` before `at`, or 0.
    pub fn line_start(&self, at: usize) -> usize {
        let mut index = at.min(self.chars.len());
        while index > 0 && self.chars[index - 1] != '\n' {
            index -= 1;
        }
        index
    }

    /// Start of the line following the one containing `at`.
    pub fn next_line_start(&self, at: usize) -> Option<usize> {
        let from = at.min(self.chars.len());
        self.chars[from..]
            .iter()
            .position(|c| *c == '\n')
            .map(|offset| from + offset + 1)
    }

    /// Start of the line preceding the one containing `at`.
    pub fn prev_line_start(&self, at: usize) -> Option<usize> {
        let start = self.line_start(at);
        if start == 0 {
            None
        } else {
            Some(self.line_start(start - 1))
        }
    }

    /// Characters between `start` and the next newline (or buffer end).
    pub fn line_len(&self, start: usize) -> usize {
        let from = start.min(self.chars.len());
        self.chars[from..]
            .iter()
            .take_while(|c| **c != '\n')
            .count()
    }

    pub fn column(&self, at: usize) -> usize {
        at.min(self.chars.len()) - self.line_start(at)
    }

    /// Leading spaces of the line containing `at`, counted up to `at`.
    ///
    /// Scanning backwards, any non-space resets the count, so only the run
    /// directly after the line start survives.
    pub fn indent_before(&self, at: usize) -> usize {
        let mut indent = 0;
        for c in self.chars[..at.min(self.chars.len())].iter().rev() {
            match c {
                ' ' => indent += 1,
                '\n' => return indent,
                _ => indent = 0,
            }
        }
        indent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = TextBuffer::from("hello");
        assert_eq!(buffer.insert(5, " world").unwrap(), 6);
        assert_eq!(buffer.read(), "hello world");
        assert_eq!(buffer.delete(0, 6).unwrap(), "hello ");
        assert_eq!(buffer.read(), "world");
        assert_eq!(buffer.revision(), 2);
    }

    #[test]
    fn test_out_of_range() {
        let mut buffer = TextBuffer::from("abc");
        assert!(matches!(
            buffer.insert(4, "x"),
            Err(Error::OutOfRange { at: 4, count: 1, len: 3 })
        ));
        assert!(matches!(buffer.delete(2, 2), Err(Error::OutOfRange { .. })));
        assert!(matches!(buffer.delete(usize::MAX, 2), Err(Error::OutOfRange { .. })));
        assert_eq!(buffer.read(), "abc");
        assert_eq!(buffer.revision(), 0);
    }

    #[test]
    fn test_multibyte_indices_are_chars() {
        let mut buffer = TextBuffer::from("héllo");
        buffer.insert(2, "x").unwrap();
        assert_eq!(buffer.read(), "héxllo");
        assert_eq!(buffer.char_at(1), Some('é'));
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn test_line_math() {
        let buffer = TextBuffer::from("abcdef\nxy\n123456");
        assert_eq!(buffer.line_start(9), 7);
        assert_eq!(buffer.line_start(7), 7);
        assert_eq!(buffer.line_start(6), 0);
        assert_eq!(buffer.next_line_start(3), Some(7));
        assert_eq!(buffer.next_line_start(7), Some(10));
        assert_eq!(buffer.next_line_start(12), None);
        assert_eq!(buffer.prev_line_start(12), Some(7));
        assert_eq!(buffer.prev_line_start(8), Some(0));
        assert_eq!(buffer.prev_line_start(3), None);
        assert_eq!(buffer.line_len(7), 2);
        assert_eq!(buffer.line_len(10), 6);
        assert_eq!(buffer.column(14), 4);
    }

    #[test]
    fn test_prev_line_from_trailing_empty_line() {
        let buffer = TextBuffer::from("ab\ncd\n");
        assert_eq!(buffer.prev_line_start(6), Some(3));
    }

    #[test]
    fn test_indent_before() {
        let buffer = TextBuffer::from("x\n    foo  bar");
        assert_eq!(buffer.indent_before(buffer.len()), 4);
        assert_eq!(buffer.indent_before(4), 2);
        assert_eq!(TextBuffer::from("   ").indent_before(3), 3);
        assert_eq!(TextBuffer::from("foo").indent_before(3), 0);
    }
}
