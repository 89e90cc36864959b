use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::cursor::Position;

/// One `[[target]]` or `[[target|label]]` occurrence in the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    pub target: String,
    pub label: Option<String>,
    /// Raw index of the first `[`.
    pub raw_start: usize,
    /// Raw index just past the closing `]]`.
    pub raw_end: usize,
    /// Grid cells this link occupied in the last layout.
    pub visual_cells: BTreeSet<Position>,
}

impl LinkSpan {
    pub fn target_len(&self) -> usize {
        self.target.chars().count()
    }

    /// Cursor positions that unfold the link: just after `[[` through just after `|`.
    pub fn target_region(&self) -> RangeInclusive<usize> {
        let start = self.raw_start + 2;
        start..=start + self.target_len() + 1
    }

    /// Raw index of the first label character (only meaningful with a label).
    pub fn label_start(&self) -> usize {
        self.raw_start + 2 + self.target_len() + 1
    }

    pub fn is_folded_at(&self, cursor: usize) -> bool {
        self.label.is_some() && !self.target_region().contains(&cursor)
    }
}

/// Find every link in `chars`, leftmost first, without overlaps.
///
/// An opening `[[` that never closes is left as plain text and scanning
/// continues from the next character.
pub fn scan(chars: &[char]) -> Vec<LinkSpan> {
    let mut links = Vec::new();
    let mut i = 0;

    while i + 1 < chars.len() {
        if chars[i] == '[' && chars[i + 1] == '[' {
            if let Some(link) = match_at(chars, i) {
                i = link.raw_end;
                links.push(link);
                continue;
            }
        }
        i += 1;
    }

    links
}

fn match_at(chars: &[char], start: usize) -> Option<LinkSpan> {
    let target_start = start + 2;
    let target_end = run_end(chars, target_start, &['[', ']', '|']);
    if target_end == target_start {
        return None;
    }

    let (label, closing) = match chars.get(target_end)? {
        '|' => {
            let label_start = target_end + 1;
            let label_end = run_end(chars, label_start, &['[', ']']);
            if label_end == label_start {
                return None;
            }
            (Some(collect(chars, label_start, label_end)), label_end)
        }
        ']' => (None, target_end),
        _ => return None,
    };

    if chars.get(closing) != Some(&']') || chars.get(closing + 1) != Some(&']') {
        return None;
    }

    Some(LinkSpan {
        target: collect(chars, target_start, target_end),
        label,
        raw_start: start,
        raw_end: closing + 2,
        visual_cells: BTreeSet::new(),
    })
}

fn run_end(chars: &[char], from: usize, stops: &[char]) -> usize {
    let mut end = from;
    while end < chars.len() && !stops.contains(&chars[end]) {
        end += 1;
    }
    end
}

fn collect(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end].iter().collect()
}
