use unicode_width::UnicodeWidthChar;

use super::cursor::Position;
use super::link::LinkSpan;

/// Folded view of the raw text for one cursor position.
///
/// Both index maps are monotonic: folding only hides runs of raw
/// characters, it never reorders them.
#[derive(Debug, Clone)]
pub struct Projection {
    visual: Vec<char>,
    owners: Vec<Option<usize>>,
    raw_to_visual: Vec<usize>,
    visual_to_raw: Vec<usize>,
    spans: Vec<LinkSpan>,
    cursor_visual: usize,
}

impl Projection {
    /// Single left-to-right pass over the raw text and its link spans.
    pub fn build(raw: &[char], spans: Vec<LinkSpan>, cursor: usize) -> Self {
        let mut builder = Builder {
            raw,
            visual: Vec::with_capacity(raw.len()),
            owners: Vec::with_capacity(raw.len()),
            raw_to_visual: vec![0; raw.len() + 1],
            visual_to_raw: Vec::with_capacity(raw.len() + 1),
        };

        let mut next = 0;
        for (idx, span) in spans.iter().enumerate() {
            builder.emit(next..span.raw_start, None);

            if span.is_folded_at(cursor) {
                let label_start = span.label_start();
                let label_end = span.raw_end - 2;
                builder.hide(span.raw_start..label_start);
                builder.emit(label_start..label_end, Some(idx));
                builder.hide(label_end..span.raw_end);
            } else {
                builder.emit(span.raw_start..span.raw_end, Some(idx));
            }
            next = span.raw_end;
        }
        builder.emit(next..raw.len(), None);

        let mut raw_to_visual = builder.raw_to_visual;
        let mut visual_to_raw = builder.visual_to_raw;
        raw_to_visual[raw.len()] = builder.visual.len();
        visual_to_raw.push(raw.len());

        let cursor_visual = raw_to_visual[cursor.min(raw.len())];
        Self {
            visual: builder.visual,
            owners: builder.owners,
            raw_to_visual,
            visual_to_raw,
            spans,
            cursor_visual,
        }
    }

    pub fn visual(&self) -> &[char] {
        &self.visual
    }

    pub fn visual_text(&self) -> String {
        self.visual.iter().collect()
    }

    pub fn spans(&self) -> &[LinkSpan] {
        &self.spans
    }

    pub fn cursor_visual(&self) -> usize {
        self.cursor_visual
    }

    pub fn to_visual(&self, raw: usize) -> usize {
        self.raw_to_visual[raw.min(self.raw_to_visual.len() - 1)]
    }

    pub fn to_raw(&self, visual: usize) -> usize {
        self.visual_to_raw[visual.min(self.visual_to_raw.len() - 1)]
    }

    /// Index into `spans()` of the link drawn at a visual cell.
    pub fn owner(&self, visual: usize) -> Option<usize> {
        self.owners.get(visual).copied().flatten()
    }
}

struct Builder<'a> {
    raw: &'a [char],
    visual: Vec<char>,
    owners: Vec<Option<usize>>,
    raw_to_visual: Vec<usize>,
    visual_to_raw: Vec<usize>,
}

impl Builder<'_> {
    fn emit(&mut self, range: std::ops::Range<usize>, owner: Option<usize>) {
        for raw in range {
            self.raw_to_visual[raw] = self.visual.len();
            self.visual_to_raw.push(raw);
            self.visual.push(self.raw[raw]);
            self.owners.push(owner);
        }
    }

    fn hide(&mut self, range: std::ops::Range<usize>) {
        for raw in range {
            self.raw_to_visual[raw] = self.visual.len();
        }
    }
}

// ==================== Render grid ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Normal,
    Link,
    Cursor,
    LinkHover,
    LinkPressed,
}

/// Transient pointer state over links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkHover {
    pub target: Option<String>,
    pub pointer_down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub visual: usize,
    pub link: Option<usize>,
    pub style: CellStyle,
}

/// Terminal columns a cell occupies. Control characters take one.
fn cell_width(ch: char) -> usize {
    ch.width().unwrap_or(1)
}

/// The visual buffer hard-wrapped into rows of at most `width` terminal
/// columns.
///
/// A `Position` on the grid is a screen column, not an index into the row:
/// a double-width glyph covers two columns and a zero-width one none.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    rows: Vec<Vec<Cell>>,
    row_ends: Vec<usize>,
    row_width: usize,
    cursor: Position,
}

impl Grid {
    pub fn layout(projection: &Projection, width: usize, hover: &LinkHover) -> Self {
        let width = width.max(1);
        let cursor_visual = projection.cursor_visual();
        let visual = projection.visual();

        let mut grid = Self {
            width,
            rows: vec![Vec::new()],
            row_ends: Vec::new(),
            row_width: 0,
            cursor: Position::default(),
        };

        for (v, &ch) in visual.iter().enumerate() {
            if ch == '\n' {
                if v == cursor_visual {
                    grid.push_cursor_cell(v);
                }
                grid.end_row(v);
                continue;
            }

            let cols = cell_width(ch);
            if grid.row_width > 0 && grid.row_width + cols > width {
                grid.end_row(v);
            }

            let link = projection.owner(v);
            let style = if v == cursor_visual {
                grid.cursor = grid.next_position();
                CellStyle::Cursor
            } else {
                link_style(projection, link, hover)
            };
            grid.current_row().push(Cell { ch, visual: v, link, style });
            grid.row_width += cols;

            if grid.row_width >= width {
                grid.end_row(v + 1);
            }
        }

        if cursor_visual == visual.len() {
            grid.push_cursor_cell(visual.len());
        }
        grid.row_ends.push(visual.len());
        grid
    }

    fn current_row(&mut self) -> &mut Vec<Cell> {
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    fn next_position(&self) -> Position {
        Position::new(self.rows.len() - 1, self.row_width)
    }

    fn push_cursor_cell(&mut self, visual: usize) {
        self.cursor = self.next_position();
        self.current_row().push(Cell {
            ch: ' ',
            visual,
            link: None,
            style: CellStyle::Cursor,
        });
        self.row_width += 1;
    }

    fn end_row(&mut self, end: usize) {
        self.row_ends.push(end);
        self.rows.push(Vec::new());
        self.row_width = 0;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// The cell drawn at a screen column, if any.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.row_cells(pos.row)
            .find(|(col, cell)| (*col..*col + cell_width(cell.ch)).contains(&pos.col))
            .map(|(_, cell)| cell)
    }

    /// Every cell with the screen position of its first column.
    pub fn positioned(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        (0..self.rows.len()).flat_map(move |row| {
            self.row_cells(row).map(move |(col, cell)| (Position::new(row, col), cell))
        })
    }

    fn row_cells(&self, row: usize) -> impl Iterator<Item = (usize, &Cell)> + '_ {
        let cells = self.rows.get(row).map(Vec::as_slice).unwrap_or_default();
        cells.iter().scan(0, |col, cell| {
            let start = *col;
            *col += cell_width(cell.ch);
            Some((start, cell))
        })
    }

    /// Visual index where a row stops (its newline, or the wrap point).
    pub fn row_end(&self, row: usize) -> Option<usize> {
        self.row_ends.get(row).copied()
    }

    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|cells| cells.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }
}

fn link_style(projection: &Projection, link: Option<usize>, hover: &LinkHover) -> CellStyle {
    let Some(idx) = link else {
        return CellStyle::Normal;
    };
    let hovered = hover.target.as_deref() == Some(projection.spans()[idx].target.as_str());
    match (hovered, hover.pointer_down) {
        (true, true) => CellStyle::LinkPressed,
        (true, false) => CellStyle::LinkHover,
        _ => CellStyle::Link,
    }
}
