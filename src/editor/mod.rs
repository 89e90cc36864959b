mod buffer;
mod cursor;
mod link;
mod view;

pub use buffer::TextBuffer;
pub use cursor::{word_left, word_right, word_run_start, Command, Cursor, Outcome, Position};
pub use link::{scan, LinkSpan};
pub use view::{Cell, CellStyle, Grid, LinkHover, Projection};

use std::collections::HashMap;

use crate::error::Result;

/// Raw text, cursor and the derived folded view for one document.
///
/// The projection is rebuilt lazily: any edit or cursor move drops it, and
/// the next query recomputes it from scratch.
pub struct Editor {
    buffer: TextBuffer,
    cursor: Cursor,
    hover: LinkHover,
    projection: Option<Projection>,
    grid: Option<Grid>,
    width: Option<usize>,
    links: HashMap<String, LinkSpan>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new("")
    }
}

impl Editor {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: TextBuffer::from(text),
            cursor: Cursor::new(),
            hover: LinkHover::default(),
            projection: None,
            grid: None,
            width: None,
            links: HashMap::new(),
        }
    }

    pub fn set_tab_width(&mut self, tab_width: usize) {
        self.cursor = self.cursor.clone().with_tab_width(tab_width);
    }

    pub fn text(&self) -> String {
        self.buffer.read()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    /// Zero-based (line, column) of the cursor in the raw text.
    pub fn line_col(&self) -> (usize, usize) {
        let index = self.cursor.index();
        let line = self.buffer.chars()[..index.min(self.buffer.len())]
            .iter()
            .filter(|c| **c == '\n')
            .count();
        (line, self.buffer.column(index))
    }

    pub fn hover(&self) -> &LinkHover {
        &self.hover
    }

    pub fn apply(&mut self, command: Command) -> Result<Outcome> {
        let outcome = self.cursor.apply(&mut self.buffer, command)?;
        if outcome != Outcome::Unchanged {
            self.invalidate();
        }
        Ok(outcome)
    }

    pub fn set_cursor(&mut self, index: usize) {
        self.cursor.set_position(&self.buffer, index);
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.projection = None;
        self.grid = None;
    }

    pub fn projection(&mut self) -> &Projection {
        let buffer = &self.buffer;
        let cursor = self.cursor.index();
        self.projection.get_or_insert_with(|| {
            tracing::trace!(revision = buffer.revision(), cursor, "rebuilding projection");
            Projection::build(buffer.chars(), scan(buffer.chars()), cursor)
        })
    }

    /// Lay the visual buffer out at `width` columns, reusing the last grid
    /// when nothing changed.
    pub fn layout(&mut self, width: usize) -> &Grid {
        let width = width.max(1);
        self.width = Some(width);
        let grid = match self.grid.take() {
            Some(grid) if grid.width() == width => grid,
            _ => {
                let hover = self.hover.clone();
                let projection = self.projection();
                let grid = Grid::layout(projection, width, &hover);
                let links = collect_links(projection, &grid);
                self.links = links;
                grid
            }
        };
        self.grid.insert(grid)
    }

    /// Links by target from the last layout; repeated targets share one
    /// entry whose cells cover every occurrence.
    pub fn links(&self) -> &HashMap<String, LinkSpan> {
        &self.links
    }

    /// Feed a pointer sample. Returns a link target when the button is
    /// released over a link.
    pub fn pointer(&mut self, cell: Option<Position>, left_down: bool) -> Option<String> {
        if let Some(width) = self.width {
            self.layout(width);
        }
        let was_down = self.hover.pointer_down;
        let (target, place) = match (&self.grid, &self.projection, cell) {
            (Some(grid), Some(projection), Some(pos)) => match grid.cell(pos) {
                Some(hit) => match hit.link {
                    Some(idx) => (Some(projection.spans()[idx].target.clone()), None),
                    None => (None, Some(projection.to_raw(hit.visual))),
                },
                None => {
                    let visual = grid.row_end(pos.row).unwrap_or(projection.visual().len());
                    (None, Some(projection.to_raw(visual)))
                }
            },
            _ => (None, None),
        };

        let mut followed = None;
        if was_down && !left_down {
            followed = target.clone();
        } else if !was_down && left_down {
            if let Some(index) = place {
                self.set_cursor(index);
            }
        }

        let hover = LinkHover {
            target: if followed.is_some() { None } else { target },
            pointer_down: left_down,
        };
        if hover != self.hover {
            self.hover = hover;
            self.grid = None;
        }
        followed
    }
}

fn collect_links(projection: &Projection, grid: &Grid) -> HashMap<String, LinkSpan> {
    let mut links: HashMap<String, LinkSpan> = HashMap::new();
    for span in projection.spans() {
        links.entry(span.target.clone()).or_insert_with(|| span.clone());
    }
    for (pos, cell) in grid.positioned() {
        if let Some(idx) = cell.link {
            let target = &projection.spans()[idx].target;
            if let Some(link) = links.get_mut(target) {
                link.visual_cells.insert(pos);
            }
        }
    }
    links
}
