use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::editor::{Cell, Grid};
use crate::theme::Theme;

pub fn render_editor(f: &mut Frame, app: &mut App, area: Rect) {
    app.areas.editor = area;

    let theme = app.theme.clone();
    let border_style = if app.focus == Focus::Editor {
        Style::default().fg(theme.border_focused)
    } else {
        Style::default().fg(theme.border)
    };
    let title = app
        .current_document()
        .map(|d| format!(" {} ", d.display_name()))
        .unwrap_or_else(|| " Editor ".to_string());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(theme.text());

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let width = app
        .config
        .editor
        .wrap_width
        .map(|w| w as usize)
        .unwrap_or(inner_width);

    let Some(document) = app.current_document_mut() else {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Type a file path in the address bar and press Enter",
            theme.text(),
        )))
        .block(block);
        f.render_widget(hint, area);
        return;
    };

    let grid = document.layout(width);
    let cursor_row = grid.cursor().row;
    let lines = grid_lines(grid, &theme);

    app.scroll_to(cursor_row, inner_height);
    let visible: Vec<Line> = lines.into_iter().skip(app.scroll).take(inner_height).collect();

    f.render_widget(Paragraph::new(visible).block(block), area);
}

// One line per grid row, merging runs of equally styled cells into spans.
fn grid_lines(grid: &Grid, theme: &Theme) -> Vec<Line<'static>> {
    grid.rows()
        .iter()
        .map(|row| {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut run = String::new();
            let mut run_style = None;

            for Cell { ch, style, .. } in row {
                let style = theme.style_for(*style);
                if run_style != Some(style) {
                    if let Some(prev) = run_style {
                        spans.push(Span::styled(std::mem::take(&mut run), prev));
                    }
                    run_style = Some(style);
                }
                run.push(*ch);
            }
            if let Some(style) = run_style {
                spans.push(Span::styled(run, style));
            }
            Line::from(spans)
        })
        .collect()
}
