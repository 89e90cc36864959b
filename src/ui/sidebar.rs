use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;

/// Open documents, one row each, `*` marking unsaved ones.
pub fn render_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    app.areas.nav = area;
    let theme = &app.theme;
    let inner_width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = app
        .documents()
        .iter()
        .enumerate()
        .map(|(idx, doc)| {
            let marker = if doc.is_dirty() { "*" } else { "" };
            let name = truncate(doc.display_name(), inner_width.saturating_sub(marker.len()));

            let mut style = Style::default().fg(theme.foreground).bg(theme.background);
            if app.current_index() == Some(idx) {
                style = style.fg(theme.current).add_modifier(Modifier::BOLD);
            }
            if app.nav.pressed == Some(idx) {
                style = style.fg(theme.link_pressed_text).bg(theme.link_pressed);
            } else if app.nav.hovered == Some(idx) {
                style = style.bg(theme.link_hover);
            }

            ListItem::new(Line::from(vec![
                Span::styled(name, style),
                Span::styled(marker, style.fg(theme.unsaved)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Open ({}) ", app.documents().len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .style(theme.text()),
    );

    f.render_widget(list, area);
}

/// Cut `name` to at most `max` terminal columns.
fn truncate(name: &str, max: usize) -> String {
    let mut width = 0;
    name.chars()
        .take_while(|c| {
            width += c.width().unwrap_or(0);
            width <= max
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("notes.txt", 20), "notes.txt");
        assert_eq!(truncate("notes.txt", 5), "notes");
        assert_eq!(truncate("日本語.txt", 4), "日本");
        assert_eq!(truncate("abc", 0), "");
    }
}
