use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::document::SaveState;

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bar_style = Style::default().fg(theme.foreground).bg(theme.border);

    let mut left_content = Vec::new();
    if let Some(doc) = app.current_document() {
        let (state, color) = match doc.state() {
            SaveState::Clean => ("Clean", theme.foreground),
            SaveState::Dirty => ("Dirty", theme.unsaved),
        };
        let (line, col) = doc.editor().line_col();

        left_content.push(Span::styled(
            format!(" {} ", state),
            Style::default().fg(theme.background).bg(color).add_modifier(Modifier::BOLD),
        ));
        left_content.push(Span::styled(format!(" {} ", doc.path().display()), bar_style));
        left_content.push(Span::styled(
            format!("│ {} │ {}:{} ", doc.editor().cursor(), line + 1, col + 1),
            bar_style,
        ));
    } else {
        left_content.push(Span::styled(" No file ", bar_style));
    }

    let right_content = match &app.notification {
        Some(n) => {
            let fg = if n.is_error { theme.error } else { theme.foreground };
            vec![Span::styled(format!(" {} ", n.message), bar_style.fg(fg))]
        }
        None => vec![Span::styled(" Ctrl+S save  Ctrl+L address  Ctrl+Q quit ", bar_style)],
    };

    let left_width: usize = left_content.iter().map(|s| s.content.width()).sum();
    let right_width: usize = right_content.iter().map(|s| s.content.width()).sum();
    let padding = (area.width as usize).saturating_sub(left_width + right_width);

    let mut spans = left_content;
    spans.push(Span::styled(" ".repeat(padding), bar_style));
    spans.extend(right_content);

    f.render_widget(Paragraph::new(Line::from(spans)).style(bar_style), area);
}
