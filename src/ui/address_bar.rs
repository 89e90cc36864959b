use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};

pub fn render_address_bar(f: &mut Frame, app: &mut App, area: Rect) {
    app.areas.address = area;
    let theme = &app.theme;
    let focused = app.focus == Focus::AddressBar;

    let border_color = if focused { theme.border_focused } else { theme.border };
    let mut spans = vec![Span::styled(app.address.as_str(), theme.text())];
    if focused {
        spans.push(Span::styled("_", Style::default().fg(theme.cursor)));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Address ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .style(theme.text()),
    );

    f.render_widget(bar, area);
}
