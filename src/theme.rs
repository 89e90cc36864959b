use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeConfig;
use crate::editor::CellStyle;

/// Runtime theme with parsed colors for UI rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub foreground: Color,
    pub background: Color,

    pub cursor: Color,
    pub cursor_text: Color,

    pub link: Color,
    pub link_hover: Color,
    pub link_pressed: Color,
    pub link_pressed_text: Color,

    pub border: Color,
    pub border_focused: Color,
    pub current: Color,
    pub unsaved: Color,
    pub error: Color,
}

impl Theme {
    pub fn from_config(colors: &ThemeConfig) -> Self {
        Self {
            foreground: parse_hex_color(&colors.foreground),
            background: parse_hex_color(&colors.background),
            cursor: parse_hex_color(&colors.cursor),
            cursor_text: parse_hex_color(&colors.cursor_text),
            link: parse_hex_color(&colors.link),
            link_hover: parse_hex_color(&colors.link_hover),
            link_pressed: parse_hex_color(&colors.link_pressed),
            link_pressed_text: parse_hex_color(&colors.link_pressed_text),
            border: parse_hex_color(&colors.border),
            border_focused: parse_hex_color(&colors.border_focused),
            current: parse_hex_color(&colors.current),
            unsaved: parse_hex_color(&colors.unsaved),
            error: parse_hex_color(&colors.error),
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn style_for(&self, cell: CellStyle) -> Style {
        let base = self.text();
        match cell {
            CellStyle::Normal => base,
            CellStyle::Link => base.fg(self.link).add_modifier(Modifier::UNDERLINED),
            CellStyle::LinkHover => base.fg(self.link).bg(self.link_hover),
            CellStyle::LinkPressed => base.fg(self.link_pressed_text).bg(self.link_pressed),
            CellStyle::Cursor => base.fg(self.cursor_text).bg(self.cursor),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

fn parse_hex_color(hex: &str) -> Color {
    let hex = hex.trim_matches('\'').trim_start_matches('#');
    if hex.len() == 6 && hex.is_ascii() {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }
    Color::White
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(parse_hex_color("'#010203'"), Color::Rgb(1, 2, 3));
        assert_eq!(parse_hex_color("nope"), Color::White);
        assert_eq!(parse_hex_color("#zzzzzz"), Color::White);
        assert_eq!(parse_hex_color("010203"), Color::Rgb(1, 2, 3));
    }

    #[test]
    fn test_parse_hex_color_rejects_non_ascii() {
        // Six bytes, but not six hex digits.
        assert_eq!(parse_hex_color("a\u{e9}\u{20ac}"), Color::White);
        assert_eq!(parse_hex_color("#\u{e9}\u{e9}\u{e9}"), Color::White);
    }

    #[test]
    fn test_cell_styles_are_distinct() {
        let theme = Theme::default();
        let styles = [
            CellStyle::Normal,
            CellStyle::Link,
            CellStyle::Cursor,
            CellStyle::LinkHover,
            CellStyle::LinkPressed,
        ]
        .map(|s| theme.style_for(s));
        for (i, a) in styles.iter().enumerate() {
            for b in &styles[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(styles[2].bg, Some(Color::Rgb(255, 255, 0)));
    }
}
