//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
};

use crate::model::ThemeConfig;

/// Rect of `width` x `height` centered in `area`, shrunk to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// Terminal columns `s` occupies; wide glyphs count as two
pub fn display_width(s: &str) -> usize {
    Span::raw(s).width()
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut truncated = String::new();
    let mut width = 0;
    let mut buf = [0u8; 4];
    for ch in s.chars() {
        let ch_width = display_width(&*ch.encode_utf8(&mut buf));
        if width + ch_width > budget {
            break;
        }
        width += ch_width;
        truncated.push(ch);
    }
    format!("{}...", truncated)
}

/// Greedy word wrap by display width; words wider than `width` get a line
/// of their own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for word in text.split_whitespace() {
        let word_width = display_width(word);
        if !current.is_empty() && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Heading style: secondary colour plus the theme's font modifier
pub fn heading_style(theme: &ThemeConfig) -> Style {
    Style::default()
        .fg(theme.secondary())
        .add_modifier(theme.font_style.text_modifier())
}

pub fn accent_style(theme: &ThemeConfig) -> Style {
    Style::default().fg(theme.primary()).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_words("Di antara tanda-tanda kebesaran-Nya", 12),
            vec!["Di antara", "tanda-tanda", "kebesaran-Nya"]
        );
        assert!(wrap_words("   ", 10).is_empty());
    }

    #[test]
    fn centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(area, 50, 50), area);
    }

    #[test]
    fn truncates_long_strings() {
        assert_eq!(truncate_string("Resepsi Pernikahan", 10), "Resepsi...");
        assert_eq!(truncate_string("Akad", 10), "Akad");
    }

    #[test]
    fn wide_glyphs_count_two_columns() {
        assert_eq!(display_width("婚礼"), 4);
        assert_eq!(truncate_string("婚礼邀请函", 7), "婚礼...");
        assert_eq!(truncate_string("婚礼", 4), "婚礼");
        assert_eq!(wrap_words("婚礼 邀请 函数", 5), vec!["婚礼", "邀请", "函数"]);
    }
}
