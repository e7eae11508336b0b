//! Overlay rendering (lightbox, error and notice popups, help, loading screen)

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::{GalleryView, ThemeConfig, UiState};
use super::utils::{centered_rect, display_width, wrap_words};

const NAV_WIDTH: u16 = 7;

/// Clickable regions of the open lightbox
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightboxLayout {
    pub frame: Rect,
    pub close: Rect,
    pub prev: Rect,
    pub next: Rect,
    pub image: Rect,
    pub counter: Rect,
}

pub fn lightbox_layout(area: Rect) -> LightboxLayout {
    let frame = Rect {
        x: area.x + 2.min(area.width / 2),
        y: area.y + 1.min(area.height / 2),
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };
    let inner = Block::default().borders(Borders::ALL).inner(frame);
    let body_height = inner.height.saturating_sub(1);
    let nav_width = NAV_WIDTH.min(inner.width / 3);

    LightboxLayout {
        frame,
        close: Rect {
            x: (frame.x + frame.width).saturating_sub(6),
            y: frame.y,
            width: 5.min(frame.width),
            height: 1.min(frame.height),
        },
        prev: Rect { x: inner.x, y: inner.y, width: nav_width, height: body_height },
        next: Rect {
            x: (inner.x + inner.width).saturating_sub(nav_width),
            y: inner.y,
            width: nav_width,
            height: body_height,
        },
        image: Rect {
            x: inner.x + nav_width,
            y: inner.y,
            width: inner.width.saturating_sub(2 * nav_width),
            height: body_height,
        },
        counter: Rect {
            x: inner.x,
            y: inner.y + body_height,
            width: inner.width,
            height: inner.height.min(1),
        },
    }
}

pub fn render_lightbox(frame: &mut Frame, gallery: &GalleryView, theme: &ThemeConfig) {
    let (Some(index), Some(image)) = (gallery.selection, gallery.selected_image()) else {
        return;
    };
    let area = frame.area();
    let layout = lightbox_layout(area);

    // Backdrop
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Color::Black)), area);

    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary()))
            .title(" Galeri Momen ")
            .title_style(Style::default().fg(theme.primary()).add_modifier(Modifier::BOLD)),
        layout.frame,
    );
    frame.render_widget(
        Paragraph::new(" ✕ ").style(Style::default().fg(Color::White).bg(Color::DarkGray)),
        layout.close,
    );

    let nav_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let arrow_row = |rect: Rect| Rect {
        y: rect.y + rect.height / 2,
        height: rect.height.min(1),
        ..rect
    };
    frame.render_widget(
        Paragraph::new("  ◀").style(nav_style),
        arrow_row(layout.prev),
    );
    frame.render_widget(
        Paragraph::new("▶  ").style(nav_style).alignment(Alignment::Right),
        arrow_row(layout.next),
    );

    let width = layout.image.width.saturating_sub(4).max(1) as usize;
    let mut lines = vec![Line::default()];
    for part in wrap_words(&image.alt, width) {
        lines.push(Line::from(Span::styled(part, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))).centered());
    }
    if let Some(caption) = &image.caption {
        lines.push(Line::default());
        for part in wrap_words(caption, width) {
            lines.push(Line::from(Span::styled(part, Style::default().fg(theme.accent()).add_modifier(Modifier::ITALIC))).centered());
        }
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(image.url.clone(), Style::default().fg(Color::DarkGray))).centered());

    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(body, layout.image);

    let counter = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{} / {}", index + 1, gallery.images.len()),
            Style::default().fg(Color::White),
        ),
        Span::styled("   ←/→ navigate · Esc close", Style::default().fg(Color::DarkGray)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(counter, layout.counter);
}

fn render_message_popup(frame: &mut Frame, message: &str, title: &str, color: Color) {
    let area = frame.area();

    let popup_width = 52.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(4) as usize;
    let line_count = ((display_width(message) as f32) / (inner_width.max(1) as f32)).ceil() as u16;
    let popup_height = (2 + line_count.max(1)).min(area.height.saturating_sub(4));

    let popup_area = centered_rect(area, popup_width, popup_height);

    // Clear the area behind the popup first
    frame.render_widget(Clear, popup_area);

    let widget = Paragraph::new(message.to_string())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title.to_string())
                .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(widget, popup_area);
}

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        render_message_popup(frame, error_msg, " Error (Esc to dismiss) ", Color::Red);
    }
}

pub fn render_notice(frame: &mut Frame, ui_state: &UiState, theme: &ThemeConfig) {
    if let Some(ref notice) = ui_state.notice_message {
        render_message_popup(frame, notice, " Info (Esc to dismiss) ", theme.primary());
    }
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let keybindings = vec![
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Switch invitation / gallery"),
        ("↑ / ↓", "Scroll page / move in grid"),
        ("PgUp / PgDn", "Scroll page faster"),
        ("Home / End", "Top / bottom of page"),
        ("← / →", "Select event / move in grid"),
        ("Enter", "Open photo"),
        ("", ""),
        ("", "── Lightbox ──"),
        ("← / →", "Previous / next photo"),
        ("Esc / Enter", "Close"),
        ("", ""),
        ("", "── Music ──"),
        ("Space", "Play / Pause"),
        ("M", "Mute / Unmute"),
        ("I", "Show track info"),
        ("", ""),
        ("", "── General ──"),
        ("C", "Save the date"),
        ("H", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_width = 56.min(area.width);
    let popup_height = (keybindings.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_area = centered_rect(area, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>16}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}

pub fn render_loading_screen(frame: &mut Frame) {
    let area = frame.area();
    let popup_area = centered_rect(area, 30, 3);
    let loading = Paragraph::new("Memuat Undangan...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loading, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::utils::contains;

    #[test]
    fn lightbox_regions_do_not_overlap() {
        let layout = lightbox_layout(Rect::new(0, 0, 100, 30));
        let (px, py) = (layout.prev.x, layout.prev.y + 2);
        assert!(contains(layout.prev, px, py));
        assert!(!contains(layout.image, px, py));
        assert!(!contains(layout.next, px, py));

        let (nx, ny) = (layout.next.x + layout.next.width - 1, layout.next.y);
        assert!(contains(layout.next, nx, ny));
        assert!(!contains(layout.image, nx, ny));

        assert!(!contains(layout.image, layout.counter.x + 10, layout.counter.y));
        assert!(contains(layout.frame, layout.close.x, layout.close.y));
    }
}
