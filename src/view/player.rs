//! Floating music player: bar, play button and the expanded info panel

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::model::{PlaybackStatus, PlayerView, ThemeConfig};
use super::layout::AppLayout;
use super::utils::truncate_string;

const PANEL_WIDTH: u16 = 36;
const PANEL_HEIGHT: u16 = 6;

const PLAYING_DOT: Color = Color::Rgb(0x10, 0xb9, 0x81);
const STOPPED_DOT: Color = Color::Rgb(0xef, 0x44, 0x44);

/// Where the info panel floats: above the button, right-aligned.
pub fn info_panel_rect(layout: &AppLayout) -> Rect {
    let button = layout.player_button;
    let right = button.x + button.width;
    let width = PANEL_WIDTH.min(right);
    let height = PANEL_HEIGHT.min(button.y.saturating_sub(layout.title.y + layout.title.height));
    Rect {
        x: right - width,
        y: button.y.saturating_sub(height),
        width,
        height,
    }
}

pub fn render_player(frame: &mut Frame, layout: &AppLayout, player: &PlayerView, theme: &ThemeConfig) {
    // Nothing to show without a track
    let Some(music) = &player.music else {
        return;
    };
    if layout.player_bar.height == 0 {
        return;
    }

    let state = player.state;
    let status = match state.status {
        PlaybackStatus::Playing => ("Memutar", Color::Green),
        PlaybackStatus::Paused => ("Dijeda", Color::Yellow),
        PlaybackStatus::Stopped => ("Berhenti", Color::DarkGray),
    };

    let bar_area = Rect {
        width: layout.player_bar.width.saturating_sub(layout.player_button.width),
        ..layout.player_bar
    };
    let mut spans = vec![
        Span::styled("♫ ", Style::default().fg(theme.primary())),
        Span::styled(
            truncate_string(&music.title, 30),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" · {}", music.artist), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(format!("[{}]", status.0), Style::default().fg(status.1)),
    ];
    if state.is_muted {
        spans.push(Span::styled(" 🔇", Style::default().fg(Color::Red)));
    }
    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Musik "),
    );
    frame.render_widget(bar, bar_area);

    let icon = if state.is_playing() { "⏸" } else { "▶" };
    let dot = if state.is_playing() { PLAYING_DOT } else { STOPPED_DOT };
    let button = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", icon),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary()))
            .style(Style::default().bg(theme.primary()).fg(Color::White))
            .title(Line::from(Span::styled("●", Style::default().fg(dot))).right_aligned()),
    );
    frame.render_widget(button, layout.player_button);

    if state.is_expanded {
        render_info_panel(frame, layout, player, theme);
    }
}

fn render_info_panel(frame: &mut Frame, layout: &AppLayout, player: &PlayerView, theme: &ThemeConfig) {
    let Some(music) = &player.music else {
        return;
    };
    let area = info_panel_rect(layout);
    if area.height < 3 {
        return;
    }
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary()))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let width = inner.width.saturating_sub(3) as usize;
    let info = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("♫ ", Style::default().fg(theme.primary())),
            Span::styled(
                truncate_string(&music.title, width),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("  {}", truncate_string(&music.artist, width)),
            Style::default().fg(Color::Gray),
        )),
    ]);
    frame.render_widget(info, rows[0]);

    let volume_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(rows[1]);

    let (mute_icon, level) = if player.state.is_muted {
        ("🔇", 0.0)
    } else {
        ("🔊", player.volume)
    };
    frame.render_widget(Paragraph::new(mute_icon), volume_row[0]);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.primary()).bg(Color::DarkGray))
        .label("")
        .ratio(f64::from(level).clamp(0.0, 1.0));
    frame.render_widget(gauge, volume_row[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_floats_above_the_button() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30), true);
        let panel = info_panel_rect(&layout);
        assert_eq!(panel.y + panel.height, layout.player_button.y);
        assert_eq!(panel.x + panel.width, layout.player_button.x + layout.player_button.width);
    }
}
