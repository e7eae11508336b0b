//! Screen layout shared by rendering and mouse hit-testing

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, InvitationData, UiState};
use super::utils::accent_style;

/// Width of the floating play/pause button
pub const PLAYER_BUTTON_WIDTH: u16 = 14;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppLayout {
    pub title: Rect,
    pub page: Rect,
    pub gallery: Rect,
    /// Zero-height when there is no music
    pub player_bar: Rect,
    pub player_button: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, has_music: bool) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                           // Title
                Constraint::Min(0),                              // Page + gallery
                Constraint::Length(if has_music { 3 } else { 0 }), // Music player
            ])
            .split(area);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        let player_bar = chunks[2];
        let button_width = PLAYER_BUTTON_WIDTH.min(player_bar.width);
        let player_button = Rect {
            x: player_bar.x + player_bar.width - button_width,
            y: player_bar.y,
            width: button_width,
            height: player_bar.height,
        };

        Self {
            title: chunks[0],
            page: main_chunks[0],
            gallery: main_chunks[1],
            player_bar,
            player_button,
        }
    }
}

pub fn render_title_bar(frame: &mut Frame, area: Rect, invitation: &InvitationData, ui_state: &UiState) {
    let hero = &invitation.hero;
    let focus = match ui_state.active_section {
        ActiveSection::Invitation => "Undangan",
        ActiveSection::Gallery => "Galeri",
    };

    let title = Line::from(vec![
        Span::styled(format!(" {} ", hero.title), Style::default().fg(Color::White)),
        Span::styled(hero.couple(), accent_style(&invitation.theme)),
    ]);

    let bar = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(invitation.theme.primary()))
            .title(" Wedding Invitation ")
            .title_bottom(
                Line::from(Span::styled(
                    format!(" {} · H for help ", focus),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ))
                .right_aligned(),
            ),
    );
    frame.render_widget(bar, area);
}
