//! Invitation page: hero, event cards, save-the-date and footer

use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::model::{ActiveSection, EventSection, InvitationData, ThemeConfig, UiState};
use super::utils::{accent_style, heading_style, wrap_words};

/// Column the page text is wrapped at, independent of the terminal width
const PAGE_WIDTH: usize = 56;
const PHOTO_FRAME_WIDTH: usize = 24;

const INVITATION_LINE: &str = "Kami Mengundang Anda pada Pernikahan";
const VERSE_REFERENCE: &str = "Ar-Rum : 21";
const VERSE: &str = "\u{201c}Di antara tanda-tanda (kebesaran)-Nya ialah bahwa Dia menciptakan \
pasangan-pasangan untukmu dari (jenis) dirimu sendiri agar kamu merasa tenteram kepadanya. \
Dia menjadikan di antaramu rasa cinta dan kasih sayang. Sesungguhnya pada yang demikian itu \
benar-benar terdapat tanda-tanda (kebesaran Allah) bagi kaum yang berpikir.\u{201d}";
const EVENTS_INTRO: &str =
    "Merupakan suatu kehormatan dan kebahagiaan bagi kami apabila Bapak/Ibu/Saudara/i berkenan hadir";
const CLOSING: &str = "Merupakan suatu kehormatan dan kebahagiaan bagi kami apabila \
Bapak/Ibu/Saudara/i berkenan hadir dan memberikan doa restu kepada kami.";

pub const CALENDAR_NOTICE: &str = "Fitur kalender akan segera hadir!";

fn divider(theme: &ThemeConfig) -> Line<'static> {
    Line::from(Span::styled("────────", Style::default().fg(theme.primary()))).centered()
}

fn wrapped(text: &str, style: Style) -> impl Iterator<Item = Line<'static>> {
    wrap_words(text, PAGE_WIDTH)
        .into_iter()
        .map(move |line| Line::from(Span::styled(line, style)).centered())
}

fn hero_lines(invitation: &InvitationData, lines: &mut Vec<Line<'static>>) {
    let hero = &invitation.hero;
    let theme = &invitation.theme;
    let muted = Style::default().fg(Color::Gray);

    lines.push(Line::from(Span::styled(INVITATION_LINE, muted.add_modifier(Modifier::ITALIC))).centered());
    lines.push(Line::default());

    // Framed couple photo
    let frame = Style::default().fg(theme.primary());
    let bar = "─".repeat(PHOTO_FRAME_WIDTH);
    lines.push(Line::from(Span::styled(format!("╭{bar}╮"), frame)).centered());
    lines.push(
        Line::from(vec![
            Span::styled("│", frame),
            Span::styled(format!("{:^PHOTO_FRAME_WIDTH$}", "◇ Foto Pasangan ◇"), muted),
            Span::styled("│", frame),
        ])
        .centered(),
    );
    lines.push(Line::from(Span::styled(format!("╰{bar}╯"), frame)).centered());
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(hero.title.clone(), Style::default().fg(Color::White))).centered());
    lines.push(Line::from(Span::styled(hero.couple(), heading_style(theme).add_modifier(Modifier::BOLD))).centered());
    lines.push(divider(theme));
    lines.push(Line::from(Span::styled(hero.formatted_date(), accent_style(theme))).centered());
    if let Some(subtitle) = &hero.subtitle {
        lines.extend(wrapped(subtitle, muted.add_modifier(Modifier::ITALIC)));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(VERSE_REFERENCE, accent_style(theme))).centered());
    lines.extend(wrapped(VERSE, Style::default().fg(theme.accent()).add_modifier(Modifier::ITALIC)));
    lines.push(Line::default());
}

fn event_lines(event: &EventSection, theme: &ThemeConfig, selected: bool, lines: &mut Vec<Line<'static>>) {
    let marker = if selected { "▶ " } else { "  " };
    let badge = if selected {
        Style::default().fg(Color::Black).bg(theme.primary()).add_modifier(Modifier::BOLD)
    } else {
        accent_style(theme)
    };
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);

    lines.push(Line::from(vec![
        Span::styled(marker, accent_style(theme)),
        Span::styled(format!(" {} ", event.title), badge),
    ]));
    lines.push(Line::from(vec![
        Span::styled("   Waktu   ", label),
        Span::styled(event.time.clone(), value),
    ]));
    lines.push(Line::from(vec![
        Span::styled("   Lokasi  ", label),
        Span::styled(event.location.clone(), value.add_modifier(Modifier::BOLD)),
    ]));
    for part in wrap_words(&event.address, PAGE_WIDTH.saturating_sub(11)) {
        lines.push(Line::from(vec![Span::raw("           "), Span::styled(part, value)]));
    }
    if let Some(description) = &event.description {
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(description.clone(), Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)),
        ]));
    }

    // The map link is only spelled out for the selected card; a blank line
    // keeps the page length stable when the selection moves.
    if selected {
        lines.push(Line::from(vec![
            Span::styled("   Buka di Google Maps: ", Style::default().fg(theme.primary())),
            Span::styled(
                event.map_link.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    } else {
        lines.push(Line::from(Span::styled("   Buka di Google Maps", label)));
    }
    lines.push(Line::default());
}

fn save_the_date_lines(theme: &ThemeConfig, lines: &mut Vec<Line<'static>>) {
    lines.push(Line::from(Span::styled("Simpan tanggal ini", Style::default().fg(Color::Gray))).centered());
    lines.push(
        Line::from(vec![
            Span::styled(" + Google Calendar ", Style::default().fg(Color::Black).bg(theme.primary())),
            Span::raw("  "),
            Span::styled(" + iCal ", Style::default().fg(Color::Black).bg(theme.secondary())),
            Span::styled("  (C)", Style::default().fg(Color::DarkGray)),
        ])
        .centered(),
    );
    lines.push(Line::default());
}

fn footer_lines(invitation: &InvitationData, lines: &mut Vec<Line<'static>>) {
    let theme = &invitation.theme;
    lines.push(divider(theme));
    lines.extend(wrapped(CLOSING, Style::default().fg(Color::White)));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Kami yang berbahagia,", Style::default().fg(Color::Gray))).centered());
    lines.push(Line::from(Span::styled(invitation.hero.couple(), heading_style(theme).add_modifier(Modifier::BOLD))).centered());
}

/// Every line of the invitation page. The length does not depend on
/// `selected_event`.
pub fn page_lines(invitation: &InvitationData, selected_event: usize) -> Vec<Line<'static>> {
    let theme = &invitation.theme;
    let mut lines = Vec::new();

    hero_lines(invitation, &mut lines);

    if !invitation.events.is_empty() {
        lines.push(divider(theme));
        lines.push(Line::from(Span::styled("Acara Pernikahan", heading_style(theme).add_modifier(Modifier::BOLD))).centered());
        lines.extend(wrapped(EVENTS_INTRO, Style::default().fg(Color::Gray)));
        lines.push(Line::default());
        for (i, event) in invitation.events.iter().enumerate() {
            event_lines(event, theme, i == selected_event, &mut lines);
        }
        save_the_date_lines(theme, &mut lines);
    }

    footer_lines(invitation, &mut lines);
    lines
}

pub fn page_len(invitation: &InvitationData) -> u16 {
    page_lines(invitation, 0).len().min(u16::MAX as usize) as u16
}

/// Text rows inside the bordered page block
pub fn page_rows(area: Rect) -> u16 {
    area.height.saturating_sub(2)
}

pub fn render_page(frame: &mut Frame, area: Rect, invitation: &InvitationData, ui_state: &UiState) {
    let is_focused = ui_state.active_section == ActiveSection::Invitation;
    let border_style = if is_focused {
        Style::default().fg(invitation.theme.primary())
    } else {
        Style::default()
    };

    let lines = page_lines(invitation, ui_state.selected_event);
    let total = lines.len();

    let page = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .scroll((ui_state.page_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .padding(Padding::horizontal(1))
                .title(" Undangan "),
        );
    frame.render_widget(page, area);

    let mut scrollbar_state = ScrollbarState::new(total).position(ui_state.page_scroll as usize);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        area.inner(Margin { vertical: 1, horizontal: 0 }),
        &mut scrollbar_state,
    );
}
