//! Gallery grid rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, GalleryView, ThemeConfig, UiState, GRID_COLUMNS};
use super::utils::{heading_style, truncate_string};

const HEADER_HEIGHT: u16 = 3;
const CELL_HEIGHT: u16 = 4;

fn grid_area(area: Rect) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    Rect {
        x: inner.x,
        y: inner.y + HEADER_HEIGHT.min(inner.height),
        width: inner.width,
        height: inner.height.saturating_sub(HEADER_HEIGHT),
    }
}

/// Screen rect of every visible thumbnail, paired with its image index.
///
/// Rows scroll so the row holding `cursor` is always on screen.
pub fn thumbnail_rects(area: Rect, count: usize, cursor: usize) -> Vec<(usize, Rect)> {
    let grid = grid_area(area);
    let visible_rows = (grid.height / CELL_HEIGHT) as usize;
    if count == 0 || visible_rows == 0 || grid.width < GRID_COLUMNS as u16 {
        return Vec::new();
    }

    let cell_width = grid.width / GRID_COLUMNS as u16;
    let cursor_row = cursor / GRID_COLUMNS;
    let first_row = (cursor_row + 1).saturating_sub(visible_rows);

    (first_row * GRID_COLUMNS..count)
        .take(visible_rows * GRID_COLUMNS)
        .map(|index| {
            let row = (index / GRID_COLUMNS - first_row) as u16;
            let col = (index % GRID_COLUMNS) as u16;
            let rect = Rect {
                x: grid.x + col * cell_width,
                y: grid.y + row * CELL_HEIGHT,
                width: cell_width,
                height: CELL_HEIGHT,
            };
            (index, rect)
        })
        .collect()
}

pub fn render_gallery(frame: &mut Frame, area: Rect, gallery: &GalleryView, theme: &ThemeConfig, ui_state: &UiState) {
    let is_focused = ui_state.active_section == ActiveSection::Gallery;
    let border_style = if is_focused {
        Style::default().fg(theme.primary())
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" Galeri ({}) ", gallery.images.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled("Galeri Momen", heading_style(theme).add_modifier(Modifier::BOLD))).centered(),
        Line::from(Span::styled(
            "Kenangan indah perjalanan cinta kami",
            Style::default().fg(Color::Gray),
        ))
        .centered(),
    ]);
    frame.render_widget(header, Rect { height: HEADER_HEIGHT.min(inner.height), ..inner });

    if gallery.images.is_empty() {
        return;
    }

    for (index, rect) in thumbnail_rects(area, gallery.images.len(), gallery.cursor) {
        let image = &gallery.images[index];
        let is_cursor = is_focused && index == gallery.cursor;

        let cell_style = if is_cursor {
            Style::default().fg(theme.primary()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text_width = rect.width.saturating_sub(2) as usize;

        let mut lines = vec![Line::from(Span::styled(
            truncate_string(&format!("🖼 {}", image.alt), text_width),
            Style::default().fg(Color::White),
        ))];
        if let Some(caption) = &image.caption {
            lines.push(Line::from(Span::styled(
                truncate_string(caption, text_width),
                Style::default().fg(theme.accent()).add_modifier(Modifier::ITALIC),
            )));
        }

        let cell = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(cell_style)
                .title(format!(" {} ", index + 1)),
        );
        frame.render_widget(cell, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_two_columns() {
        let rects = thumbnail_rects(Rect::new(0, 0, 40, 30), 6, 0);
        assert_eq!(rects.len(), 6);
        assert_eq!(rects[0].1.y, rects[1].1.y);
        assert!(rects[1].1.x > rects[0].1.x);
        assert_eq!(rects[2].1.x, rects[0].1.x);
        assert!(rects[2].1.y > rects[0].1.y);
    }

    #[test]
    fn rows_scroll_to_keep_cursor_visible() {
        // Room for two rows of thumbnails
        let area = Rect::new(0, 0, 40, 2 + HEADER_HEIGHT + 2 * CELL_HEIGHT);
        let first = thumbnail_rects(area, 6, 0);
        assert_eq!(first.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 1, 2, 3]);

        let last = thumbnail_rects(area, 6, 5);
        assert_eq!(last.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn tiny_area_has_no_thumbnails() {
        assert!(thumbnail_rects(Rect::new(0, 0, 40, 4), 6, 0).is_empty());
        assert!(thumbnail_rects(Rect::new(0, 0, 40, 30), 0, 0).is_empty());
    }
}
