//! Key and mouse event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::model::ActiveSection;
use crate::view::gallery::thumbnail_rects;
use crate::view::overlays::lightbox_layout;
use crate::view::utils::contains;
use crate::view::{AppLayout, CALENDAR_NOTICE};
use super::AppController;

const PAGE_STEP: i32 = 10;
const WHEEL_STEP: i32 = 3;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        if model.has_notice().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_notice().await;
            }
            return Ok(());
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        // Lightbox takes the arrows; music keys still work underneath
        if model.is_lightbox_open().await {
            match key.code {
                KeyCode::Left => {
                    drop(model);
                    self.previous_image().await;
                    return Ok(());
                }
                KeyCode::Right => {
                    drop(model);
                    self.next_image().await;
                    return Ok(());
                }
                KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => {
                    drop(model);
                    self.close_lightbox().await;
                    return Ok(());
                }
                KeyCode::Char(' ')
                | KeyCode::Char('m')
                | KeyCode::Char('M')
                | KeyCode::Char('i')
                | KeyCode::Char('I')
                | KeyCode::Char('q')
                | KeyCode::Char('Q')
                | KeyCode::Char('c') => {}
                _ => return Ok(()),
            }
        }

        let ui_state = model.get_ui_state().await;

        // Handle invitation page scrolling and event selection
        if ui_state.active_section == ActiveSection::Invitation {
            let handled = match key.code {
                KeyCode::Up => model.scroll_page(-1).await,
                KeyCode::Down => model.scroll_page(1).await,
                KeyCode::PageUp => model.scroll_page(-PAGE_STEP).await,
                KeyCode::PageDown => model.scroll_page(PAGE_STEP).await,
                KeyCode::Home => model.scroll_page_to(0).await,
                KeyCode::End => model.scroll_page_to(u16::MAX).await,
                KeyCode::Left => {
                    model.select_previous_event().await;
                    true
                }
                KeyCode::Right => {
                    model.select_next_event().await;
                    true
                }
                _ => false,
            };
            if handled {
                return Ok(());
            }
        }

        // Handle gallery grid navigation
        if ui_state.active_section == ActiveSection::Gallery {
            match key.code {
                KeyCode::Left => {
                    model.gallery_cursor_left().await;
                    return Ok(());
                }
                KeyCode::Right => {
                    model.gallery_cursor_right().await;
                    return Ok(());
                }
                KeyCode::Up => {
                    model.gallery_cursor_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.gallery_cursor_down().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    drop(model);
                    self.open_image_at_cursor().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                drop(model);
                self.toggle_mute().await;
            }
            // Track info panel, the keyboard stand-in for hovering
            KeyCode::Char('i') | KeyCode::Char('I') => {
                drop(model);
                self.toggle_player_expanded().await;
            }
            // Save the date
            KeyCode::Char('c') | KeyCode::Char('C') => {
                model.show_notice(CALENDAR_NOTICE.to_string()).await;
            }
            // Show help popup
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle a mouse event against the layout of a terminal of size `area`.
    pub async fn handle_mouse_event(&self, mouse: MouseEvent, area: Rect) -> Result<()> {
        let (has_music, lightbox_open, gallery) = {
            let model = self.model.lock().await;
            if model.has_error().await || model.has_notice().await || model.is_help_popup_open().await {
                if matches!(mouse.kind, MouseEventKind::Down(_)) {
                    model.clear_error().await;
                    model.clear_notice().await;
                    model.hide_help_popup().await;
                }
                return Ok(());
            }
            (
                model.get_player_view().await.music.is_some(),
                model.is_lightbox_open().await,
                model.get_gallery_view().await,
            )
        };

        let layout = AppLayout::new(area, has_music);
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Moved => {
                let over_button = has_music && contains(layout.player_button, column, row);
                let changed = {
                    let mut hovering = self.hovering_player.lock().await;
                    let changed = *hovering != over_button;
                    *hovering = over_button;
                    changed
                };
                if changed {
                    self.set_player_expanded(over_button).await;
                }
            }
            MouseEventKind::Down(MouseButton::Left) if lightbox_open => {
                let regions = lightbox_layout(area);
                if contains(regions.prev, column, row) {
                    self.previous_image().await;
                } else if contains(regions.next, column, row) {
                    self.next_image().await;
                } else if !contains(regions.image, column, row) {
                    // Backdrop, close button or counter
                    self.close_lightbox().await;
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if has_music && contains(layout.player_button, column, row) {
                    // A click without a prior hover counts as a tap
                    self.set_player_expanded(true).await;
                    self.toggle_playback().await;
                    return Ok(());
                }

                let hit = thumbnail_rects(layout.gallery, gallery.images.len(), gallery.cursor)
                    .into_iter()
                    .find(|(_, rect)| contains(*rect, column, row));
                if let Some((index, _)) = hit {
                    self.open_image(index).await;
                    return Ok(());
                }

                let section = if contains(layout.gallery, column, row) {
                    Some(ActiveSection::Gallery)
                } else if contains(layout.page, column, row) {
                    Some(ActiveSection::Invitation)
                } else {
                    None
                };
                if let Some(section) = section {
                    self.model.lock().await.set_active_section(section).await;
                }
            }
            MouseEventKind::ScrollUp => {
                self.model.lock().await.scroll_page(-WHEEL_STEP).await;
            }
            MouseEventKind::ScrollDown => {
                self.model.lock().await.scroll_page(WHEEL_STEP).await;
            }
            _ => {}
        }
        Ok(())
    }
}
