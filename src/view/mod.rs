//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared helpers (centering, wrapping, theme styles)
//! - `layout`: Screen layout and title bar, reused for mouse hit-testing
//! - `page`: The invitation page (hero, events, footer)
//! - `gallery`: Thumbnail grid
//! - `player`: Floating music player
//! - `overlays`: Lightbox and modal popups

pub(crate) mod utils;
pub(crate) mod layout;
pub(crate) mod page;
pub(crate) mod gallery;
pub(crate) mod player;
pub(crate) mod overlays;

use ratatui::Frame;

use crate::model::{GalleryView, InvitationData, PlayerView, UiState};

pub use layout::AppLayout;
pub use page::{page_len, page_rows, CALENDAR_NOTICE};

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        invitation: &InvitationData,
        ui_state: &UiState,
        gallery: &GalleryView,
        player: &PlayerView,
    ) {
        if ui_state.is_loading {
            overlays::render_loading_screen(frame);
            return;
        }

        let layout = AppLayout::new(frame.area(), player.music.is_some());
        let theme = &invitation.theme;

        layout::render_title_bar(frame, layout.title, invitation, ui_state);
        page::render_page(frame, layout.page, invitation, ui_state);
        gallery::render_gallery(frame, layout.gallery, gallery, theme, ui_state);
        player::render_player(frame, &layout, player, theme);

        // The lightbox covers everything but the popups
        if gallery.selection.is_some() {
            overlays::render_lightbox(frame, gallery, theme);
        }

        if ui_state.notice_message.is_some() {
            overlays::render_notice(frame, ui_state, theme);
        }

        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }

    pub fn render_loading(frame: &mut Frame) {
        overlays::render_loading_screen(frame);
    }
}
