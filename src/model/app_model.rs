//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::Mutex;

use super::gallery::{GalleryState, GalleryView, ScrollLock};
use super::invitation::InvitationData;
use super::player::PlayerView;
use super::types::{ActiveSection, UiState};

/// Seconds before an error or notice popup disappears on its own
const MESSAGE_TTL_SECS: u64 = 5;

/// Main application model containing all state
pub struct AppModel {
    invitation: Arc<InvitationData>,
    scroll_lock: ScrollLock,
    pub ui_state: Arc<Mutex<UiState>>,
    gallery: Arc<Mutex<GalleryState>>,
    player_view: Arc<Mutex<PlayerView>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(invitation: InvitationData) -> Self {
        let scroll_lock = ScrollLock::new();
        let gallery = GalleryState::new(invitation.gallery.images.clone(), scroll_lock.clone());
        let ui_state = UiState {
            event_count: invitation.events.len(),
            ..UiState::default()
        };

        Self {
            invitation: Arc::new(invitation),
            scroll_lock,
            ui_state: Arc::new(Mutex::new(ui_state)),
            gallery: Arc::new(Mutex::new(gallery)),
            player_view: Arc::new(Mutex::new(PlayerView::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn invitation(&self) -> Arc<InvitationData> {
        self.invitation.clone()
    }

    #[cfg(test)]
    pub fn scroll_lock(&self) -> ScrollLock {
        self.scroll_lock.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn finish_loading(&self, page_len: u16) {
        let mut state = self.ui_state.lock().await;
        state.page_len = page_len;
        state.page_scroll = state.page_scroll.min(state.max_scroll());
        state.is_loading = false;
    }

    // ========================================================================
    // Sections & Page Scroll
    // ========================================================================

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    /// Scroll the invitation page by `delta` lines. Returns false while the
    /// scroll lock is held.
    pub async fn scroll_page(&self, delta: i32) -> bool {
        if self.scroll_lock.is_suspended() {
            tracing::trace!(delta, "Page scroll suspended");
            return false;
        }
        let mut state = self.ui_state.lock().await;
        let target = (state.page_scroll as i32 + delta).clamp(0, state.max_scroll() as i32);
        state.page_scroll = target as u16;
        true
    }

    /// Record how many page rows fit on screen. The scroll is re-clamped
    /// unless the scroll lock is held.
    pub async fn set_page_height(&self, rows: u16) {
        let mut state = self.ui_state.lock().await;
        state.page_height = rows.max(1);
        if !self.scroll_lock.is_suspended() {
            state.page_scroll = state.page_scroll.min(state.max_scroll());
        }
    }

    pub async fn scroll_page_to(&self, line: u16) -> bool {
        if self.scroll_lock.is_suspended() {
            return false;
        }
        let mut state = self.ui_state.lock().await;
        state.page_scroll = line.min(state.max_scroll());
        true
    }

    pub async fn select_next_event(&self) {
        let mut state = self.ui_state.lock().await;
        if state.selected_event + 1 < state.event_count {
            state.selected_event += 1;
        }
    }

    pub async fn select_previous_event(&self) {
        let mut state = self.ui_state.lock().await;
        state.selected_event = state.selected_event.saturating_sub(1);
    }

    // ========================================================================
    // Gallery & Lightbox
    // ========================================================================

    pub async fn get_gallery_view(&self) -> GalleryView {
        self.gallery.lock().await.view()
    }

    pub async fn is_lightbox_open(&self) -> bool {
        self.gallery.lock().await.lightbox().is_open()
    }

    pub async fn gallery_cursor_left(&self) {
        self.gallery.lock().await.cursor_left();
    }

    pub async fn gallery_cursor_right(&self) {
        self.gallery.lock().await.cursor_right();
    }

    pub async fn gallery_cursor_up(&self) {
        self.gallery.lock().await.cursor_up();
    }

    pub async fn gallery_cursor_down(&self) {
        self.gallery.lock().await.cursor_down();
    }

    pub async fn open_lightbox(&self, index: usize) -> Result<()> {
        let mut gallery = self.gallery.lock().await;
        gallery.lightbox_mut().open(index)?;
        gallery.set_cursor(index);
        Ok(())
    }

    pub async fn open_lightbox_at_cursor(&self) -> Result<()> {
        self.gallery.lock().await.open_at_cursor()
    }

    pub async fn close_lightbox(&self) {
        self.gallery.lock().await.lightbox_mut().close();
    }

    /// Step to the next image; the grid cursor follows so closing lands on it
    pub async fn lightbox_next(&self) -> Option<usize> {
        let mut gallery = self.gallery.lock().await;
        gallery.lightbox_mut().next();
        let selection = gallery.lightbox().selection();
        if let Some(index) = selection {
            gallery.set_cursor(index);
        }
        selection
    }

    pub async fn lightbox_previous(&self) -> Option<usize> {
        let mut gallery = self.gallery.lock().await;
        gallery.lightbox_mut().previous();
        let selection = gallery.lightbox().selection();
        if let Some(index) = selection {
            gallery.set_cursor(index);
        }
        selection
    }

    // ========================================================================
    // Music Player
    // ========================================================================

    pub async fn update_player_view(&self, view: PlayerView) {
        *self.player_view.lock().await = view;
    }

    pub async fn get_player_view(&self) -> PlayerView {
        self.player_view.lock().await.clone()
    }

    // ========================================================================
    // Popups
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn show_notice(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.notice_message = Some(message);
        state.notice_timestamp = Some(Instant::now());
    }

    pub async fn clear_notice(&self) {
        let mut state = self.ui_state.lock().await;
        state.notice_message = None;
        state.notice_timestamp = None;
    }

    pub async fn has_notice(&self) -> bool {
        self.ui_state.lock().await.notice_message.is_some()
    }

    pub async fn auto_clear_old_messages(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > MESSAGE_TTL_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
        if let Some(timestamp) = state.notice_timestamp {
            if timestamp.elapsed().as_secs() > MESSAGE_TTL_SECS {
                state.notice_message = None;
                state.notice_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}
