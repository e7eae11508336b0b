//! Core UI type definitions

use std::time::Instant;

/// Which pane has keyboard focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Invitation,
    Gallery,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Invitation => ActiveSection::Gallery,
            ActiveSection::Gallery => ActiveSection::Invitation,
        }
    }

    pub fn prev(self) -> Self {
        // Two sections, so backwards is the same hop
        self.next()
    }
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_section: ActiveSection,
    /// First visible line of the invitation page
    pub page_scroll: u16,
    /// Number of lines on the invitation page
    pub page_len: u16,
    /// Page rows visible on screen; 1 until the first frame is laid out
    pub page_height: u16,
    pub selected_event: usize,
    pub event_count: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub notice_message: Option<String>,
    pub notice_timestamp: Option<Instant>,
    pub show_help_popup: bool,
    pub is_loading: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Invitation,
            page_scroll: 0,
            page_len: 0,
            page_height: 1,
            selected_event: 0,
            event_count: 0,
            error_message: None,
            error_timestamp: None,
            notice_message: None,
            notice_timestamp: None,
            show_help_popup: false,
            is_loading: true,
        }
    }
}

impl UiState {
    /// Scrolling stops once the last line reaches the bottom row
    pub fn max_scroll(&self) -> u16 {
        self.page_len.saturating_sub(self.page_height.max(1))
    }
}
