//! Model module - Application state and data types
//!
//! - `invitation`: invitation content (hero, events, gallery, theme, music)
//! - `sample`: bundled sample invitation
//! - `types`: UI state and section focus
//! - `gallery`: gallery grid, lightbox and the page scroll lock
//! - `player`: floating music player state machine
//! - `app_model`: main application model with state management methods

mod invitation;
mod sample;
mod types;
mod gallery;
mod player;
mod app_model;

pub use invitation::{
    EventSection, FontStyle, GalleryImage, HeroSection, InvitationData, MusicConfig, ThemeConfig,
};

pub use types::{ActiveSection, UiState};

pub use gallery::{GalleryView, GRID_COLUMNS};

pub use player::{MusicPlayer, PlaybackState, PlaybackStatus, PlayerView};

#[cfg(test)]
pub(crate) use player::testing;

pub use app_model::AppModel;
