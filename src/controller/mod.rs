//! Controller module - Application logic and event handling
//!
//! Handles terminal input and coordinates the model, the music player and
//! the view layout used for mouse hit-testing.
//!
//! - `input`: key and mouse event handling
//! - `gallery`: gallery grid and lightbox actions
//! - `playback`: music player actions

mod input;
mod gallery;
mod playback;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{AppModel, MusicPlayer};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) player: Arc<Mutex<MusicPlayer>>,
    /// Whether the pointer is currently over the player button
    hovering_player: Arc<Mutex<bool>>,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, player: Arc<Mutex<MusicPlayer>>) -> Self {
        Self {
            model,
            player,
            hovering_player: Arc::new(Mutex::new(false)),
        }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        let error_str = format!("{error:#}");

        if error_str.contains("could not be loaded") || error_str.contains("opening audio file") {
            "Music file could not be loaded.".to_string()
        } else if error_str.contains("did not start within") {
            "Audio output is not responding.".to_string()
        } else if error_str.contains("output stream") || error_str.contains("device") {
            "No usable audio output device.".to_string()
        } else {
            format!("Error: {}", error_str)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn errors_are_made_readable() {
        let e = anyhow!("music could not be loaded: no such file");
        assert_eq!(AppController::format_error(&e), "Music file could not be loaded.");
        let e = anyhow!("audio output did not start within 10s");
        assert_eq!(AppController::format_error(&e), "Audio output is not responding.");
        let e = anyhow!("something odd");
        assert_eq!(AppController::format_error(&e), "Error: something odd");
    }
}
