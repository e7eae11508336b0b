//! Audio output for the background music player
//!
//! - `decoder`: Symphonia decoding of a whole track into memory
//! - `output`: CPAL device output driven from a dedicated audio thread
//! - `silent`: device-less backend used with `--no-audio`
//!
//! A backend opens one [`AudioResource`] per music config. Starting playback
//! may be refused by the host (autoplay policy, missing device), so it
//! reports its outcome through a [`PlayRequest`] rather than assuming success.

mod decoder;
mod output;
mod silent;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

use crate::config::AppConfig;
use crate::model::MusicConfig;

pub use output::CpalBackend;
pub use silent::SilentBackend;

/// Volume a freshly opened resource starts at
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Who asked for playback to start
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOrigin {
    /// A key press or click
    User,
    /// Unsolicited start when the player mounts
    Autoplay,
}

/// Pending outcome of a start request.
///
/// Dropping it abandons the request; a late answer is discarded.
#[derive(Debug)]
pub struct PlayRequest {
    rx: Receiver<Result<()>>,
}

impl PlayRequest {
    /// Create the request and the sender the backend answers on
    pub fn channel() -> (Sender<Result<()>>, Self) {
        let (tx, rx) = bounded(1);
        (tx, Self { rx })
    }

    /// Request whose outcome is already known
    pub fn ready(result: Result<()>) -> Self {
        let (tx, request) = Self::channel();
        let _ = tx.send(result);
        request
    }

    /// Outcome if the backend has answered, without blocking
    pub fn try_outcome(&self) -> Option<Result<()>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(anyhow!("audio thread stopped before answering"))),
        }
    }

    /// Block until the backend answers or `timeout` passes
    #[cfg(test)]
    pub fn wait(self, timeout: std::time::Duration) -> Result<()> {
        use crossbeam_channel::RecvTimeoutError;

        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(anyhow!("audio output did not start within {:?}", timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(anyhow!("audio thread stopped before answering")),
        }
    }
}

/// One loaded, looping track on an output.
pub trait AudioResource: Send {
    /// Start or resume playback
    fn play(&mut self, origin: PlayOrigin) -> PlayRequest;
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    fn is_muted(&self) -> bool;
    fn volume(&self) -> f32;
    /// Stop playback and drop the source; the resource is dead afterwards
    fn release(&mut self);
}

pub trait AudioBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn open(&self, music: &MusicConfig) -> Result<Box<dyn AudioResource>>;
}

/// Pick the audio backend for this run.
///
/// Falls back to the silent backend when no output device is available.
pub fn select_backend(config: &AppConfig) -> Arc<dyn AudioBackend> {
    if config.no_audio {
        tracing::info!("Audio disabled, using silent backend");
        return Arc::new(SilentBackend::new(config.autoplay_policy));
    }
    match CpalBackend::new(config) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            tracing::warn!(error = %e, "No audio output available, using silent backend");
            Arc::new(SilentBackend::new(config.autoplay_policy))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn ready_request_reports_immediately() {
        let request = PlayRequest::ready(Ok(()));
        assert!(matches!(request.try_outcome(), Some(Ok(()))));

        let request = PlayRequest::ready(Err(anyhow!("refused")));
        assert!(request.wait(Duration::from_millis(10)).is_err());
    }

    #[test]
    fn unanswered_request_is_pending_then_disconnected() {
        let (tx, request) = PlayRequest::channel();
        assert!(request.try_outcome().is_none());
        drop(tx);
        assert!(matches!(request.try_outcome(), Some(Err(_))));
    }

    #[test]
    fn wait_times_out() {
        let (_tx, request) = PlayRequest::channel();
        assert!(request.wait(Duration::from_millis(5)).is_err());
    }
}
