//! Floating music player state
//!
//! Owns at most one audio resource at a time. Play and mute flags are always
//! read back from the resource after a change so the UI never drifts from
//! what is actually audible.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};

use crate::audio::{AudioBackend, AudioResource, PlayOrigin, PlayRequest};

use super::invitation::MusicConfig;

/// How long a user-initiated start may take, including the initial decode
pub const PLAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub is_muted: bool,
    /// Info panel visibility; has no effect on playback
    pub is_expanded: bool,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }
}

/// Render-side copy of the player
#[derive(Clone, Debug, Default)]
pub struct PlayerView {
    pub music: Option<Arc<MusicConfig>>,
    pub state: PlaybackState,
    pub volume: f32,
}

/// A start request the backend has not answered yet.
///
/// Tagged with the resource generation so an answer that arrives after the
/// music was swapped is ignored.
#[derive(Debug)]
struct PendingPlay {
    origin: PlayOrigin,
    generation: u64,
    request: PlayRequest,
    /// Only user requests give up; autoplay waits for as long as decoding takes
    deadline: Option<Instant>,
}

impl PendingPlay {
    fn timed_out(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

pub struct MusicPlayer {
    backend: Arc<dyn AudioBackend>,
    music: Option<Arc<MusicConfig>>,
    resource: Option<Box<dyn AudioResource>>,
    pending: Option<PendingPlay>,
    generation: u64,
    state: PlaybackState,
}

impl MusicPlayer {
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            music: None,
            resource: None,
            pending: None,
            generation: 0,
            state: PlaybackState::default(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[cfg(test)]
    pub fn has_resource(&self) -> bool {
        self.resource.is_some()
    }

    /// Mount the player on `music`.
    ///
    /// The same `Arc` again is a no-op. Anything else releases the current
    /// resource first, then opens a new one and tries autoplay if asked.
    pub fn set_music(&mut self, music: Option<Arc<MusicConfig>>) {
        let unchanged = match (&self.music, &music) {
            (Some(current), Some(next)) => Arc::ptr_eq(current, next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.teardown();
        self.music = music;
        self.generation += 1;

        let Some(music) = self.music.clone() else {
            tracing::debug!("No music configured, player hidden");
            return;
        };

        match self.backend.open(&music) {
            Ok(mut resource) => {
                tracing::info!(
                    title = %music.title,
                    artist = %music.artist,
                    backend = self.backend.name(),
                    autoplay = music.wants_autoplay(),
                    "Music mounted"
                );
                if music.wants_autoplay() {
                    self.pending = Some(PendingPlay {
                        origin: PlayOrigin::Autoplay,
                        generation: self.generation,
                        request: resource.play(PlayOrigin::Autoplay),
                        deadline: None,
                    });
                }
                self.resource = Some(resource);
            }
            Err(e) => {
                tracing::error!(url = %music.url, error = %format!("{e:#}"), "Could not open music");
            }
        }
    }

    /// Settle a pending start request once the backend has answered.
    ///
    /// Returns whether the state changed. A refused or timed out user start
    /// is returned as the error; a refused autoplay is only logged.
    pub fn poll(&mut self) -> Result<bool> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };
        let outcome = match pending.request.try_outcome() {
            Some(outcome) => outcome,
            None if pending.timed_out() => {
                // Do not let a late start play behind a stopped button
                if let Some(resource) = self.resource.as_mut() {
                    resource.pause();
                }
                Err(anyhow!("audio output did not start within {:?}", PLAY_TIMEOUT))
            }
            None => {
                self.pending = Some(pending);
                return Ok(false);
            }
        };

        if pending.generation != self.generation || self.resource.is_none() {
            tracing::debug!("Discarding play result for a released resource");
            return Ok(false);
        }

        if outcome.is_err() {
            if let Some(resource) = self.resource.as_mut().filter(|r| r.is_playing()) {
                resource.pause();
            }
        }
        let before = self.state;
        self.sync_from_resource();
        let changed = before != self.state;

        match (pending.origin, outcome) {
            (origin, Ok(())) => {
                tracing::info!(?origin, "Playback started");
                Ok(changed)
            }
            (PlayOrigin::Autoplay, Err(e)) => {
                // Expected on most hosts; the listener can still press play
                tracing::info!(reason = %e, "Autoplay prevented");
                Ok(changed)
            }
            (PlayOrigin::User, Err(e)) => Err(e),
        }
    }

    /// Pause when playing or starting, otherwise ask the resource to start.
    ///
    /// Starting only sends the request; [`MusicPlayer::poll`] settles it.
    /// Without a resource this does nothing.
    pub fn toggle_play(&mut self) {
        let starting = self.is_starting();
        let Some(resource) = self.resource.as_mut() else {
            return;
        };
        // A user gesture supersedes any unsettled request
        self.pending = None;

        if self.state.is_playing() || starting {
            resource.pause();
            self.sync_from_resource();
            tracing::debug!(status = ?self.state.status, "Playback paused");
            return;
        }

        self.pending = Some(PendingPlay {
            origin: PlayOrigin::User,
            generation: self.generation,
            request: resource.play(PlayOrigin::User),
            deadline: Some(Instant::now() + PLAY_TIMEOUT),
        });
        tracing::debug!("Playback requested");
    }

    /// True while a user start is waiting for the backend
    fn is_starting(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.origin == PlayOrigin::User)
    }

    /// Flip mute on the resource, then mirror the resource's flag.
    pub fn toggle_mute(&mut self) {
        let Some(resource) = self.resource.as_mut() else {
            return;
        };
        resource.set_muted(!self.state.is_muted);
        self.state.is_muted = resource.is_muted();
        tracing::debug!(muted = self.state.is_muted, "Mute toggled");
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.state.is_expanded = expanded;
    }

    pub fn toggle_expanded(&mut self) {
        self.state.is_expanded = !self.state.is_expanded;
    }

    /// Pause and release the resource, abandoning any pending start.
    pub fn teardown(&mut self) {
        self.pending = None;
        if let Some(mut resource) = self.resource.take() {
            resource.pause();
            resource.release();
            tracing::debug!("Music resource released");
        }
        self.state.status = PlaybackStatus::Stopped;
        self.state.is_muted = false;
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            music: self.music.clone(),
            state: self.state,
            volume: self.resource.as_ref().map(|r| r.volume()).unwrap_or(0.0),
        }
    }

    fn sync_from_resource(&mut self) {
        let Some(resource) = self.resource.as_ref() else {
            self.state.status = PlaybackStatus::Stopped;
            return;
        };
        self.state.is_muted = resource.is_muted();
        self.state.status = match (resource.is_playing(), self.state.status) {
            (true, _) => PlaybackStatus::Playing,
            (false, PlaybackStatus::Playing) => PlaybackStatus::Paused,
            (false, status) => status,
        };
    }
}

impl Drop for MusicPlayer {
    fn drop(&mut self) {
        self.teardown();
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingBackend;
    use super::*;
    use std::sync::atomic::Ordering;

    fn music(url: &str, autoplay: bool) -> Arc<MusicConfig> {
        Arc::new(MusicConfig {
            url: url.to_string(),
            title: "Perfect".to_string(),
            artist: "Ed Sheeran".to_string(),
            autoplay: Some(autoplay),
        })
    }

    fn press_play(player: &mut MusicPlayer) -> Result<()> {
        player.toggle_play();
        player.poll().map(|_| ())
    }

    #[test]
    fn without_music_nothing_is_created_and_toggles_are_noops() {
        let backend = RecordingBackend::default();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        player.set_music(None);
        assert!(!player.has_resource());
        player.toggle_play();
        assert!(!player.poll().unwrap());
        player.toggle_mute();
        assert_eq!(player.state(), PlaybackState::default());
        assert!(backend.events().is_empty());
    }

    #[test]
    fn toggle_play_pauses_and_resumes() {
        let backend = RecordingBackend::default();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        player.set_music(Some(music("/a.mp3", false)));
        assert_eq!(player.state().status, PlaybackStatus::Stopped);

        press_play(&mut player).unwrap();
        assert_eq!(player.state().status, PlaybackStatus::Playing);
        press_play(&mut player).unwrap();
        assert_eq!(player.state().status, PlaybackStatus::Paused);
        press_play(&mut player).unwrap();
        assert!(player.state().is_playing());
    }

    #[test]
    fn refused_user_play_leaves_state_unchanged() {
        let backend = RecordingBackend {
            reject_user_play: true,
            ..RecordingBackend::default()
        };
        let mut player = MusicPlayer::new(Arc::new(backend));
        player.set_music(Some(music("/a.mp3", false)));
        assert!(press_play(&mut player).is_err());
        assert_eq!(player.state().status, PlaybackStatus::Stopped);
    }

    #[test]
    fn rejected_autoplay_stays_stopped_without_error() {
        let backend = RecordingBackend::rejecting_autoplay();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        player.set_music(Some(music("/a.mp3", true)));
        assert!(!player.poll().unwrap());
        assert!(!player.state().is_playing());
        assert_eq!(player.state().status, PlaybackStatus::Stopped);
        assert_eq!(backend.events(), vec!["open /a.mp3", "play /a.mp3"]);
    }

    #[test]
    fn accepted_autoplay_starts_playing_after_poll() {
        let backend = RecordingBackend::default();
        let mut player = MusicPlayer::new(Arc::new(backend));
        player.set_music(Some(music("/a.mp3", true)));
        assert!(player.poll().unwrap());
        assert!(player.state().is_playing());
    }

    #[test]
    fn autoplay_is_not_attempted_unless_configured() {
        let backend = RecordingBackend::default();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        player.set_music(Some(music("/a.mp3", false)));
        assert!(!player.poll().unwrap());
        assert_eq!(backend.events(), vec!["open /a.mp3"]);
    }

    #[test]
    fn pending_autoplay_is_abandoned_on_teardown() {
        let backend = RecordingBackend::deferring();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        player.set_music(Some(music("/a.mp3", true)));
        assert!(!player.poll().unwrap());
        player.set_music(None);
        for tx in backend.deferred.lock().unwrap().drain(..) {
            // Receiver is gone, so the late answer goes nowhere
            assert!(tx.send(Ok(())).is_err());
        }
        assert!(!player.poll().unwrap());
        assert!(!player.state().is_playing());
    }

    #[test]
    fn mute_twice_restores_and_tracks_resource() {
        let backend = RecordingBackend::default();
        let mut player = MusicPlayer::new(Arc::new(backend));
        player.set_music(Some(music("/a.mp3", false)));
        let original = player.state().is_muted;

        player.toggle_mute();
        assert_eq!(player.state().is_muted, !original);
        assert_eq!(player.resource.as_ref().unwrap().is_muted(), player.state().is_muted);

        player.toggle_mute();
        assert_eq!(player.state().is_muted, original);
        assert_eq!(player.resource.as_ref().unwrap().is_muted(), player.state().is_muted);
    }

    #[test]
    fn changing_music_releases_before_opening() {
        let backend = RecordingBackend::default();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        player.set_music(Some(music("/a.mp3", false)));
        press_play(&mut player).unwrap();
        player.set_music(Some(music("/b.mp3", false)));

        assert_eq!(
            backend.events(),
            vec!["open /a.mp3", "play /a.mp3", "pause /a.mp3", "release /a.mp3", "open /b.mp3"]
        );
        assert_eq!(backend.max_live.load(Ordering::SeqCst), 1);
        assert_eq!(backend.live(), 1);
        assert_eq!(player.state().status, PlaybackStatus::Stopped);
    }

    #[test]
    fn same_config_reference_keeps_resource() {
        let backend = RecordingBackend::default();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        let config = music("/a.mp3", false);
        player.set_music(Some(config.clone()));
        player.set_music(Some(config));
        assert_eq!(backend.events(), vec!["open /a.mp3"]);

        // Equal content under a new reference is a new config
        player.set_music(Some(music("/a.mp3", false)));
        assert_eq!(backend.journal.lock().unwrap().opened.len(), 2);
    }

    #[test]
    fn user_play_settles_on_a_later_poll() {
        let backend = RecordingBackend::deferring();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        player.set_music(Some(music("/a.mp3", false)));

        player.toggle_play();
        assert!(player.is_starting());
        assert!(!player.poll().unwrap());
        assert_eq!(player.state().status, PlaybackStatus::Stopped);

        backend.answer_deferred(|| Ok(()));
        assert!(player.poll().unwrap());
        assert!(player.state().is_playing());
        assert!(!player.is_starting());
    }

    #[test]
    fn refused_deferred_user_play_is_reported_by_poll() {
        let backend = RecordingBackend::deferring();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        player.set_music(Some(music("/a.mp3", false)));

        player.toggle_play();
        backend.answer_deferred(|| Err(anyhow::anyhow!("device busy")));
        let err = player.poll().unwrap_err();
        assert!(err.to_string().contains("device busy"));
        assert_eq!(player.state().status, PlaybackStatus::Stopped);
        assert!(!player.poll().unwrap());
    }

    #[test]
    fn pressing_again_while_starting_cancels() {
        let backend = RecordingBackend::deferring();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        player.set_music(Some(music("/a.mp3", false)));

        player.toggle_play();
        player.toggle_play();
        assert!(!player.is_starting());
        backend.answer_deferred(|| Ok(()));
        assert!(!player.poll().unwrap());
        assert_eq!(player.state().status, PlaybackStatus::Stopped);
        assert_eq!(backend.events(), vec!["open /a.mp3", "play /a.mp3", "pause /a.mp3"]);
    }

    #[test]
    fn stale_play_result_is_ignored() {
        let backend = RecordingBackend::deferring();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        player.set_music(Some(music("/a.mp3", false)));
        player.toggle_play();
        player.set_music(Some(music("/b.mp3", false)));
        backend.answer_deferred(|| Ok(()));
        assert!(!player.poll().unwrap());
        assert_eq!(player.state().status, PlaybackStatus::Stopped);
    }

    #[test]
    fn dropping_player_releases_resource() {
        let backend = RecordingBackend::default();
        {
            let mut player = MusicPlayer::new(Arc::new(backend.clone()));
            player.set_music(Some(music("/a.mp3", true)));
            player.poll().unwrap();
            assert_eq!(backend.live(), 1);
        }
        assert_eq!(backend.live(), 0);
        assert!(backend.events().contains(&"release /a.mp3".to_string()));
    }

    #[test]
    fn expanding_does_not_touch_playback() {
        let backend = RecordingBackend::default();
        let mut player = MusicPlayer::new(Arc::new(backend.clone()));
        player.set_music(Some(music("/a.mp3", false)));
        player.set_expanded(true);
        player.toggle_expanded();
        player.toggle_expanded();
        assert!(player.state().is_expanded);
        assert_eq!(player.state().status, PlaybackStatus::Stopped);
        assert_eq!(backend.events(), vec!["open /a.mp3"]);
    }
}
