//! Backend without an output device

use anyhow::{anyhow, Result};

use crate::config::AutoplayPolicy;
use crate::model::MusicConfig;

use super::{AudioBackend, AudioResource, PlayOrigin, PlayRequest, DEFAULT_VOLUME};

pub struct SilentBackend {
    policy: AutoplayPolicy,
}

impl SilentBackend {
    pub fn new(policy: AutoplayPolicy) -> Self {
        Self { policy }
    }
}

impl AudioBackend for SilentBackend {
    fn name(&self) -> &'static str {
        "silent"
    }

    fn open(&self, music: &MusicConfig) -> Result<Box<dyn AudioResource>> {
        tracing::debug!(url = %music.url, "Opening silent audio resource");
        Ok(Box::new(SilentResource {
            policy: self.policy,
            playing: false,
            muted: false,
            released: false,
        }))
    }
}

/// Keeps play/mute flags exactly like a real output would
struct SilentResource {
    policy: AutoplayPolicy,
    playing: bool,
    muted: bool,
    released: bool,
}

impl AudioResource for SilentResource {
    fn play(&mut self, origin: PlayOrigin) -> PlayRequest {
        if self.released {
            return PlayRequest::ready(Err(anyhow!("audio resource already released")));
        }
        if origin == PlayOrigin::Autoplay && !self.policy.allows_autoplay() {
            return PlayRequest::ready(Err(anyhow!("autoplay is not allowed on this host")));
        }
        self.playing = true;
        PlayRequest::ready(Ok(()))
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn volume(&self) -> f32 {
        DEFAULT_VOLUME
    }

    fn release(&mut self) {
        self.playing = false;
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn music() -> MusicConfig {
        MusicConfig {
            url: "/audio/song.mp3".into(),
            title: "Song".into(),
            artist: "Artist".into(),
            autoplay: Some(true),
        }
    }

    #[test]
    fn deny_policy_refuses_autoplay_but_not_user_play() {
        let backend = SilentBackend::new(AutoplayPolicy::Deny);
        let mut resource = backend.open(&music()).unwrap();
        assert!(resource.play(PlayOrigin::Autoplay).wait(Duration::from_millis(100)).is_err());
        assert!(!resource.is_playing());
        assert!(resource.play(PlayOrigin::User).wait(Duration::from_millis(100)).is_ok());
        assert!(resource.is_playing());
    }

    #[test]
    fn released_resource_cannot_restart() {
        let backend = SilentBackend::new(AutoplayPolicy::Allow);
        let mut resource = backend.open(&music()).unwrap();
        resource.play(PlayOrigin::Autoplay).wait(Duration::from_millis(100)).unwrap();
        resource.release();
        assert!(!resource.is_playing());
        assert!(resource.play(PlayOrigin::User).wait(Duration::from_millis(100)).is_err());
    }
}
