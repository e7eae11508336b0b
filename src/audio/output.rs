//! CPAL output for a single looping track
//!
//! The CPAL `Stream` is not `Send` on every platform, so each resource owns a
//! dedicated audio thread that holds the stream. The UI side talks to it over
//! a command channel and shares only atomics with the real-time callback.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::config::{AppConfig, AutoplayPolicy};
use crate::model::MusicConfig;

use super::decoder::{decode_file, DecodedTrack};
use super::{AudioBackend, AudioResource, PlayOrigin, PlayRequest, DEFAULT_VOLUME};

pub struct CpalBackend {
    config: StreamConfig,
    settings: AppConfig,
}

impl CpalBackend {
    /// Probe the host's default output device.
    ///
    /// Each resource reopens the default device on its own audio thread, so
    /// only the stream configuration is kept here.
    pub fn new(settings: &AppConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no default audio output device"))?;
        let config = device
            .default_output_config()
            .context("querying default output config")?
            .config();

        tracing::info!(
            channels = config.channels,
            sample_rate = config.sample_rate,
            "Audio output ready"
        );

        Ok(Self {
            config,
            settings: settings.clone(),
        })
    }
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn open(&self, music: &MusicConfig) -> Result<Box<dyn AudioResource>> {
        let path = self.settings.resolve_asset(&music.url);
        tracing::debug!(path = %path.display(), title = %music.title, "Opening audio resource");
        let resource = CpalResource::spawn(self.config.clone(), path, self.settings.autoplay_policy)?;
        Ok(Box::new(resource))
    }
}

/// State shared between the resource handle, the audio thread and the callback
struct SharedState {
    playing: AtomicBool,
    /// Set before the release command so an unfinished decode gives up
    released: AtomicBool,
    muted: AtomicBool,
    /// f32 bits
    volume: AtomicU32,
    position: AtomicUsize,
}

impl SharedState {
    fn new() -> Self {
        Self {
            playing: AtomicBool::new(false),
            released: AtomicBool::new(false),
            muted: AtomicBool::new(false),
            volume: AtomicU32::new(DEFAULT_VOLUME.to_bits()),
            position: AtomicUsize::new(0),
        }
    }

    fn gain(&self) -> f32 {
        if self.muted.load(Ordering::Relaxed) {
            0.0
        } else {
            f32::from_bits(self.volume.load(Ordering::Relaxed))
        }
    }
}

enum AudioCommand {
    Play {
        origin: PlayOrigin,
        reply: Sender<Result<()>>,
    },
    Pause,
    Release,
}

pub struct CpalResource {
    command_tx: Sender<AudioCommand>,
    state: Arc<SharedState>,
    audio_thread: Option<JoinHandle<()>>,
}

impl CpalResource {
    fn spawn(config: StreamConfig, path: PathBuf, policy: AutoplayPolicy) -> Result<Self> {
        let state = Arc::new(SharedState::new());
        let (command_tx, command_rx) = unbounded::<AudioCommand>();

        let thread_state = Arc::clone(&state);
        let audio_thread = thread::Builder::new()
            .name("invitation-audio".to_string())
            .spawn(move || {
                AudioThread {
                    device: cpal::default_host().default_output_device(),
                    config,
                    policy,
                    state: thread_state,
                    stream: None,
                    source: None,
                }
                .run(path, command_rx);
            })
            .context("spawning audio thread")?;

        Ok(Self {
            command_tx,
            state,
            audio_thread: Some(audio_thread),
        })
    }
}

impl AudioResource for CpalResource {
    fn play(&mut self, origin: PlayOrigin) -> PlayRequest {
        let (reply, request) = PlayRequest::channel();
        if self
            .command_tx
            .send(AudioCommand::Play { origin, reply })
            .is_err()
        {
            return PlayRequest::ready(Err(anyhow!("audio thread is gone")));
        }
        request
    }

    fn pause(&mut self) {
        // The callback goes silent as soon as the flag drops
        self.state.playing.store(false, Ordering::Release);
        let _ = self.command_tx.send(AudioCommand::Pause);
    }

    fn is_playing(&self) -> bool {
        self.state.playing.load(Ordering::Acquire)
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.muted.store(muted, Ordering::Release);
    }

    fn is_muted(&self) -> bool {
        self.state.muted.load(Ordering::Acquire)
    }

    fn volume(&self) -> f32 {
        f32::from_bits(self.state.volume.load(Ordering::Relaxed))
    }

    fn release(&mut self) {
        self.state.playing.store(false, Ordering::Release);
        self.state.released.store(true, Ordering::Release);
        let _ = self.command_tx.send(AudioCommand::Release);
        if let Some(handle) = self.audio_thread.take() {
            if handle.join().is_err() {
                tracing::error!("Audio thread panicked");
            }
        }
    }
}

impl Drop for CpalResource {
    fn drop(&mut self) {
        if self.audio_thread.is_some() {
            self.release();
        }
    }
}

struct AudioThread {
    device: Option<Device>,
    config: StreamConfig,
    policy: AutoplayPolicy,
    state: Arc<SharedState>,
    stream: Option<Stream>,
    /// Decoded track, or why it could not be loaded
    source: Option<std::result::Result<DecodedTrack, String>>,
}

impl AudioThread {
    fn run(mut self, path: PathBuf, commands: Receiver<AudioCommand>) {
        let decoded = decode_file(&path, &self.state.released);
        if self.state.released.load(Ordering::Acquire) {
            tracing::debug!(path = %path.display(), "Released while decoding");
            return;
        }
        self.source = Some(decoded.map_err(|e| {
            tracing::error!(path = %path.display(), error = %format!("{e:#}"), "Failed to load music");
            format!("{e:#}")
        }));

        while let Ok(command) = commands.recv() {
            match command {
                AudioCommand::Play { origin, reply } => {
                    let result = self.start(origin);
                    let _ = reply.send(result);
                }
                AudioCommand::Pause => {
                    if let Some(stream) = &self.stream {
                        if let Err(e) = stream.pause() {
                            tracing::debug!(error = %e, "Stream pause failed, callback is silent anyway");
                        }
                    }
                }
                AudioCommand::Release => break,
            }
        }

        self.state.playing.store(false, Ordering::Release);
        self.state.position.store(0, Ordering::Relaxed);
        self.stream = None;
        self.source = None;
        tracing::debug!("Audio thread released its source");
    }

    fn start(&mut self, origin: PlayOrigin) -> Result<()> {
        if origin == PlayOrigin::Autoplay && !self.policy.allows_autoplay() {
            return Err(anyhow!("autoplay is not allowed on this host"));
        }

        if self.stream.is_none() {
            let stream = self.build_stream()?;
            self.stream = Some(stream);
        }

        if let Some(stream) = &self.stream {
            stream.play().context("starting output stream")?;
        }
        self.state.playing.store(true, Ordering::Release);
        Ok(())
    }

    fn build_stream(&self) -> Result<Stream> {
        let track = match &self.source {
            Some(Ok(track)) => track,
            Some(Err(reason)) => return Err(anyhow!("music could not be loaded: {reason}")),
            None => return Err(anyhow!("music source already released")),
        };

        let samples: Arc<[f32]> = track
            .adapt_to(self.config.channels, self.config.sample_rate)
            .context("converting music to the output format")?
            .into();
        if samples.is_empty() {
            return Err(anyhow!("music file contains no audio"));
        }

        let device = self
            .device
            .as_ref()
            .ok_or_else(|| anyhow!("audio output device disappeared"))?;
        let state = Arc::clone(&self.state);
        device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    fill_looping(data, &samples, &state);
                },
                |err| tracing::error!(error = %err, "Audio stream error"),
                None,
            )
            .context("building output stream")
    }
}

/// Real-time callback body: copy the looping track into `output`.
fn fill_looping(output: &mut [f32], samples: &[f32], state: &SharedState) {
    if !state.playing.load(Ordering::Acquire) || samples.is_empty() {
        output.fill(0.0);
        return;
    }

    let gain = state.gain();
    let mut pos = state.position.load(Ordering::Relaxed) % samples.len();
    for out in output.iter_mut() {
        *out = samples[pos] * gain;
        pos += 1;
        if pos == samples.len() {
            pos = 0;
        }
    }
    state.position.store(pos, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_loops_and_applies_volume() {
        let state = SharedState::new();
        state.playing.store(true, Ordering::Relaxed);
        let samples = [1.0, -1.0, 0.5];
        let mut out = [0.0; 7];
        fill_looping(&mut out, &samples, &state);
        assert_eq!(out, [0.5, -0.5, 0.25, 0.5, -0.5, 0.25, 0.5]);
        assert_eq!(state.position.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn callback_is_silent_when_paused_or_muted() {
        let state = SharedState::new();
        let samples = [1.0, 1.0, 1.0];
        let mut out = [9.0; 4];
        fill_looping(&mut out, &samples, &state);
        assert_eq!(out, [0.0; 4]);

        state.playing.store(true, Ordering::Relaxed);
        state.muted.store(true, Ordering::Relaxed);
        let mut out = [9.0; 4];
        fill_looping(&mut out, &samples, &state);
        assert_eq!(out, [0.0; 4]);
        // Muting does not stop the track from advancing
        assert_eq!(state.position.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn released_thread_skips_loading_and_exits() {
        let state = Arc::new(SharedState::new());
        state.released.store(true, Ordering::Release);
        let (command_tx, command_rx) = unbounded();
        let (reply, request) = PlayRequest::channel();
        command_tx
            .send(AudioCommand::Play {
                origin: PlayOrigin::User,
                reply,
            })
            .unwrap();

        // Returns even though the sender is still alive
        AudioThread {
            device: None,
            config: StreamConfig {
                channels: 2,
                sample_rate: 48_000,
                buffer_size: cpal::BufferSize::Default,
            },
            policy: AutoplayPolicy::Allow,
            state: Arc::clone(&state),
            stream: None,
            source: None,
        }
        .run(PathBuf::from("/definitely/not/here.mp3"), command_rx);

        // The queued play is dropped unanswered with the channel
        drop(command_tx);
        assert!(request.try_outcome().is_some_and(|r| r.is_err()));
    }
}
