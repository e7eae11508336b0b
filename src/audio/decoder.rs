//! Whole-file decoding with Symphonia
//!
//! Invitation tracks are a few minutes long, so the entire track is decoded
//! up front into interleaved f32 samples and looped from memory.

use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{anyhow, bail, ensure, Context, Result};
use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Input frames handed to the resampler per call
const RESAMPLE_CHUNK_FRAMES: usize = 1024;

/// Interleaved PCM in `[-1.0, 1.0]`
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedTrack {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl DecodedTrack {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /// Convert to the channel count and sample rate of an output device.
    ///
    /// Mono sources are duplicated to every output channel, mono outputs get
    /// the average of all source channels, otherwise channel `c` takes source
    /// channel `min(c, last)`. A different rate goes through a sinc resampler.
    pub fn adapt_to(&self, channels: u16, sample_rate: u32) -> Result<Vec<f32>> {
        let mapped = self.map_channels(channels);
        if mapped.is_empty() || sample_rate == self.sample_rate {
            return Ok(mapped);
        }
        ensure!(
            self.sample_rate > 0 && sample_rate > 0,
            "cannot resample {} Hz to {} Hz",
            self.sample_rate,
            sample_rate
        );
        resample(&mapped, channels.max(1) as usize, self.sample_rate, sample_rate)
    }

    fn map_channels(&self, channels: u16) -> Vec<f32> {
        let src_channels = self.channels.max(1) as usize;
        let dst_channels = channels.max(1) as usize;
        let mut out = Vec::with_capacity(self.frames() * dst_channels);
        for frame in self.samples.chunks_exact(src_channels) {
            if dst_channels == 1 {
                out.push(frame.iter().sum::<f32>() / src_channels as f32);
            } else {
                out.extend((0..dst_channels).map(|c| frame[c.min(src_channels - 1)]));
            }
        }
        out
    }
}

/// Resample interleaved `samples` from `from` Hz to `to` Hz in fixed input
/// chunks. The filter delay is trimmed so the loop point stays on the first
/// frame.
fn resample(samples: &[f32], channels: usize, from: u32, to: u32) -> Result<Vec<f32>> {
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = to as f64 / from as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, RESAMPLE_CHUNK_FRAMES, channels)
        .map_err(|e| anyhow!("creating resampler: {e}"))?;

    let frames = samples.len() / channels;
    let expected = (frames as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();
    let mut planar: Vec<Vec<f32>> = vec![Vec::with_capacity(expected + delay); channels];

    let mut position = 0;
    while position < frames {
        let chunk_frames = resampler.input_frames_next();
        let end = (position + chunk_frames).min(frames);

        // De-interleave the chunk
        let mut deinterleaved: Vec<Vec<f32>> = vec![Vec::with_capacity(chunk_frames); channels];
        for frame in samples[position * channels..end * channels].chunks_exact(channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                deinterleaved[ch].push(sample);
            }
        }

        let output = if end - position == chunk_frames {
            resampler.process(&deinterleaved, None)
        } else {
            resampler.process_partial(Some(&deinterleaved), None)
        }
        .map_err(|e| anyhow!("resampling music: {e}"))?;

        for (dst, src) in planar.iter_mut().zip(output) {
            dst.extend(src);
        }
        position = end;
    }

    // Flush what is still inside the filter
    while planar[0].len() < expected + delay {
        let output = resampler
            .process_partial(None::<&[Vec<f32>]>, None)
            .map_err(|e| anyhow!("flushing resampler: {e}"))?;
        if output[0].is_empty() {
            break;
        }
        for (dst, src) in planar.iter_mut().zip(output) {
            dst.extend(src);
        }
    }

    // Re-interleave
    let available = planar[0].len().saturating_sub(delay).min(expected);
    let mut interleaved = Vec::with_capacity(available * channels);
    for i in delay..delay + available {
        for ch in &planar {
            interleaved.push(ch[i]);
        }
    }
    Ok(interleaved)
}

/// Decode every packet of the default track in `path`.
///
/// `cancelled` is checked before each packet so a released resource does not
/// wait for the whole file.
pub fn decode_file(path: &Path, cancelled: &AtomicBool) -> Result<DecodedTrack> {
    let file = File::open(path).with_context(|| format!("opening audio file {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("probing audio file {}", path.display()))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| anyhow!("no audio track in {}", path.display()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(44_100);
    let mut channels = track.codec_params.channels.map(|c| c.count() as u16).unwrap_or(2);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("creating audio decoder")?;

    let mut samples = Vec::new();

    loop {
        if cancelled.load(Ordering::Acquire) {
            bail!("decoding of {} cancelled", path.display());
        }
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e).context("reading audio packet"),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            // Corrupt frames are skipped
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::debug!(error = %e, "Skipping undecodable packet");
            }
            Err(e) => return Err(e).context("decoding audio packet"),
        }
    }

    tracing::info!(
        path = %path.display(),
        channels,
        sample_rate,
        frames = samples.len() / channels.max(1) as usize,
        "Decoded audio track"
    );

    Ok(DecodedTrack {
        samples,
        channels,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn track(samples: Vec<f32>, channels: u16, sample_rate: u32) -> DecodedTrack {
        DecodedTrack {
            samples,
            channels,
            sample_rate,
        }
    }

    /// 16-bit PCM WAV with `frames` frames of a constant value
    fn write_wav(file: &mut impl Write, channels: u16, sample_rate: u32, frames: u32) {
        let data_len = frames * channels as u32 * 2;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&(sample_rate * channels as u32 * 2).to_le_bytes());
        bytes.extend_from_slice(&(channels * 2).to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for _ in 0..frames * channels as u32 {
            bytes.extend_from_slice(&8192i16.to_le_bytes());
        }
        file.write_all(&bytes).unwrap();
    }

    #[test]
    fn same_format_is_unchanged() {
        let t = track(vec![0.1, -0.1, 0.2, -0.2], 2, 48_000);
        assert_eq!(t.adapt_to(2, 48_000).unwrap(), t.samples);
    }

    #[test]
    fn mono_is_duplicated_to_stereo() {
        let t = track(vec![0.25, 0.5], 1, 44_100);
        assert_eq!(t.adapt_to(2, 44_100).unwrap(), vec![0.25, 0.25, 0.5, 0.5]);
    }

    #[test]
    fn stereo_is_averaged_to_mono() {
        let t = track(vec![1.0, 0.0, 0.5, 0.5], 2, 44_100);
        assert_eq!(t.adapt_to(1, 44_100).unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    fn resampling_scales_length_and_keeps_level() {
        // 0.1 s of a constant level at 44.1 kHz, played on a 48 kHz stereo device
        let t = track(vec![0.5; 4410], 1, 44_100);
        let out = t.adapt_to(2, 48_000).unwrap();
        assert_eq!(out.len(), 4800 * 2);

        let middle = &out[2000 * 2..2800 * 2];
        assert!(middle.iter().all(|s| (s - 0.5).abs() < 0.01), "level drifted");
        // Both channels carry the same signal
        assert!(middle.chunks_exact(2).all(|f| f[0] == f[1]));
    }

    #[test]
    fn downsampling_handles_a_partial_last_chunk() {
        let t = track(vec![0.25; 2 * 3000], 2, 48_000);
        let out = t.adapt_to(2, 24_000).unwrap();
        assert_eq!(out.len(), 1500 * 2);
    }

    #[test]
    fn unknown_source_rate_cannot_be_resampled() {
        let t = track(vec![0.5; 8], 1, 0);
        assert!(t.adapt_to(1, 48_000).is_err());
    }

    #[test]
    fn empty_track_adapts_to_nothing() {
        let t = track(Vec::new(), 2, 44_100);
        assert!(t.adapt_to(2, 48_000).unwrap().is_empty());
    }

    #[test]
    fn decodes_a_wav_file() {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        write_wav(&mut file, 2, 8_000, 800);

        let decoded = decode_file(file.path(), &AtomicBool::new(false)).unwrap();
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.sample_rate, 8_000);
        assert_eq!(decoded.frames(), 800);
        assert!((decoded.samples[0] - 0.25).abs() < 1e-3);
    }

    #[test]
    fn cancelled_decode_stops_early() {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        write_wav(&mut file, 1, 8_000, 800);

        let err = decode_file(file.path(), &AtomicBool::new(true)).unwrap_err();
        assert!(err.to_string().contains("cancelled"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = decode_file(Path::new("/definitely/not/here.mp3"), &AtomicBool::new(false)).unwrap_err();
        assert!(format!("{err:#}").contains("opening audio file"));
    }
}
