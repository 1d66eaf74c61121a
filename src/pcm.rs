//! PCM frame interpretation
//!
//! Reinterprets provider byte streams as interleaved signed 16-bit
//! little-endian samples and de-interleaves them into per-channel float
//! buffers in [-1.0, 1.0).

use crate::config::AudioSpec;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::warn;

/// Normalized multi-channel audio.
///
/// Channel buffers always have identical length; sample rate and channel
/// count are fixed for the life of the buffer. Stages hand buffers along by
/// move, never by shared mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from per-channel sample vectors.
    ///
    /// Panics if `channels` is empty or the channel lengths differ.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        assert!(!channels.is_empty(), "buffer needs at least one channel");
        let frame_count = channels[0].len();
        assert!(
            channels.iter().all(|ch| ch.len() == frame_count),
            "all channels must have the same length"
        );
        Self {
            channels,
            sample_rate,
        }
    }

    /// All-zero buffer of `frames` frames matching `spec`.
    pub fn silence(frames: usize, spec: AudioSpec) -> Self {
        let channels = vec![vec![0.0; frames]; spec.channels.max(1) as usize];
        Self::new(channels, spec.sample_rate)
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels
    pub fn num_channels(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Samples per channel
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    /// Duration of the audio in seconds
    pub fn duration_secs(&self) -> f32 {
        self.frame_count() as f32 / self.sample_rate as f32
    }

    /// Per-channel sample buffers
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Samples of one channel
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// Consume the buffer, returning the channel vectors
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}

/// Interpret raw bytes as interleaved 16-bit little-endian PCM.
///
/// Each sample is normalized via `s / 32768.0`, so -32768 maps to exactly
/// -1.0 and 32767 to just under +1.0; the container encoder relies on that
/// asymmetry for exact round trips. Samples cycle across channels in order
/// (sample 0 to channel 0, sample 1 to channel 1, and so on).
///
/// A payload that is not a whole number of frames is truncated to the
/// largest frame-aligned prefix and a warning is logged; upstream encoders
/// are allowed to pad, so this is tolerated rather than treated as an error.
pub fn interpret_pcm(bytes: &[u8], spec: AudioSpec) -> AudioBuffer {
    let channels = spec.channels.max(1) as usize;
    let frame_bytes = 2 * channels;
    let usable = bytes.len() - bytes.len() % frame_bytes;
    if usable < bytes.len() {
        warn!(
            "PCM payload is not frame-aligned: dropping {} trailing bytes of {}",
            bytes.len() - usable,
            bytes.len()
        );
    }

    let frame_count = usable / frame_bytes;
    let mut out: Vec<Vec<f32>> = vec![Vec::with_capacity(frame_count); channels];
    let mut cursor = Cursor::new(&bytes[..usable]);
    let mut idx = 0usize;
    while let Ok(sample) = cursor.read_i16::<LittleEndian>() {
        out[idx % channels].push(sample as f32 / 32768.0);
        idx += 1;
    }

    AudioBuffer::new(out, spec.sample_rate)
}
