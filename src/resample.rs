//! Pitch-shifting resampler
//!
//! Linear-interpolation playback-rate change. Resampling by a factor shifts
//! pitch by `12 * log2(factor)` semitones and scales duration by the inverse
//! as a side effect; the orchestrator pre-stretches to compensate.

use crate::effects::TransformError;
use crate::pcm::AudioBuffer;
use async_trait::async_trait;
use tracing::debug;

/// Awaitable resampling seam.
///
/// Environments with a native rendering facility can plug in their own
/// implementation; [`LinearResampler`] is the default pure-software kernel.
#[async_trait]
pub trait Resampler: Send + Sync {
    /// Resample `buffer` by `factor`, shifting pitch up for factors above
    /// one and down below it.
    async fn resample(
        &self,
        buffer: AudioBuffer,
        factor: f32,
    ) -> Result<AudioBuffer, TransformError>;
}

/// Default software resampler using linear interpolation
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearResampler;

#[async_trait]
impl Resampler for LinearResampler {
    async fn resample(
        &self,
        buffer: AudioBuffer,
        factor: f32,
    ) -> Result<AudioBuffer, TransformError> {
        tokio::task::spawn_blocking(move || resample_buffer(buffer, factor))
            .await
            .map_err(|e| TransformError::Render(e.to_string()))
    }
}

/// Synchronous resampling kernel.
///
/// Output length is `floor(input_frames / factor)`, floored at one frame so
/// degenerate inputs never collapse to nothing. A factor of exactly 1.0
/// returns the input unchanged.
///
/// Panics if `factor` is not positive and finite.
pub fn resample_buffer(buffer: AudioBuffer, factor: f32) -> AudioBuffer {
    assert!(
        factor > 0.0 && factor.is_finite(),
        "resample factor must be positive and finite"
    );
    if factor == 1.0 {
        return buffer;
    }

    debug!(
        "Resampling {} frames by factor {:.4}",
        buffer.frame_count(),
        factor
    );

    let sample_rate = buffer.sample_rate();
    let channels = buffer
        .into_channels()
        .into_iter()
        .map(|ch| resample_channel(&ch, factor as f64))
        .collect();
    AudioBuffer::new(channels, sample_rate)
}

fn resample_channel(input: &[f32], factor: f64) -> Vec<f32> {
    if input.is_empty() {
        return vec![0.0];
    }

    let out_len = ((input.len() as f64 / factor).floor() as usize).max(1);
    let mut output = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let src = i as f64 * factor;
        let idx = src as usize;
        let next = (idx + 1).min(input.len() - 1);
        let frac = (src - idx as f64) as f32;
        output.push(input[idx] * (1.0 - frac) + input[next] * frac);
    }
    output
}
