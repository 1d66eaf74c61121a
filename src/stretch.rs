//! Overlap-add time stretching
//!
//! Resynthesizes Hann-windowed grains at a new hop spacing to change
//! duration without altering pitch. Operates on whole buffers; channels are
//! processed independently.

use crate::pcm::AudioBuffer;
use std::f32::consts::PI;
use tracing::debug;

/// Analysis window length in samples
pub const WINDOW_SIZE: usize = 1024;
/// Analysis hop in samples (50% overlap)
pub const ANALYSIS_HOP: usize = 512;

/// Ratios closer to unity than this bypass synthesis entirely
const IDENTITY_EPSILON: f32 = 0.001;
/// Accumulated window weight below this is left unnormalized
const WEIGHT_FLOOR: f32 = 0.01;

/// Stretch `buffer` to `1/ratio` of its duration without changing pitch.
///
/// Output length is `floor(input_frames / ratio)` per channel, floored at
/// one frame so degenerate inputs never divide by zero. Ratios within 0.001
/// of 1.0 return the input unchanged.
///
/// Samples near the buffer edges accumulate too little window weight to be
/// normalized and are left as raw near-zero accumulator values, so the
/// output fades briefly at the boundaries.
///
/// Panics if `ratio` is not positive and finite.
pub fn time_stretch(buffer: AudioBuffer, ratio: f32) -> AudioBuffer {
    assert!(
        ratio > 0.0 && ratio.is_finite(),
        "stretch ratio must be positive and finite"
    );
    if (ratio - 1.0).abs() < IDENTITY_EPSILON {
        return buffer;
    }

    debug!(
        "Time-stretching {} frames by ratio {:.4}",
        buffer.frame_count(),
        ratio
    );

    let sample_rate = buffer.sample_rate();
    let window = hann_window(WINDOW_SIZE);
    let channels = buffer
        .into_channels()
        .into_iter()
        .map(|ch| stretch_channel(&ch, ratio as f64, &window))
        .collect();
    AudioBuffer::new(channels, sample_rate)
}

/// Symmetric Hann window: `0.5 * (1 - cos(2πi / (size - 1)))`
pub(crate) fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (size - 1) as f32).cos()))
        .collect()
}

fn stretch_channel(input: &[f32], ratio: f64, window: &[f32]) -> Vec<f32> {
    let new_len = ((input.len() as f64 / ratio).floor() as usize).max(1);
    // Floor at 1 so extreme ratios cannot stall the synthesis loop
    let synthesis_hop = ((ANALYSIS_HOP as f64 / ratio).floor() as usize).max(1);

    let mut output = vec![0.0f32; new_len];
    let mut weight = vec![0.0f32; new_len];

    let mut pos = 0;
    while pos + WINDOW_SIZE <= new_len {
        let input_idx = (pos as f64 * ratio).floor() as usize;
        if input_idx + WINDOW_SIZE > input.len() {
            // Remaining tail stays as residual zeros in the accumulator
            break;
        }
        for (j, &w) in window.iter().enumerate() {
            output[pos + j] += input[input_idx + j] * w;
            weight[pos + j] += w;
        }
        pos += synthesis_hop;
    }

    for (sample, &w) in output.iter_mut().zip(weight.iter()) {
        if w > WEIGHT_FLOOR {
            *sample /= w;
        }
    }

    output
}
