//! Shared helpers for integration/e2e tests.
//!
//! Synthetic PCM construction and audio sanity checks used across the
//! pipeline and end-to-end suites.

use base64::{engine::general_purpose, Engine as _};
use contralto::AudioBuffer;

/// Interleaved 16-bit little-endian bytes for `samples`
pub fn pcm_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Base64 transport blob carrying raw bytes
pub fn encode_raw(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Base64 transport blob carrying `samples` as 16-bit LE PCM
pub fn encode_blob(samples: &[i16]) -> String {
    encode_raw(&pcm_bytes(samples))
}

/// Integer sine tone at roughly half scale
pub fn sine_pcm(freq: f32, frames: usize, sample_rate: u32) -> Vec<i16> {
    (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            ((2.0 * std::f32::consts::PI * freq * t).sin() * 16000.0) as i16
        })
        .collect()
}

/// Mono float sine buffer at half scale
pub fn sine_buffer(freq: f32, frames: usize, sample_rate: u32) -> AudioBuffer {
    let samples: Vec<f32> = (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * freq * t).sin() * 0.5
        })
        .collect();
    AudioBuffer::new(vec![samples], sample_rate)
}

pub mod audio_validation {
    pub fn rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let s = samples.iter().map(|v| v * v).sum::<f32>() / samples.len() as f32;
        s.sqrt()
    }

    pub fn peak(samples: &[f32]) -> f32 {
        samples.iter().map(|v| v.abs()).fold(0.0f32, f32::max)
    }

    pub fn validate_audio(samples: &[f32]) {
        assert!(!samples.is_empty(), "audio is empty");
        for (i, &v) in samples.iter().enumerate() {
            assert!(v.is_finite(), "non-finite sample at {i}: {v}");
        }
        let p = peak(samples);
        assert!(p <= 1.0, "peak out of range: {p}");
        let r = rms(samples);
        assert!(r >= 1e-4, "rms too small (silence?): {r}");
    }
}
