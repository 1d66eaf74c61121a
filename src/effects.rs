//! Effect orchestration
//!
//! Combines time stretching and resampling so speed and pitch move
//! independently. The engine stretches first at `speed / pitch_factor`, then
//! resamples by `pitch_factor`; duration lands at `1/speed` of the original
//! while pitch lands at the requested semitone shift.

use crate::config::AudioSpec;
use crate::pcm::{self, AudioBuffer};
use crate::resample::{LinearResampler, Resampler};
use crate::stretch;
use crate::transport::{self, DecodeError};
use crate::wav;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during a transform request
#[derive(Error, Debug, Clone)]
pub enum TransformError {
    #[error("Transport decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Render worker failed: {0}")]
    Render(String),
}

// =============================================================================
// Request Types
// =============================================================================

/// Speed/pitch transform request
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformRequest {
    /// Target duration multiplier relative to the original, where >1 is
    /// faster. Must be positive.
    pub speed: f32,
    /// Pitch shift in semitones, signed
    pub pitch_semitones: f32,
}

impl TransformRequest {
    /// Identity request: unchanged speed and pitch
    pub fn new() -> Self {
        Self {
            speed: 1.0,
            pitch_semitones: 0.0,
        }
    }

    /// Set the speed multiplier
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the pitch shift in semitones
    pub fn with_pitch(mut self, semitones: f32) -> Self {
        self.pitch_semitones = semitones;
        self
    }
}

impl Default for TransformRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a signed semitone shift to a resampling pitch factor: `2^(s/12)`
pub fn semitones_to_factor(semitones: f32) -> f32 {
    2.0_f32.powf(semitones / 12.0)
}

// =============================================================================
// Engine
// =============================================================================

/// Orchestrates the stretch-then-resample pipeline.
///
/// Cheap to clone; concurrent transforms share no mutable state.
#[derive(Clone)]
pub struct EffectsEngine {
    resampler: Arc<dyn Resampler>,
}

impl EffectsEngine {
    /// Engine with the default software resampler
    pub fn new() -> Self {
        Self {
            resampler: Arc::new(LinearResampler),
        }
    }

    /// Engine with a caller-supplied resampler
    pub fn with_resampler(resampler: Arc<dyn Resampler>) -> Self {
        Self { resampler }
    }

    /// Apply a speed/pitch transform to `buffer`.
    ///
    /// Speed and pitch are decoupled: the final duration is `1/speed` of
    /// the input regardless of the pitch shift, and the pitch shift is the
    /// requested semitones regardless of speed. Extreme values are not
    /// rejected beyond positivity of speed; bounding them is the caller's
    /// job. The request is atomic: it yields a complete buffer or an error,
    /// never a partial result.
    pub async fn transform(
        &self,
        buffer: AudioBuffer,
        request: &TransformRequest,
    ) -> Result<AudioBuffer, TransformError> {
        if !(request.speed.is_finite() && request.speed > 0.0) {
            return Err(TransformError::InvalidRequest(format!(
                "speed must be positive and finite, got {}",
                request.speed
            )));
        }

        let pitch_factor = semitones_to_factor(request.pitch_semitones);
        let stretch_ratio = request.speed / pitch_factor;
        if !stretch_ratio.is_finite() || stretch_ratio <= 0.0 {
            return Err(TransformError::InvalidRequest(format!(
                "pitch shift of {} semitones is out of range",
                request.pitch_semitones
            )));
        }

        let start = Instant::now();
        debug!(
            "Transform: speed={} pitch={}st stretch_ratio={:.4} pitch_factor={:.4}",
            request.speed, request.pitch_semitones, stretch_ratio, pitch_factor
        );

        let stretched =
            tokio::task::spawn_blocking(move || stretch::time_stretch(buffer, stretch_ratio))
                .await
                .map_err(|e| TransformError::Render(e.to_string()))?;
        let shifted = self.resampler.resample(stretched, pitch_factor).await?;

        info!(
            "Transform complete: {} frames, {:.2}s audio in {:?}",
            shifted.frame_count(),
            shifted.duration_secs(),
            start.elapsed()
        );
        Ok(shifted)
    }

    /// Decode, transform, and encode in one awaitable unit of work
    pub async fn process_blob(
        &self,
        blob: &str,
        spec: AudioSpec,
        request: &TransformRequest,
    ) -> Result<Vec<u8>, TransformError> {
        let bytes = transport::decode_blob(blob)?;
        let buffer = pcm::interpret_pcm(&bytes, spec);
        let transformed = self.transform(buffer, request).await?;
        Ok(wav::encode_wav(&transformed))
    }
}

impl Default for EffectsEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a provider blob straight to a WAV file with no transformation.
///
/// Untransformed preview path: composes the transport decoder, the PCM
/// interpreter, and the container encoder.
pub fn blob_to_wav(blob: &str, spec: AudioSpec) -> Result<Vec<u8>, TransformError> {
    let bytes = transport::decode_blob(blob)?;
    let buffer = pcm::interpret_pcm(&bytes, spec);
    Ok(wav::encode_wav(&buffer))
}
