//! Pipeline integration tests.
//!
//! Exercise the library surface end to end: decode/encode round trips,
//! stretch identity and duration scaling, speed/pitch decoupling, and the
//! container layout.

mod common;

use common::{audio_validation, pcm_bytes, sine_buffer, sine_pcm};

use contralto::{
    encode_wav, interpret_pcm, time_stretch, AudioSpec, EffectsEngine, TransformRequest,
};

fn wav_data_as_i16(wav: &[u8]) -> Vec<i16> {
    wav[44..]
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect()
}

#[test]
fn test_decode_encode_round_trip_is_exact() {
    // Negative samples round-trip exactly at any magnitude; positive ones up
    // to half scale
    let original: Vec<i16> = vec![-32768, -20000, -16385, -1000, -1, 0, 1, 441, 12000, 16384];
    let buffer = interpret_pcm(&pcm_bytes(&original), AudioSpec::default());
    let wav = encode_wav(&buffer);
    assert_eq!(wav_data_as_i16(&wav), original);
}

#[test]
fn test_round_trip_preserves_sine_tone() {
    let original = sine_pcm(440.0, 2400, 24000);
    let buffer = interpret_pcm(&pcm_bytes(&original), AudioSpec::default());
    let wav = encode_wav(&buffer);
    assert_eq!(wav_data_as_i16(&wav), original);
}

#[test]
fn test_round_trip_preserves_stereo_interleave() {
    let original: Vec<i16> = vec![-100, 100, -200, 200, -300, 300];
    let spec = AudioSpec::new(24000, 2);
    let buffer = interpret_pcm(&pcm_bytes(&original), spec);
    let wav = encode_wav(&buffer);
    assert_eq!(wav_data_as_i16(&wav), original);
}

#[test]
fn test_stretch_identity_returns_same_samples() {
    let buffer = sine_buffer(440.0, 8192, 24000);
    let stretched = time_stretch(buffer.clone(), 1.0);
    assert_eq!(stretched, buffer);
}

#[test]
fn test_stretch_duration_scaling_law() {
    for ratio in [0.5f32, 0.75, 1.5, 2.0, 3.0] {
        let buffer = sine_buffer(220.0, 24000, 24000);
        let stretched = time_stretch(buffer, ratio);
        let expected = (24000.0_f64 / ratio as f64).floor() as usize;
        assert_eq!(stretched.frame_count(), expected, "ratio {}", ratio);
    }
}

#[test]
fn test_stretch_preserves_pitch() {
    // 187.5 Hz puts successive grains exactly in phase at the fixed hop, so
    // the stretched interior is a clean sinusoid at the original frequency
    let buffer = sine_buffer(187.5, 24000, 24000);
    let stretched = time_stretch(buffer, 2.0);
    assert_eq!(stretched.frame_count(), 12000);

    let crossings = stretched
        .channel(0)
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    // Half a second of 187.5 Hz is ~187 zero crossings
    assert!(
        (180..=195).contains(&crossings),
        "zero crossings changed: {}",
        crossings
    );

    let interior = &stretched.channel(0)[1024..11000];
    let peak = audio_validation::peak(interior);
    assert!((peak - 0.5).abs() < 0.05, "interior peak drifted: {}", peak);
}

#[tokio::test]
async fn test_speed_and_pitch_are_decoupled() {
    let engine = EffectsEngine::new();
    let frames = 24000;
    let cases = [
        (0.5f32, 0.0f32),
        (0.5, 7.0),
        (1.0, -12.0),
        (1.5, 3.0),
        (2.0, -5.0),
        (2.0, 12.0),
    ];
    for (speed, pitch) in cases {
        let buffer = sine_buffer(330.0, frames, 24000);
        let request = TransformRequest::new().with_speed(speed).with_pitch(pitch);
        let out = engine.transform(buffer, &request).await.unwrap();
        let expected = frames as f32 / speed;
        let drift = (out.frame_count() as f32 - expected).abs() / expected;
        assert!(
            drift < 0.01,
            "speed {} pitch {}: duration drifted {:.3}%",
            speed,
            pitch,
            drift * 100.0
        );
    }
}

#[tokio::test]
async fn test_transform_output_stays_in_range() {
    let engine = EffectsEngine::new();
    let buffer = sine_buffer(440.0, 24000, 24000);
    let request = TransformRequest::new().with_speed(0.8).with_pitch(4.0);
    let out = engine.transform(buffer, &request).await.unwrap();
    audio_validation::validate_audio(out.channel(0));
}

#[tokio::test]
async fn test_zero_length_input_survives_transform() {
    let engine = EffectsEngine::new();
    let buffer = interpret_pcm(&[], AudioSpec::default());
    assert_eq!(buffer.frame_count(), 0);

    let request = TransformRequest::new().with_speed(2.0);
    let out = engine.transform(buffer, &request).await.unwrap();
    assert!(out.frame_count() >= 1);
}

#[test]
fn test_encoded_size_matches_frame_count() {
    let buffer = sine_buffer(100.0, 1234, 24000);
    let wav = encode_wav(&buffer);
    assert_eq!(wav.len(), 1234 * 2 + 44);
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
}

#[test]
fn test_clamping_hot_signal_matches_full_scale() {
    // Hand-build buffers holding out-of-range samples
    let over = contralto::AudioBuffer::new(vec![vec![1.5, -2.0]], 24000);
    let unit = contralto::AudioBuffer::new(vec![vec![1.0, -1.0]], 24000);
    assert_eq!(&encode_wav(&over)[44..], &encode_wav(&unit)[44..]);
    assert_eq!(wav_data_as_i16(&encode_wav(&over)), vec![32767, -32768]);
}

#[tokio::test]
async fn test_concurrent_transforms_share_nothing() {
    let engine = EffectsEngine::new();
    let buffer = sine_buffer(220.0, 24000, 24000);

    let mut handles = Vec::new();
    for speed in [0.5f32, 1.0, 2.0, 3.0] {
        let engine = engine.clone();
        let buffer = buffer.clone();
        handles.push(tokio::spawn(async move {
            let request = TransformRequest::new().with_speed(speed);
            let out = engine.transform(buffer, &request).await.unwrap();
            (speed, out.frame_count())
        }));
    }

    for handle in handles {
        let (speed, frames) = handle.await.unwrap();
        let expected = (24000.0_f64 / speed as f64).floor() as usize;
        assert_eq!(frames, expected, "speed {}", speed);
    }
}
