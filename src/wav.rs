//! WAV container encoding
//!
//! Serializes a float buffer into a RIFF/WAVE file: a fixed 44-byte header
//! followed by interleaved 16-bit little-endian PCM data.

use crate::pcm::AudioBuffer;

/// Fixed RIFF/fmt/data header length in bytes
pub const HEADER_LEN: usize = 44;

/// Byte serializer owning its output buffer and a write cursor.
///
/// The buffer is allocated at full length up front; every write copies into
/// place at the cursor and advances it. Multi-byte writes are little-endian.
#[derive(Debug)]
pub struct WavSerializer {
    bytes: Vec<u8>,
    cursor: usize,
}

impl WavSerializer {
    /// Serializer over a zeroed buffer of `len` bytes
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
            cursor: 0,
        }
    }

    /// Write a 4-byte ASCII chunk tag
    pub fn write_tag(&mut self, tag: &[u8; 4]) {
        self.bytes[self.cursor..self.cursor + 4].copy_from_slice(tag);
        self.cursor += 4;
    }

    /// Write a little-endian u16
    pub fn write_u16(&mut self, value: u16) {
        self.bytes[self.cursor..self.cursor + 2].copy_from_slice(&value.to_le_bytes());
        self.cursor += 2;
    }

    /// Write a little-endian u32
    pub fn write_u32(&mut self, value: u32) {
        self.bytes[self.cursor..self.cursor + 4].copy_from_slice(&value.to_le_bytes());
        self.cursor += 4;
    }

    /// Write a little-endian i16
    pub fn write_i16(&mut self, value: i16) {
        self.bytes[self.cursor..self.cursor + 2].copy_from_slice(&value.to_le_bytes());
        self.cursor += 2;
    }

    /// Bytes written so far
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Consume the serializer, returning the buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Encode `buffer` as a complete 16-bit integer PCM WAV file.
///
/// The output is `frame_count * num_channels * 2 + 44` bytes: the canonical
/// RIFF/WAVE/fmt/data header followed by samples interleaved channel-major
/// within each frame, mirroring the interpreter's de-interleave order.
pub fn encode_wav(buffer: &AudioBuffer) -> Vec<u8> {
    let channels = buffer.num_channels() as u32;
    let sample_rate = buffer.sample_rate();
    let frame_count = buffer.frame_count();
    let data_len = frame_count as u32 * channels * 2;
    let total_len = HEADER_LEN as u32 + data_len;

    let mut ser = WavSerializer::new(total_len as usize);
    ser.write_tag(b"RIFF");
    ser.write_u32(total_len - 8);
    ser.write_tag(b"WAVE");

    ser.write_tag(b"fmt ");
    ser.write_u32(16);
    ser.write_u16(1); // integer PCM
    ser.write_u16(channels as u16);
    ser.write_u32(sample_rate);
    ser.write_u32(sample_rate * 2 * channels); // byte rate
    ser.write_u16(channels as u16 * 2); // block align
    ser.write_u16(16); // bits per sample

    ser.write_tag(b"data");
    ser.write_u32(data_len);

    for frame in 0..frame_count {
        for channel in buffer.channels() {
            ser.write_i16(quantize(channel[frame]));
        }
    }

    ser.into_bytes()
}

/// Quantize a float sample to 16-bit PCM.
///
/// Clamps to [-1, 1], then scales negatives by 32768 and non-negatives by
/// 32767. The asymmetry mirrors the interpreter's `s / 32768.0` decode, so
/// decode-encode round trips reproduce the original integers.
fn quantize(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    let scaled = if s < 0.0 { s * 32768.0 } else { s * 32767.0 };
    scaled.round() as i16
}
