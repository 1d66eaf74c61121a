//! Configuration and CLI for the contralto pipeline

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command line arguments with subcommands
#[derive(Parser, Debug, Clone)]
#[command(name = "contralto")]
#[command(about = "Speed and pitch post-processing for TTS audio")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log: String,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Apply a speed/pitch transform to an encoded audio blob
    Transform(TransformArgs),
    /// Decode an encoded audio blob to WAV without transformation
    Preview(PreviewArgs),
}

/// Arguments for the transform command
#[derive(Args, Debug, Clone)]
pub struct TransformArgs {
    /// Base64 audio blob to transform
    #[arg(short, long, group = "source")]
    pub blob: Option<String>,

    /// File containing the base64 audio blob
    #[arg(short, long, group = "source")]
    pub input: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, default_value = "out.wav")]
    pub output: PathBuf,

    /// Speed multiplier (>1 is faster, duration shrinks)
    #[arg(short, long, default_value_t = 1.0)]
    pub speed: f32,

    /// Pitch shift in semitones (signed)
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub pitch: f32,

    /// Sample rate of the incoming PCM in Hz
    #[arg(long, default_value_t = 24000, value_parser = clap::value_parser!(u32).range(1..))]
    pub sample_rate: u32,

    /// Channel count of the incoming PCM
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub channels: u16,

    /// Print verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the preview command
#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    /// Base64 audio blob to decode
    #[arg(short, long, group = "source")]
    pub blob: Option<String>,

    /// File containing the base64 audio blob
    #[arg(short, long, group = "source")]
    pub input: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, default_value = "preview.wav")]
    pub output: PathBuf,

    /// Sample rate of the incoming PCM in Hz
    #[arg(long, default_value_t = 24000, value_parser = clap::value_parser!(u32).range(1..))]
    pub sample_rate: u32,

    /// Channel count of the incoming PCM
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub channels: u16,
}

/// PCM interpretation convention for incoming provider audio
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSpec {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}

impl Default for AudioSpec {
    fn default() -> Self {
        Self {
            sample_rate: 24000,
            channels: 1,
        }
    }
}

impl AudioSpec {
    /// Spec with an explicit rate and channel count
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }
}

/// Initialize tracing with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Load environment variables from .env file if present
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}
