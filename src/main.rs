//! contralto - Speed and pitch post-processing for TTS audio
//!
//! A single binary providing:
//! - `transform` - Apply a speed/pitch transform to an encoded audio blob
//! - `preview` - Decode an encoded audio blob to WAV without transformation
//!
//! Usage:
//!   contralto transform --input blob.txt --speed 1.25 --pitch -2 --output fast.wav
//!   contralto transform --blob "UklGRi..." --speed 0.8
//!   contralto preview --input blob.txt --output raw.wav

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::{info, warn};

use contralto::{
    config::{init_tracing, load_dotenv, Cli, Commands, PreviewArgs, TransformArgs},
    effects::{blob_to_wav, EffectsEngine, TransformRequest},
    wav::HEADER_LEN,
    AudioSpec,
};

/// Main entry point with subcommand dispatch
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    load_dotenv();

    let cli = Cli::parse();
    init_tracing(&cli.log);

    match cli.command {
        Commands::Transform(args) => run_transform(args).await,
        Commands::Preview(args) => run_preview(args).await,
    }
}

/// Read the encoded blob from an inline argument or a file
async fn read_blob(
    blob: Option<String>,
    input: Option<PathBuf>,
) -> Result<String, Box<dyn std::error::Error>> {
    match (blob, input) {
        (Some(blob), _) => Ok(blob),
        (None, Some(path)) => Ok(tokio::fs::read_to_string(path).await?),
        (None, None) => Err("no input provided: use --blob or --input".into()),
    }
}

/// Run the transform command
async fn run_transform(args: TransformArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    let blob = read_blob(args.blob, args.input).await?;
    let spec = AudioSpec::new(args.sample_rate, args.channels);

    if !(0.25..=4.0).contains(&args.speed) {
        warn!(
            "Speed {} is outside the usual 0.25-4.0 range; output duration may be extreme",
            args.speed
        );
    }

    let bytes = contralto::decode_blob(&blob)?;
    let buffer = contralto::interpret_pcm(&bytes, spec);
    info!(
        "Decoded {} frames at {} Hz ({} channel(s))",
        buffer.frame_count(),
        spec.sample_rate,
        spec.channels
    );

    let request = TransformRequest::new()
        .with_speed(args.speed)
        .with_pitch(args.pitch);
    let engine = EffectsEngine::new();
    let transformed = engine.transform(buffer, &request).await?;

    if args.verbose {
        let samples = transformed.channel(0);
        let rms =
            (samples.iter().map(|&x| x * x).sum::<f32>() / samples.len().max(1) as f32).sqrt();
        let peak = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);
        println!("Audio stats: RMS={:.4}, Peak={:.4}", rms, peak);
        println!("Saving to {:?}...", args.output);
    }

    let wav = contralto::encode_wav(&transformed);
    tokio::fs::write(&args.output, &wav).await?;

    println!(
        "✓ Transformed: {:?} ({} frames, {:.2}s audio, {:.2}s elapsed)",
        args.output,
        transformed.frame_count(),
        transformed.duration_secs(),
        start.elapsed().as_secs_f32()
    );

    Ok(())
}

/// Run the preview command
async fn run_preview(args: PreviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    let blob = read_blob(args.blob, args.input).await?;
    let spec = AudioSpec::new(args.sample_rate, args.channels);

    let wav = blob_to_wav(&blob, spec)?;
    let frames = (wav.len() - HEADER_LEN) / (2 * spec.channels as usize);
    tokio::fs::write(&args.output, &wav).await?;

    println!(
        "✓ Previewed: {:?} ({} frames, {:.2}s audio, {:.2}s elapsed)",
        args.output,
        frames,
        frames as f32 / spec.sample_rate as f32,
        start.elapsed().as_secs_f32()
    );

    Ok(())
}
