pub mod config;
pub mod effects;
pub mod pcm;
pub mod resample;
pub mod stretch;
pub mod transport;
pub mod wav;

pub use config::{AudioSpec, Cli, Commands, PreviewArgs, TransformArgs};
pub use effects::{
    blob_to_wav, semitones_to_factor, EffectsEngine, TransformError, TransformRequest,
};
pub use pcm::{interpret_pcm, AudioBuffer};
pub use resample::{resample_buffer, LinearResampler, Resampler};
pub use stretch::time_stretch;
pub use transport::{decode_blob, DecodeError};
pub use wav::{encode_wav, WavSerializer};
