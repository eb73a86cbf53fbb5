//! hifitts - speech synthesis adapter for real-time voice pipelines
//!
//! Sends text to an HTTP TTS provider, demuxes the WAV response, converts it
//! to the pipeline's frame format and publishes it on an ordered channel.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod pipeline;
pub mod tts;

// Core trait (text → frames)
pub use tts::synthesizer::{MockSynthesizer, Synthesizer};

// Adapter
pub use tts::http::HttpSynthesizer;
pub use tts::options::SynthesisOptions;

// Pipeline
pub use pipeline::emitter::{EventReceiver, FrameEmitter};
pub use pipeline::sink::{CollectorSink, FrameSink, SinkHandle, WavFileSink, spawn_sink};
pub use pipeline::types::{AudioFrame, Correlation, SynthesizedAudio};

// Audio stages
pub use audio::wav::PcmBuffer;

// Error handling
pub use error::{ConvertError, DemuxError, HifiError, Result, StageError, SynthesisError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
