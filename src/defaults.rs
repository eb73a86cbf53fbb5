//! Default configuration constants for hifitts.
//!
//! Shared between the TOML config layer, the CLI and `SynthesisOptions`
//! so every entry point agrees on the same provider and output format.

/// Default synthesis endpoint (OpenAI-compatible `/v1/audio/speech`).
pub const ENDPOINT: &str = "https://api-hifi.8om.ai/v1/audio/speech";

/// Default synthesis model.
pub const MODEL: &str = "kokoro";

/// Default voice identifier.
pub const VOICE: &str = "af_heart";

/// Default speaking speed multiplier.
pub const SPEED: f32 = 1.0;

/// Default output volume multiplier.
pub const VOLUME_MULTIPLIER: f32 = 1.0;

/// Default pipeline sample rate in Hz.
///
/// Matches the native rate of the default model, so the common path needs
/// no resampling.
pub const SAMPLE_RATE: u32 = 24000;

/// Default pipeline channel count (mono).
pub const CHANNELS: u16 = 1;

/// Default whole-request timeout in seconds.
///
/// A stalled provider fails the utterance instead of blocking it.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// TCP/TLS connect timeout in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Container format requested from the provider.
pub const RESPONSE_FORMAT: &str = "wav";

/// Maximum number of provider error-body bytes kept in error messages.
pub const ERROR_BODY_LIMIT: usize = 512;
