//! Construction-time options for a synthesis adapter.

use crate::defaults;
use crate::error::SynthesisError;
use std::time::Duration;

/// Provider and output settings, fixed for the lifetime of an adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOptions {
    pub endpoint: String,
    pub model: String,
    pub voice: String,
    /// Speaking speed multiplier, must be > 0.
    pub speed: f32,
    /// Output volume multiplier, must be >= 0.
    pub volume_multiplier: f32,
    /// Optional language hint forwarded to the provider.
    pub lang_code: Option<String>,
    /// Sample rate the frame consumer requires.
    pub sample_rate: u32,
    /// Channel count the frame consumer requires (1 or 2).
    pub channels: u16,
    pub request_timeout: Duration,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            endpoint: defaults::ENDPOINT.to_string(),
            model: defaults::MODEL.to_string(),
            voice: defaults::VOICE.to_string(),
            speed: defaults::SPEED,
            volume_multiplier: defaults::VOLUME_MULTIPLIER,
            lang_code: None,
            sample_rate: defaults::SAMPLE_RATE,
            channels: defaults::CHANNELS,
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        }
    }
}

impl SynthesisOptions {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_voice(mut self, voice: &str) -> Self {
        self.voice = voice.to_string();
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_volume_multiplier(mut self, volume_multiplier: f32) -> Self {
        self.volume_multiplier = volume_multiplier;
        self
    }

    pub fn with_lang_code(mut self, lang_code: &str) -> Self {
        self.lang_code = Some(lang_code.to_string());
        self
    }

    /// Set the rate and channel count frames are delivered in.
    pub fn with_output_format(mut self, sample_rate: u32, channels: u16) -> Self {
        self.sample_rate = sample_rate;
        self.channels = channels;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), SynthesisError> {
        let invalid = |key: &str, message: String| -> Result<(), SynthesisError> {
            Err(SynthesisError::InvalidOptions {
                key: key.to_string(),
                message,
            })
        };

        match reqwest::Url::parse(&self.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return invalid("endpoint", format!("unsupported scheme '{}'", url.scheme()));
            }
            Err(e) => return invalid("endpoint", format!("'{}': {e}", self.endpoint)),
        }
        if self.model.trim().is_empty() {
            return invalid("model", "must not be empty".to_string());
        }
        if self.voice.trim().is_empty() {
            return invalid("voice", "must not be empty".to_string());
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return invalid("speed", format!("{} must be greater than 0", self.speed));
        }
        if !(self.volume_multiplier.is_finite() && self.volume_multiplier >= 0.0) {
            return invalid(
                "volume_multiplier",
                format!("{} must be 0 or greater", self.volume_multiplier),
            );
        }
        if self.sample_rate == 0 {
            return invalid("sample_rate", "must be greater than 0".to_string());
        }
        if !(1..=2).contains(&self.channels) {
            return invalid("channels", format!("{} must be 1 or 2", self.channels));
        }
        if self.request_timeout.is_zero() {
            return invalid("request_timeout", "must be greater than 0".to_string());
        }
        Ok(())
    }
}
