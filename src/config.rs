use crate::defaults;
use crate::error::{HifiError, Result};
use crate::tts::options::SynthesisOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub output: OutputConfig,
}

/// Synthesis provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub model: String,
    pub voice: String,
    pub speed: f32,
    pub volume_multiplier: f32,
    pub lang_code: Option<String>,
    pub timeout_secs: u64,
}

/// Frame format required by the playback/transport layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::ENDPOINT.to_string(),
            model: defaults::MODEL.to_string(),
            voice: defaults::VOICE.to_string(),
            speed: defaults::SPEED,
            volume_multiplier: defaults::VOLUME_MULTIPLIER,
            lang_code: None,
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            channels: defaults::CHANNELS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Invalid TOML or unreadable files are still errors.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e)
                if e.downcast_ref::<std::io::Error>()
                    .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound) =>
            {
                Ok(Self::default())
            }
            Err(e) => Err(e.context(format!("Failed to load config from {}", path.display()))),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - HIFITTS_ENDPOINT → provider.endpoint
    /// - HIFITTS_MODEL → provider.model
    /// - HIFITTS_VOICE → provider.voice
    /// - HIFITTS_LANG → provider.lang_code
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("HIFITTS_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.provider.endpoint = endpoint;
        }

        if let Ok(model) = std::env::var("HIFITTS_MODEL")
            && !model.is_empty()
        {
            self.provider.model = model;
        }

        if let Ok(voice) = std::env::var("HIFITTS_VOICE")
            && !voice.is_empty()
        {
            self.provider.voice = voice;
        }

        if let Ok(lang) = std::env::var("HIFITTS_LANG")
            && !lang.is_empty()
        {
            self.provider.lang_code = Some(lang);
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/hifitts/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("hifitts")
            .join("config.toml")
    }

    /// Build validated adapter options from this configuration.
    pub fn to_options(&self) -> Result<SynthesisOptions> {
        let options = SynthesisOptions {
            endpoint: self.provider.endpoint.clone(),
            model: self.provider.model.clone(),
            voice: self.provider.voice.clone(),
            speed: self.provider.speed,
            volume_multiplier: self.provider.volume_multiplier,
            lang_code: self.provider.lang_code.clone().filter(|l| !l.is_empty()),
            sample_rate: self.output.sample_rate,
            channels: self.output.channels,
            request_timeout: Duration::from_secs(self.provider.timeout_secs),
        };
        options.validate().map_err(|e| match e {
            crate::error::SynthesisError::InvalidOptions { key, message } => {
                HifiError::ConfigInvalidValue {
                    key: config_key(&key).to_string(),
                    message,
                }
            }
            other => other.into(),
        })?;
        Ok(options)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| HifiError::Other(e.to_string()))
    }
}

/// Map an option field name to its dotted config key.
fn config_key(option: &str) -> &str {
    match option {
        "endpoint" => "provider.endpoint",
        "model" => "provider.model",
        "voice" => "provider.voice",
        "speed" => "provider.speed",
        "volume_multiplier" => "provider.volume_multiplier",
        "request_timeout" => "provider.timeout_secs",
        "sample_rate" => "output.sample_rate",
        "channels" => "output.channels",
        other => other,
    }
}
