//! Error types for hifitts.

use thiserror::Error;

/// Errors raised while demuxing a RIFF/WAVE container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DemuxError {
    #[error("Invalid container: {message}")]
    InvalidContainer { message: String },

    #[error("Unsupported audio format: {message}")]
    UnsupportedFormat { message: String },

    #[error("Unsupported bit depth: {bits} (only 16-bit PCM is supported)")]
    UnsupportedBitDepth { bits: u16 },

    #[error("Truncated PCM data: {message}")]
    TruncatedData { message: String },

    #[error("Format chunk not found in container")]
    MissingFormatChunk,

    #[error("Data chunk not found in container")]
    MissingDataChunk,
}

/// Errors raised while converting PCM to the pipeline format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Conversion produced no samples from {input_samples} input samples")]
    EmptyConversionResult { input_samples: usize },

    #[error("Unsupported conversion target: {sample_rate} Hz, {channels} channel(s)")]
    UnsupportedTarget { sample_rate: u32, channels: u16 },
}

/// Failure of one of the post-network stages for an utterance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error(transparent)]
    Demux(#[from] DemuxError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Errors surfaced to the caller of a synthesis invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("TTS provider error{}: {message}", status_suffix(.status))]
    Provider { status: Option<u16>, message: String },

    #[error("Failed to synthesize speech: {cause}")]
    Failed {
        #[source]
        cause: StageError,
    },

    #[error("Synthesis cancelled")]
    Cancelled,

    #[error("Frame consumer closed before the audio was delivered")]
    ConsumerClosed,

    #[error("Invalid synthesis option {key}: {message}")]
    InvalidOptions { key: String, message: String },
}

fn status_suffix<S: std::borrow::Borrow<Option<u16>>>(status: S) -> String {
    match status.borrow() {
        Some(code) => format!(" ({code})"),
        None => String::new(),
    }
}

impl From<DemuxError> for SynthesisError {
    fn from(e: DemuxError) -> Self {
        SynthesisError::Failed { cause: e.into() }
    }
}

impl From<ConvertError> for SynthesisError {
    fn from(e: ConvertError) -> Self {
        SynthesisError::Failed { cause: e.into() }
    }
}

impl SynthesisError {
    /// HTTP status reported by the provider, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SynthesisError::Provider { status, .. } => *status,
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum HifiError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("Audio output failed: {message}")]
    AudioOutput { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HifiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_provider_display_with_status() {
        let error = SynthesisError::Provider {
            status: Some(500),
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "TTS provider error (500): Internal Server Error"
        );
        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn test_provider_display_without_status() {
        let error = SynthesisError::Provider {
            status: None,
            message: "operation timed out".to_string(),
        };
        assert_eq!(error.to_string(), "TTS provider error: operation timed out");
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_demux_error_wraps_into_failed() {
        let error: SynthesisError = DemuxError::MissingDataChunk.into();
        assert_eq!(
            error,
            SynthesisError::Failed {
                cause: StageError::Demux(DemuxError::MissingDataChunk)
            }
        );
        assert_eq!(
            error.to_string(),
            "Failed to synthesize speech: Data chunk not found in container"
        );
    }

    #[test]
    fn test_convert_error_wraps_into_failed() {
        let error: SynthesisError = ConvertError::EmptyConversionResult { input_samples: 4 }.into();
        assert!(matches!(
            error,
            SynthesisError::Failed {
                cause: StageError::Convert(ConvertError::EmptyConversionResult { input_samples: 4 })
            }
        ));
    }

    #[test]
    fn test_failed_exposes_cause_as_source() {
        let error: SynthesisError = DemuxError::UnsupportedBitDepth { bits: 8 }.into();
        let source = error.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("Unsupported bit depth: 8 (only 16-bit PCM is supported)")
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = HifiError::ConfigInvalidValue {
            key: "output.channels".to_string(),
            message: "must be 1 or 2".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for output.channels: must be 1 or 2"
        );
    }

    #[test]
    fn test_consumer_closed_display() {
        assert_eq!(
            SynthesisError::ConsumerClosed.to_string(),
            "Frame consumer closed before the audio was delivered"
        );
        assert_eq!(SynthesisError::ConsumerClosed.status(), None);
    }

    #[test]
    fn test_from_synthesis_error_is_transparent() {
        let error: HifiError = SynthesisError::Cancelled.into();
        assert_eq!(error.to_string(), "Synthesis cancelled");
    }

    #[test]
    fn test_from_toml_error() {
        let toml_error = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let error: HifiError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<HifiError>();
        assert_sync::<HifiError>();
        assert_send::<SynthesisError>();
        assert_sync::<SynthesisError>();
    }
}
