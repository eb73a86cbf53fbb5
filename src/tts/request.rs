//! JSON request body for the synthesis provider.

use crate::defaults;
use crate::tts::options::SynthesisOptions;
use serde::Serialize;

/// Text-normalization flags sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizationOptions {
    pub normalize: bool,
    pub unit_normalization: bool,
    pub url_normalization: bool,
    pub email_normalization: bool,
    pub optional_pluralization_normalization: bool,
    pub phone_normalization: bool,
    pub replace_remaining_symbols: bool,
}

impl NormalizationOptions {
    /// The fixed normalization policy used for every utterance.
    pub const POLICY: Self = Self {
        normalize: true,
        unit_normalization: false,
        url_normalization: true,
        email_normalization: true,
        optional_pluralization_normalization: true,
        phone_normalization: true,
        replace_remaining_symbols: true,
    };
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        Self::POLICY
    }
}

/// One provider request. Borrowed from the adapter's options for the
/// duration of the exchange.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
    pub voice: &'a str,
    pub response_format: &'static str,
    pub download_format: &'static str,
    pub speed: f32,
    pub stream: bool,
    pub return_download_link: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang_code: Option<&'a str>,
    pub volume_multiplier: f32,
    pub normalization_options: NormalizationOptions,
}

impl<'a> SynthesisRequest<'a> {
    pub fn new(
        text: &'a str,
        options: &'a SynthesisOptions,
        normalization: NormalizationOptions,
    ) -> Self {
        Self {
            model: &options.model,
            input: text,
            voice: &options.voice,
            response_format: defaults::RESPONSE_FORMAT,
            download_format: defaults::RESPONSE_FORMAT,
            speed: options.speed,
            stream: false,
            return_download_link: false,
            lang_code: options.lang_code.as_deref(),
            volume_multiplier: options.volume_multiplier,
            normalization_options: normalization,
        }
    }
}
