//! Remote HTTP synthesis adapter.
//!
//! Sends one JSON request per utterance to an OpenAI-style
//! `/v1/audio/speech` endpoint, asks for an uncompressed WAV response and
//! turns it into a single pipeline frame:
//!
//! ```text
//! POST endpoint → wav::parse → resample::convert → FrameEmitter::publish
//! ```
//!
//! There is no retry and no caching. Failures before the response body is
//! available are `SynthesisError::Provider`; failures after it are
//! `SynthesisError::Failed`.

use crate::audio::{resample, wav};
use crate::defaults;
use crate::error::SynthesisError;
use crate::pipeline::emitter::FrameEmitter;
use crate::pipeline::types::{Correlation, SynthesizedAudio};
use crate::tts::options::SynthesisOptions;
use crate::tts::request::{NormalizationOptions, SynthesisRequest};
use crate::tts::synthesizer::Synthesizer;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct HttpSynthesizer {
    client: reqwest::Client,
    options: SynthesisOptions,
    normalization: NormalizationOptions,
    emitter: FrameEmitter,
}

impl HttpSynthesizer {
    /// Create an adapter with its own HTTP client.
    ///
    /// The client applies `options.request_timeout` to the whole exchange.
    pub fn new(options: SynthesisOptions, emitter: FrameEmitter) -> Result<Self, SynthesisError> {
        let client = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SynthesisError::InvalidOptions {
                key: "client".to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Self::with_client(options, emitter, client)
    }

    /// Create an adapter sharing an existing client (and its pool).
    ///
    /// `options.request_timeout` is applied to every request regardless of
    /// how `client` was built.
    pub fn with_client(
        options: SynthesisOptions,
        emitter: FrameEmitter,
        client: reqwest::Client,
    ) -> Result<Self, SynthesisError> {
        options.validate()?;
        Ok(Self {
            client,
            options,
            normalization: NormalizationOptions::POLICY,
            emitter,
        })
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// Like [`Synthesizer::synthesize`], but gives up as soon as `cancel`
    /// fires. A cancelled invocation never publishes.
    pub async fn synthesize_cancellable(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("synthesis cancelled before completion");
                Err(SynthesisError::Cancelled)
            }
            result = self.run(text) => result,
        }
    }

    async fn run(&self, text: &str) -> Result<SynthesizedAudio, SynthesisError> {
        let started = Instant::now();
        let body = self.fetch(text).await?;
        let event = self.process(text, &body)?;
        info!(
            request_id = %event.request_id,
            duration_ms = event.frame.duration_ms(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "synthesized utterance"
        );
        Ok(event)
    }

    /// Perform the HTTP exchange and return the response body.
    async fn fetch(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        let request = SynthesisRequest::new(text, &self.options, self.normalization);
        debug!(
            endpoint = %self.options.endpoint,
            model = %self.options.model,
            voice = %self.options.voice,
            chars = text.chars().count(),
            "sending synthesis request"
        );

        let response = self
            .client
            .post(&self.options.endpoint)
            .timeout(self.options.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(error = %e, "could not read provider error body");
                    String::new()
                }
            };
            let body = body.trim();
            let message = if body.is_empty() {
                reason.to_string()
            } else {
                format!("{reason}: {}", excerpt(body, defaults::ERROR_BODY_LIMIT))
            };
            warn!(status = status.as_u16(), %message, "synthesis provider returned an error");
            return Err(SynthesisError::Provider {
                status: Some(status.as_u16()),
                message,
            });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        debug!(bytes = bytes.len(), "received synthesis response");
        Ok(bytes.to_vec())
    }

    /// Demux, convert and publish one response body.
    fn process(&self, text: &str, body: &[u8]) -> Result<SynthesizedAudio, SynthesisError> {
        let pcm = wav::parse(body)?;
        debug!(
            sample_rate = pcm.sample_rate,
            channels = pcm.channels,
            samples_per_channel = pcm.samples_per_channel(),
            "decoded provider audio"
        );
        if pcm.sample_rate != self.options.sample_rate || pcm.channels != self.options.channels {
            debug!(
                from_rate = pcm.sample_rate,
                to_rate = self.options.sample_rate,
                from_channels = pcm.channels,
                to_channels = self.options.channels,
                "converting provider audio"
            );
        }
        let converted = resample::convert(pcm, self.options.sample_rate, self.options.channels)?;

        let frame = self.emitter.emit(converted);
        self.emitter.publish(frame, &Correlation::fresh(), text)
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SynthesisError> {
        self.run(text).await
    }

    fn label(&self) -> &str {
        "http"
    }

    fn sample_rate(&self) -> u32 {
        self.options.sample_rate
    }

    fn channels(&self) -> u16 {
        self.options.channels
    }
}

fn transport_error(e: reqwest::Error) -> SynthesisError {
    let message = if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    };
    warn!(%message, "synthesis request failed");
    SynthesisError::Provider {
        status: e.status().map(|s| s.as_u16()),
        message,
    }
}

/// First `limit` bytes of `s`, cut on a char boundary.
fn excerpt(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
