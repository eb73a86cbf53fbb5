use crate::audio::wav::PcmBuffer;
use crate::error::SynthesisError;
use crate::pipeline::emitter::FrameEmitter;
use crate::pipeline::types::{Correlation, SynthesizedAudio};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for text-to-speech backends.
///
/// The orchestrator holds a `dyn Synthesizer` so HTTP providers and local
/// engines are interchangeable.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text` and publish the resulting audio.
    ///
    /// # Returns
    /// The final (published) event, or an error. Nothing is published on
    /// error.
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SynthesisError>;

    /// Backend name for logging.
    fn label(&self) -> &str;

    /// Sample rate of emitted frames.
    fn sample_rate(&self) -> u32;

    /// Channel count of emitted frames.
    fn channels(&self) -> u16;

    /// Whether the backend accepts incremental text input.
    fn supports_streaming(&self) -> bool {
        false
    }
}

/// Implement Synthesizer for Arc<T> to allow sharing across sessions.
#[async_trait]
impl<T: Synthesizer + ?Sized> Synthesizer for Arc<T> {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SynthesisError> {
        (**self).synthesize(text).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }

    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn channels(&self) -> u16 {
        (**self).channels()
    }

    fn supports_streaming(&self) -> bool {
        (**self).supports_streaming()
    }
}

/// Mock synthesizer for testing.
///
/// Publishes a silent frame of fixed length for every request.
#[derive(Debug)]
pub struct MockSynthesizer {
    emitter: FrameEmitter,
    sample_rate: u32,
    channels: u16,
    samples_per_channel: usize,
    failure: Option<SynthesisError>,
    calls: AtomicUsize,
}

impl MockSynthesizer {
    /// 100ms of mono silence at 24kHz per request.
    pub fn new(emitter: FrameEmitter) -> Self {
        Self {
            emitter,
            sample_rate: 24000,
            channels: 1,
            samples_per_channel: 2400,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_format(mut self, sample_rate: u32, channels: u16) -> Self {
        self.sample_rate = sample_rate;
        self.channels = channels;
        self
    }

    pub fn with_samples_per_channel(mut self, samples_per_channel: usize) -> Self {
        self.samples_per_channel = samples_per_channel;
        self
    }

    /// Configure the mock to fail every request with `error`.
    pub fn with_failure(mut self, error: SynthesisError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Number of `synthesize` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let pcm = PcmBuffer::new(
            vec![0; self.samples_per_channel * self.channels as usize],
            self.sample_rate,
            self.channels,
        );
        let frame = self.emitter.emit(pcm);
        self.emitter.publish(frame, &Correlation::fresh(), text)
    }

    fn label(&self) -> &str {
        "mock"
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_publishes_silence() {
        let (emitter, rx) = FrameEmitter::channel();
        let synth = MockSynthesizer::new(emitter).with_format(48000, 2);

        let event = synth.synthesize("hello").await.unwrap();

        assert!(event.is_final);
        assert_eq!(event.delta_text, "hello");
        assert_eq!(event.frame.sample_rate, 48000);
        assert_eq!(event.frame.channels, 2);
        assert_eq!(event.frame.samples_per_channel, 2400);
        assert_eq!(rx.try_recv().unwrap(), event);
        assert_eq!(synth.calls(), 1);
    }

    #[tokio::test]
    async fn mock_failure_publishes_nothing() {
        let (emitter, rx) = FrameEmitter::channel();
        let synth = MockSynthesizer::new(emitter).with_failure(SynthesisError::Provider {
            status: Some(503),
            message: "Service Unavailable".to_string(),
        });

        let result = synth.synthesize("hello").await;

        assert_eq!(result.unwrap_err().status(), Some(503));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn trait_object_through_arc() {
        let (emitter, rx) = FrameEmitter::channel();
        let synth: Arc<dyn Synthesizer> =
            Arc::new(MockSynthesizer::new(emitter).with_samples_per_channel(10));

        let shared = Arc::clone(&synth);
        let event = shared.synthesize("via arc").await.unwrap();

        assert_eq!(shared.label(), "mock");
        assert!(!shared.supports_streaming());
        assert_eq!(event.frame.samples_per_channel, 10);
        assert_eq!(rx.len(), 1);
    }
}
