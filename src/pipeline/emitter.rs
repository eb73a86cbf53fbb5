//! Frame emission onto the consumer channel.
//!
//! The channel is an unbounded crossbeam channel: publishing never blocks and
//! any number of synthesis invocations may publish concurrently through
//! clones of the same emitter. Events for one request are sent in the order
//! they were produced.

use crate::audio::wav::PcmBuffer;
use crate::error::SynthesisError;
use crate::pipeline::types::{AudioFrame, Correlation, SynthesizedAudio};
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

/// Receiving end of the emitter channel.
pub type EventReceiver = Receiver<SynthesizedAudio>;

#[derive(Debug, Clone)]
pub struct FrameEmitter {
    tx: Sender<SynthesizedAudio>,
}

impl FrameEmitter {
    pub fn new(tx: Sender<SynthesizedAudio>) -> Self {
        Self { tx }
    }

    /// Create an emitter together with the receiver its events arrive on.
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }

    /// Wrap converted PCM as a pipeline frame.
    pub fn emit(&self, pcm: PcmBuffer) -> AudioFrame {
        AudioFrame::from(pcm)
    }

    /// Publish the only frame of a request. The event is marked final.
    ///
    /// Fails with [`SynthesisError::ConsumerClosed`] when the receiver is gone.
    pub fn publish(
        &self,
        frame: AudioFrame,
        correlation: &Correlation,
        delta_text: &str,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        let event = SynthesizedAudio {
            request_id: correlation.request_id.clone(),
            segment_id: correlation.segment_id.clone(),
            frame,
            delta_text: delta_text.to_string(),
            is_final: true,
        };
        self.send(&event)?;
        Ok(event)
    }

    /// Publish several frames of one request in order.
    ///
    /// The delta text rides on the first event and only the last event is
    /// final. An empty sequence publishes nothing. Publishing stops at the
    /// first frame the consumer can no longer receive.
    pub fn publish_sequence(
        &self,
        frames: impl IntoIterator<Item = AudioFrame>,
        correlation: &Correlation,
        delta_text: &str,
    ) -> Result<Vec<SynthesizedAudio>, SynthesisError> {
        let frames: Vec<AudioFrame> = frames.into_iter().collect();
        let last = frames.len().saturating_sub(1);

        frames
            .into_iter()
            .enumerate()
            .map(|(i, frame)| {
                let event = SynthesizedAudio {
                    request_id: correlation.request_id.clone(),
                    segment_id: correlation.segment_id.clone(),
                    frame,
                    delta_text: if i == 0 {
                        delta_text.to_string()
                    } else {
                        String::new()
                    },
                    is_final: i == last,
                };
                self.send(&event)?;
                Ok(event)
            })
            .collect()
    }

    fn send(&self, event: &SynthesizedAudio) -> Result<(), SynthesisError> {
        match self.tx.send(event.clone()) {
            Ok(()) => {
                debug!(
                    request_id = %event.request_id,
                    samples_per_channel = event.frame.samples_per_channel,
                    is_final = event.is_final,
                    "published audio frame"
                );
                Ok(())
            }
            Err(_) => {
                warn!(
                    request_id = %event.request_id,
                    "frame consumer disconnected, event dropped"
                );
                Err(SynthesisError::ConsumerClosed)
            }
        }
    }
}
