//! Data types handed across the pipeline boundary.

use crate::audio::wav::PcmBuffer;
use std::sync::Arc;
use uuid::Uuid;

/// Canonical audio frame delivered to the playback/transport layer.
///
/// Samples are shared, so cloning a frame does not copy audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    /// Interleaved 16-bit PCM.
    pub samples: Arc<[i16]>,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples_per_channel: usize,
}

impl AudioFrame {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        let samples_per_channel = match channels {
            0 => 0,
            ch => samples.len() / ch as usize,
        };
        Self {
            samples: samples.into(),
            sample_rate,
            channels,
            samples_per_channel,
        }
    }

    /// Returns the duration of this frame in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples_per_channel as u64 * 1000 / self.sample_rate as u64
    }

    pub fn is_empty(&self) -> bool {
        self.samples_per_channel == 0
    }
}

impl From<PcmBuffer> for AudioFrame {
    fn from(pcm: PcmBuffer) -> Self {
        Self::new(pcm.samples, pcm.sample_rate, pcm.channels)
    }
}

/// Identifiers tying emitted frames back to the utterance that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Correlation {
    pub request_id: String,
    pub segment_id: String,
}

impl Correlation {
    /// Generate a never-reused pair of ids for a new invocation.
    pub fn fresh() -> Self {
        Self {
            request_id: short_id(),
            segment_id: short_id(),
        }
    }
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// One synthesized audio event, as published to the frame consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub request_id: String,
    pub segment_id: String,
    pub frame: AudioFrame,
    /// Text covered by this frame. Empty for continuation frames.
    pub delta_text: String,
    /// Last event for `request_id`.
    pub is_final: bool,
}
