//! Frame delivery to the playback/transport layer.
//!
//! Synthesis invocations publish `SynthesizedAudio` events through a
//! `FrameEmitter`; consumers drain the matching receiver, optionally on a
//! dedicated thread via `spawn_sink`.

pub mod emitter;
pub mod sink;
pub mod types;

pub use emitter::{EventReceiver, FrameEmitter};
pub use sink::{CollectorSink, FrameSink, SinkHandle, WavFileSink, spawn_sink};
pub use types::{AudioFrame, Correlation, SynthesizedAudio};
