//! Frame consumers on the receiving side of the emitter channel.

use crate::error::{HifiError, Result};
use crate::pipeline::emitter::EventReceiver;
use crate::pipeline::types::SynthesizedAudio;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Pluggable consumer for synthesized audio events.
pub trait FrameSink: Send + 'static {
    /// Handle one event. Called in arrival order.
    fn handle(&mut self, event: &SynthesizedAudio) -> Result<()>;

    /// Called once the channel has closed.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Collects every event it receives. Useful for tests and batch callers.
#[derive(Debug, Default)]
pub struct CollectorSink {
    collected: Vec<SynthesizedAudio>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SynthesizedAudio] {
        &self.collected
    }

    pub fn into_events(self) -> Vec<SynthesizedAudio> {
        self.collected
    }
}

impl FrameSink for CollectorSink {
    fn handle(&mut self, event: &SynthesizedAudio) -> Result<()> {
        self.collected.push(event.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Writes every frame into a single WAV file.
///
/// The file format is fixed by the first frame; later frames with a
/// different rate or channel count are rejected.
pub struct WavFileSink {
    path: PathBuf,
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    spec: Option<hound::WavSpec>,
}

impl WavFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            spec: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn wav_error(e: hound::Error) -> HifiError {
    HifiError::AudioOutput {
        message: e.to_string(),
    }
}

impl FrameSink for WavFileSink {
    fn handle(&mut self, event: &SynthesizedAudio) -> Result<()> {
        let frame = &event.frame;
        let spec = hound::WavSpec {
            channels: frame.channels,
            sample_rate: frame.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        match self.spec {
            Some(existing) if existing != spec => {
                return Err(HifiError::AudioOutput {
                    message: format!(
                        "frame format changed from {} Hz/{} ch to {} Hz/{} ch",
                        existing.sample_rate, existing.channels, spec.sample_rate, spec.channels
                    ),
                });
            }
            Some(_) => {}
            None => {
                self.writer = Some(hound::WavWriter::create(&self.path, spec).map_err(wav_error)?);
                self.spec = Some(spec);
            }
        }

        if let Some(writer) = self.writer.as_mut() {
            for &s in frame.samples.iter() {
                writer.write_sample(s).map_err(wav_error)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(writer) => writer.finalize().map_err(wav_error),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "wav-file"
    }
}

/// Handle to a sink running on its own thread.
pub struct SinkHandle<S: FrameSink> {
    handle: JoinHandle<(S, Result<usize>)>,
    name: &'static str,
}

impl<S: FrameSink> SinkHandle<S> {
    /// Wait for the sink to drain the channel.
    ///
    /// Returns the sink and the number of events it handled, or the first
    /// error it hit.
    pub fn join(self) -> Result<(S, usize)> {
        let (sink, outcome) = self
            .handle
            .join()
            .map_err(|_| HifiError::Other(format!("Sink '{}' thread panicked", self.name)))?;
        outcome.map(|count| (sink, count))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Run `sink` on a dedicated thread until every sender has disconnected.
///
/// A sink error stops consumption; the error is returned from
/// [`SinkHandle::join`].
pub fn spawn_sink<S: FrameSink>(rx: EventReceiver, mut sink: S) -> SinkHandle<S> {
    let name = sink.name();
    let handle = thread::spawn(move || {
        let outcome = drain(&rx, &mut sink);
        (sink, outcome)
    });
    SinkHandle { handle, name }
}

fn drain<S: FrameSink>(rx: &EventReceiver, sink: &mut S) -> Result<usize> {
    let mut count = 0;
    while let Ok(event) = rx.recv() {
        if let Err(e) = sink.handle(&event) {
            warn!(sink = sink.name(), error = %e, "sink failed");
            return Err(e);
        }
        count += 1;
    }
    sink.finish()?;
    debug!(sink = sink.name(), events = count, "sink drained");
    Ok(count)
}
