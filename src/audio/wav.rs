//! RIFF/WAVE container demuxing.
//!
//! Extracts 16-bit linear PCM from the container returned by the synthesis
//! provider. Only the `fmt ` and `data` chunks are interpreted; every other
//! chunk is skipped, honouring the RIFF rule that chunk bodies are padded to
//! an even length.

use crate::error::DemuxError;
use tracing::debug;

const RIFF_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
const FMT_MIN_LEN: usize = 16;
const FORMAT_PCM: u16 = 1;
const SUPPORTED_BITS: u16 = 16;

/// Interleaved 16-bit PCM with its sample rate and channel layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    /// Interleaved samples, `samples_per_channel * channels` long.
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl PcmBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Number of sample frames (samples per channel).
    pub fn samples_per_channel(&self) -> usize {
        match self.channels {
            0 => 0,
            ch => self.samples.len() / ch as usize,
        }
    }

    /// Playback duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples_per_channel() as u64 * 1000 / self.sample_rate as u64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct FormatChunk {
    channels: u16,
    sample_rate: u32,
}

#[derive(Debug, Clone, Copy)]
struct DataChunk<'a> {
    bytes: &'a [u8],
    /// The declared length was larger than the input.
    overdeclared: bool,
}

/// Parse a RIFF/WAVE container into a [`PcmBuffer`].
///
/// A `data` chunk that appears before `fmt ` is remembered and decoded once
/// the format is known, so both chunk orders are accepted.
pub fn parse(bytes: &[u8]) -> Result<PcmBuffer, DemuxError> {
    if bytes.len() < RIFF_HEADER_LEN {
        return Err(DemuxError::InvalidContainer {
            message: format!(
                "{} bytes is shorter than the {RIFF_HEADER_LEN}-byte RIFF header",
                bytes.len()
            ),
        });
    }
    if &bytes[0..4] != b"RIFF" {
        return Err(DemuxError::InvalidContainer {
            message: "missing RIFF header".to_string(),
        });
    }
    if &bytes[8..12] != b"WAVE" {
        return Err(DemuxError::InvalidContainer {
            message: "missing WAVE format".to_string(),
        });
    }

    let mut format: Option<FormatChunk> = None;
    let mut data: Option<DataChunk> = None;
    let mut offset = RIFF_HEADER_LEN;

    // A trailing fragment shorter than a chunk header is ignored.
    while offset
        .checked_add(CHUNK_HEADER_LEN)
        .is_some_and(|end| end <= bytes.len())
    {
        let tag = &bytes[offset..offset + 4];
        let len = read_u32(bytes, offset + 4) as usize;
        let body_start = offset + CHUNK_HEADER_LEN;
        let available = bytes.len() - body_start;

        match tag {
            b"fmt " => {
                if len > available {
                    return Err(DemuxError::InvalidContainer {
                        message: format!(
                            "fmt chunk declares {len} bytes but only {available} remain"
                        ),
                    });
                }
                format = Some(parse_format(&bytes[body_start..body_start + len])?);
            }
            b"data" => {
                // Streaming writers leave a placeholder length (often
                // 0xFFFFFFFF); take whatever is actually present.
                let overdeclared = len > available;
                if overdeclared {
                    debug!(declared = len, available, "data chunk runs past end of input");
                }
                data = Some(DataChunk {
                    bytes: &bytes[body_start..body_start + len.min(available)],
                    overdeclared,
                });
            }
            _ => {}
        }

        if format.is_some() && data.is_some() {
            break;
        }

        offset = body_start.saturating_add(len).saturating_add(len & 1);
    }

    let format = format.ok_or(DemuxError::MissingFormatChunk)?;
    let data = data.ok_or(DemuxError::MissingDataChunk)?;
    decode_samples(data, format)
}

fn parse_format(payload: &[u8]) -> Result<FormatChunk, DemuxError> {
    if payload.len() < FMT_MIN_LEN {
        return Err(DemuxError::InvalidContainer {
            message: format!(
                "fmt chunk is {} bytes, expected at least {FMT_MIN_LEN}",
                payload.len()
            ),
        });
    }

    let audio_format = read_u16(payload, 0);
    let channels = read_u16(payload, 2);
    let sample_rate = read_u32(payload, 4);
    let bits_per_sample = read_u16(payload, 14);

    if audio_format != FORMAT_PCM {
        return Err(DemuxError::UnsupportedFormat {
            message: format!("format code {audio_format:#06x}, only linear PCM is supported"),
        });
    }
    if bits_per_sample != SUPPORTED_BITS {
        return Err(DemuxError::UnsupportedBitDepth {
            bits: bits_per_sample,
        });
    }
    if !(1..=2).contains(&channels) {
        return Err(DemuxError::UnsupportedFormat {
            message: format!("{channels} channels, only mono and stereo are supported"),
        });
    }
    if sample_rate == 0 {
        return Err(DemuxError::UnsupportedFormat {
            message: "sample rate of 0 Hz".to_string(),
        });
    }

    Ok(FormatChunk {
        channels,
        sample_rate,
    })
}

fn decode_samples(data: DataChunk<'_>, format: FormatChunk) -> Result<PcmBuffer, DemuxError> {
    let data = if data.overdeclared {
        // Drop a trailing partial frame left by the cut.
        let frame_len = 2 * format.channels as usize;
        &data.bytes[..data.bytes.len() - data.bytes.len() % frame_len]
    } else {
        data.bytes
    };

    if data.len() % 2 != 0 {
        return Err(DemuxError::TruncatedData {
            message: format!("{} bytes is not a whole number of 16-bit samples", data.len()),
        });
    }

    let sample_count = data.len() / 2;
    if sample_count % format.channels as usize != 0 {
        return Err(DemuxError::TruncatedData {
            message: format!(
                "{sample_count} samples do not divide into {} channels",
                format.channels
            ),
        });
    }

    let samples = data
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    Ok(PcmBuffer::new(samples, format.sample_rate, format.channels))
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
