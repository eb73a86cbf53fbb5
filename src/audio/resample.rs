//! Sample-rate and channel-layout conversion.
//!
//! Converts provider PCM to the rate and channel count the frame consumer
//! expects. Channels are remixed first, then every channel is resampled with
//! linear interpolation. The output is produced in a single pass, so there is
//! no filter tail to flush.

use crate::audio::wav::PcmBuffer;
use crate::error::ConvertError;

/// Convert `buffer` to `target_rate` Hz and `target_channels` channels.
///
/// Returns the input untouched when it already matches the target. The
/// output always covers the full input duration: `ceil(frames * to / from)`
/// frames per channel.
pub fn convert(
    buffer: PcmBuffer,
    target_rate: u32,
    target_channels: u16,
) -> Result<PcmBuffer, ConvertError> {
    if target_rate == 0 || !(1..=2).contains(&target_channels) {
        return Err(ConvertError::UnsupportedTarget {
            sample_rate: target_rate,
            channels: target_channels,
        });
    }

    if buffer.sample_rate == target_rate && buffer.channels == target_channels {
        return Ok(buffer);
    }

    let input_samples = buffer.samples.len();
    let remixed = if buffer.channels == target_channels {
        buffer.samples
    } else {
        remix(&buffer.samples, buffer.channels, target_channels)
    };
    let samples = resample(&remixed, target_channels, buffer.sample_rate, target_rate);

    if input_samples > 0 && samples.is_empty() {
        return Err(ConvertError::EmptyConversionResult { input_samples });
    }

    Ok(PcmBuffer::new(samples, target_rate, target_channels))
}

/// Number of output frames needed to cover `frames` input frames.
pub fn output_frames(frames: usize, from_rate: u32, to_rate: u32) -> usize {
    if from_rate == 0 {
        return 0;
    }
    let numerator = frames as u64 * to_rate as u64;
    numerator.div_ceil(from_rate as u64) as usize
}

/// Remix interleaved samples between channel layouts.
///
/// Downmixing averages all input channels; upmixing copies the mono
/// signal into every output channel.
fn remix(samples: &[i16], from: u16, to: u16) -> Vec<i16> {
    let from = from.max(1) as usize;
    let to = to as usize;

    samples
        .chunks_exact(from)
        .flat_map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            let mixed = (sum / from as i32) as i16;
            std::iter::repeat_n(mixed, to)
        })
        .collect()
}

/// Linear interpolation resampling of interleaved samples.
fn resample(samples: &[i16], channels: u16, from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ch = channels as usize;
    let in_frames = samples.len() / ch;
    if in_frames == 0 {
        return Vec::new();
    }

    let out_frames = output_frames(in_frames, from_rate, to_rate);
    let ratio = from_rate as f64 / to_rate as f64;
    let last = in_frames - 1;
    let mut out = Vec::with_capacity(out_frames * ch);

    for i in 0..out_frames {
        let source_pos = i as f64 * ratio;
        let idx = (source_pos.floor() as usize).min(last);
        let fraction = source_pos - idx as f64;
        let next = (idx + 1).min(last);

        for c in 0..ch {
            let left = samples[idx * ch + c] as f64;
            let right = samples[next * ch + c] as f64;
            let value = left + (right - left) * fraction;
            out.push(value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_when_format_matches() {
        let input = PcmBuffer::new(vec![1, -2, 3, -4, 5], 24000, 1);
        let output = convert(input.clone(), 24000, 1).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn identity_preserves_stereo_exactly() {
        let input = PcmBuffer::new(vec![i16::MIN, i16::MAX, 0, -1], 48000, 2);
        let output = convert(input.clone(), 48000, 2).unwrap();
        assert_eq!(output.samples, input.samples);
    }

    #[test]
    fn upsample_doubles_and_interpolates() {
        let input = PcmBuffer::new(vec![0, 1000, 2000], 8000, 1);
        let output = convert(input, 16000, 1).unwrap();

        assert_eq!(output.sample_rate, 16000);
        assert_eq!(output.samples, vec![0, 500, 1000, 1500, 2000, 2000]);
    }

    #[test]
    fn downsample_halves_sample_count() {
        let input = PcmBuffer::new(vec![0; 3200], 16000, 1);
        let output = convert(input, 8000, 1).unwrap();
        assert_eq!(output.samples.len(), 1600);
    }

    #[test]
    fn silence_24k_to_48k_stays_silent() {
        let input = PcmBuffer::new(vec![0; 4800], 24000, 1);
        let output = convert(input, 48000, 1).unwrap();

        assert_eq!(output.samples_per_channel(), 9600);
        assert!(output.samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn constant_signal_keeps_dc_level() {
        let input = PcmBuffer::new(vec![1000; 441], 44100, 1);
        let output = convert(input, 16000, 1).unwrap();

        assert!(output.samples.iter().all(|&s| s == 1000));
    }

    #[test]
    fn non_integer_ratio_never_drops_duration() {
        for (frames, from, to) in [
            (1usize, 24000u32, 16000u32),
            (7, 22050, 48000),
            (4801, 24000, 44100),
            (1000, 48000, 8000),
            (333, 16000, 24000),
        ] {
            let input = PcmBuffer::new(vec![5; frames], from, 1);
            let output = convert(input, to, 1).unwrap();
            let exact = frames as f64 * to as f64 / from as f64;
            let produced = output.samples_per_channel() as f64;
            assert!(
                produced >= exact && produced < exact + 1.0,
                "{frames} frames {from}->{to}: produced {produced}, exact {exact}"
            );
        }
    }

    #[test]
    fn stereo_to_mono_averages_channels() {
        let input = PcmBuffer::new(vec![100, 200, -300, 300, 500, 600], 24000, 2);
        let output = convert(input, 24000, 1).unwrap();

        assert_eq!(output.channels, 1);
        assert_eq!(output.samples, vec![150, 0, 550]);
    }

    #[test]
    fn mono_to_stereo_duplicates_channel() {
        let input = PcmBuffer::new(vec![1, 2, 3], 24000, 1);
        let output = convert(input, 24000, 2).unwrap();

        assert_eq!(output.channels, 2);
        assert_eq!(output.samples, vec![1, 1, 2, 2, 3, 3]);
        assert_eq!(output.samples_per_channel(), 3);
    }

    #[test]
    fn stereo_resample_keeps_channels_separate() {
        // Left ramps up, right stays negative.
        let input = PcmBuffer::new(vec![0, -100, 1000, -100], 8000, 2);
        let output = convert(input, 16000, 2).unwrap();

        assert_eq!(output.samples_per_channel(), 4);
        let left: Vec<i16> = output.samples.iter().step_by(2).copied().collect();
        let right: Vec<i16> = output.samples.iter().skip(1).step_by(2).copied().collect();
        assert_eq!(left, vec![0, 500, 1000, 1000]);
        assert!(right.iter().all(|&s| s == -100));
    }

    #[test]
    fn rate_and_layout_change_together() {
        let input = PcmBuffer::new(vec![200, 400, 200, 400], 24000, 2);
        let output = convert(input, 48000, 1).unwrap();

        assert_eq!(output.channels, 1);
        assert_eq!(output.sample_rate, 48000);
        assert_eq!(output.samples, vec![300, 300, 300, 300]);
    }

    #[test]
    fn empty_input_converts_to_empty_output() {
        let input = PcmBuffer::new(Vec::new(), 24000, 1);
        let output = convert(input, 48000, 1).unwrap();
        assert!(output.is_empty());
        assert_eq!(output.sample_rate, 48000);
    }

    #[test]
    fn single_sample_is_held() {
        let input = PcmBuffer::new(vec![100], 16000, 1);
        let output = convert(input, 8000, 1).unwrap();
        assert_eq!(output.samples, vec![100]);
    }

    #[test]
    fn conversion_is_deterministic() {
        let samples: Vec<i16> = (0..2000).map(|i| ((i * 37) % 2000 - 1000) as i16).collect();
        let a = convert(PcmBuffer::new(samples.clone(), 22050, 1), 24000, 1).unwrap();
        let b = convert(PcmBuffer::new(samples, 22050, 1), 24000, 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_target_is_rejected() {
        let input = PcmBuffer::new(vec![0; 10], 24000, 1);
        assert_eq!(
            convert(input.clone(), 0, 1),
            Err(ConvertError::UnsupportedTarget {
                sample_rate: 0,
                channels: 1
            })
        );
        assert!(matches!(
            convert(input, 24000, 3),
            Err(ConvertError::UnsupportedTarget { .. })
        ));
    }

    #[test]
    fn output_frames_rounds_up() {
        assert_eq!(output_frames(4800, 24000, 48000), 9600);
        assert_eq!(output_frames(1, 48000, 8000), 1);
        assert_eq!(output_frames(0, 24000, 48000), 0);
        assert_eq!(output_frames(7, 22050, 48000), 16);
    }
}
