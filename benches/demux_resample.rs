use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hifitts::audio::{convert, parse};
use std::hint::black_box;

/// One second of a 440 Hz tone as a 16-bit WAV container.
fn tone_wav(sample_rate: u32, channels: u16) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
    for i in 0..sample_rate {
        let t = i as f32 / sample_rate as f32;
        let s = ((t * 440.0 * std::f32::consts::TAU).sin() * 8000.0) as i16;
        for _ in 0..channels {
            writer.write_sample(s).unwrap();
        }
    }
    writer.finalize().unwrap();
    cursor.into_inner()
}

fn bench_demux(c: &mut Criterion) {
    let mut group = c.benchmark_group("demux");
    for (rate, channels) in [(24000, 1), (48000, 2)] {
        let bytes = tone_wav(rate, channels);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rate}hz_{channels}ch")),
            &bytes,
            |b, bytes| b.iter(|| parse(black_box(bytes)).unwrap()),
        );
    }
    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    let pcm = parse(&tone_wav(24000, 1)).unwrap();
    for (rate, channels) in [(24000, 1), (16000, 1), (48000, 1), (48000, 2)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("24k_mono_to_{rate}hz_{channels}ch")),
            &pcm,
            |b, pcm| b.iter(|| convert(black_box(pcm.clone()), rate, channels).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_demux, bench_convert);
criterion_main!(benches);
