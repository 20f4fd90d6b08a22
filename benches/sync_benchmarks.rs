use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pm1006_exporter::{
    metrics::{AtomicGauges, PrometheusSink},
    sensor::{DecoderConfig, Frame, FrameDecoder, FrameSynchronizer},
};
use std::sync::Arc;

const VALID_FRAME: [u8; 20] = [
    0x16, 0x11, 0x0B, 0x00, 0x00, 0x01, 0x2C, 0x00, 0x00, 0x00, 0x64, 0x00, 0x00, 0x00, 0x32, 0x00,
    0x00, 0x00, 0x00, 0x0B,
];

/// Build a stream of frames separated by a few bytes of line noise
fn noisy_stream(frames: usize) -> Vec<u8> {
    let mut stream = Vec::with_capacity(frames * 24);
    for i in 0..frames {
        stream.extend_from_slice(&[0xAA, (i % 0x10) as u8, 0x11, 0x0B]);
        stream.extend_from_slice(&VALID_FRAME);
    }
    stream
}

/// Benchmark resynchronization over streams of different lengths
fn bench_synchronizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("synchronizer");

    for frames in [1usize, 64, 1024].iter() {
        let stream = noisy_stream(*frames);
        group.throughput(Throughput::Bytes(stream.len() as u64));
        group.bench_with_input(BenchmarkId::new("feed", frames), &stream, |b, stream| {
            b.iter(|| {
                let mut sync = FrameSynchronizer::new();
                black_box(sync.feed(black_box(stream)))
            })
        });
    }

    group.finish();
}

/// Benchmark checksum and field extraction
fn bench_frame_decode(c: &mut Criterion) {
    let frame = Frame::new(VALID_FRAME);

    c.bench_function("frame_checksum", |b| b.iter(|| black_box(&frame).checksum()));
    c.bench_function("frame_decode", |b| b.iter(|| black_box(&frame).decode()));
}

/// Benchmark publishing into each sink implementation
fn bench_decoder_sinks(c: &mut Criterion) {
    let frame = Frame::new(VALID_FRAME);

    let atomic = FrameDecoder::new(Arc::new(AtomicGauges::new()), DecoderConfig::default());
    c.bench_function("process_atomic_sink", |b| b.iter(|| atomic.process(black_box(&frame))));

    let prometheus = FrameDecoder::new(Arc::new(PrometheusSink::new()), DecoderConfig::default());
    c.bench_function("process_prometheus_sink", |b| {
        b.iter(|| prometheus.process(black_box(&frame)))
    });
}

criterion_group!(
    benches,
    bench_synchronizer,
    bench_frame_decode,
    bench_decoder_sinks
);
criterion_main!(benches);
