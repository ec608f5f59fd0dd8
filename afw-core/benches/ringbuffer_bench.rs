//! Performance benchmarks for ring buffers and buffered streams
//!
//! This benchmark suite evaluates:
//! - Single-unit vs bulk enqueue/dequeue throughput
//! - Buffered stream throughput across capacities and read chunk sizes
//! - Peek cost for short and full-buffer prefixes

use afw_core::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// Reproducible pseudo-random data
fn sample_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut seed: u64 = 0x123456789ABCDEF0;
    for _ in 0..size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((seed >> 32) as u8);
    }
    data
}

fn bench_ring_units(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_single_unit");
    let capacity = 8192;
    group.throughput(Throughput::Bytes(capacity as u64));

    group.bench_function("enqueue_dequeue_one", |b| {
        let mut ring = ByteRingBuffer::new(capacity).unwrap();
        b.iter(|| {
            for i in 0..capacity {
                ring.enqueue_one(i as u8).unwrap();
            }
            let mut acc = 0u8;
            for _ in 0..capacity {
                acc ^= ring.dequeue_one().unwrap();
            }
            black_box(acc)
        });
    });

    group.finish();
}

fn bench_ring_bulk(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_bulk");

    for chunk in [16usize, 256, 4096] {
        let data = sample_data(chunk);
        group.throughput(Throughput::Bytes(chunk as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &data, |b, data| {
            // Odd capacity keeps the indices wrapping at different offsets.
            let mut ring = ByteRingBuffer::new(8191).unwrap();
            let mut out = vec![0u8; data.len()];
            b.iter(|| {
                ring.enqueue_slice(black_box(data)).unwrap();
                black_box(ring.dequeue_into(&mut out))
            });
        });
    }

    group.finish();
}

fn bench_stream_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffered_stream");
    let data = sample_data(1 << 20);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for (capacity, chunk) in [(1024usize, 512usize), (8192, 4096), (65536, 16384)] {
        let id = format!("cap{capacity}_chunk{chunk}");
        group.bench_function(BenchmarkId::from_parameter(id), |b| {
            b.iter(|| {
                let source = MemorySource::new(data.clone());
                let mut stream = BufferedPullStream::with_capacity(source, capacity).unwrap();
                let mut buf = vec![0u8; chunk];
                let mut total = 0usize;
                while let Some(n) = stream.read_bulk(&mut buf, 0, chunk).unwrap() {
                    total += n;
                }
                black_box(total)
            });
        });
    }

    group.finish();
}

fn bench_peek(c: &mut Criterion) {
    let mut group = c.benchmark_group("peek");
    let data = sample_data(8192);

    for len in [4usize, 512, 8192] {
        let prefix = data[..len].to_vec();
        group.bench_with_input(BenchmarkId::from_parameter(len), &prefix, |b, prefix| {
            let source = MemorySource::new(data.clone());
            let mut stream = PeekablePullStream::with_capacity(source, 8192).unwrap();
            b.iter(|| black_box(stream.peek_slice(black_box(prefix)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ring_units,
    bench_ring_bulk,
    bench_stream_throughput,
    bench_peek
);
criterion_main!(benches);
