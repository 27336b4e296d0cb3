//! Benchmarks for packed array operations in both representations.
//!
//! - Materialization: local buffer to foreign buffer
//! - Sort and binary search: local vs foreign
//! - Byte conversion and FastLZ compression
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use packed_array::prelude::*;
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

/// Initialize puffin profiler.
#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

/// Call at the end of each benchmark iteration to flush profiling data.
#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

const SIZES: [usize; 3] = [100, 10_000, 100_000];

fn scrambled(n: usize) -> Vec<i32> {
    let mut x = 0x2545_F491u32;
    (0..n)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x as i32
        })
        .collect()
}

fn proxy_of(values: Vec<i32>) -> PackedInt32Array {
    let mut array = PackedInt32Array::from(values);
    array.materialize();
    array
}

/// Cost of moving a local buffer into a foreign one.
fn materialize_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let mut group = c.benchmark_group("array/materialize");
    for n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("int32_{n}"), |b| {
            b.iter_batched(
                || PackedInt32Array::from(scrambled(n)),
                |mut array| {
                    let handle = array.materialize();
                    end_profiling_frame();
                    handle.release();
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Sort and lower-bound search, local vs foreign.
fn sort_search_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("array/sort_search");
    for n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("sort_local_{n}"), |b| {
            b.iter_batched(
                || PackedInt32Array::from(scrambled(n)),
                |mut array| {
                    array.sort();
                    black_box(array)
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("sort_proxy_{n}"), |b| {
            b.iter_batched(
                || proxy_of(scrambled(n)),
                |mut array| {
                    array.sort();
                    end_profiling_frame();
                    if let Some(handle) = array.proxy_handle() {
                        handle.release();
                    }
                },
                BatchSize::SmallInput,
            );
        });

        let mut local = PackedInt32Array::from(scrambled(n));
        local.sort();
        let mut proxy = proxy_of(scrambled(n));
        proxy.sort();
        group.bench_function(format!("search_local_{n}"), |b| {
            b.iter(|| black_box(local.binary_search(black_box(&12345))));
        });
        group.bench_function(format!("search_proxy_{n}"), |b| {
            b.iter(|| black_box(proxy.binary_search(black_box(&12345))));
        });
    }
    group.finish();
}

/// Byte conversion and FastLZ compression.
fn byte_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("bytes");
    for n in SIZES {
        let ints = PackedInt32Array::from((0..n as i32).map(|i| i % 97).collect::<Vec<_>>());
        let bytes = ints.to_byte_array();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_function(format!("to_byte_array_{n}"), |b| {
            b.iter(|| black_box(ints.to_byte_array()));
        });
        group.bench_function(format!("fastlz_compress_{n}"), |b| {
            b.iter(|| black_box(bytes.compress(CompressionMode::FastLz)));
        });

        let packed = bytes
            .compress(CompressionMode::FastLz)
            .unwrap_or_default();
        group.bench_function(format!("fastlz_decompress_{n}"), |b| {
            b.iter(|| {
                let plain = packed.decompress(bytes.len(), CompressionMode::FastLz);
                end_profiling_frame();
                black_box(plain)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    materialize_benchmarks,
    sort_search_benchmarks,
    byte_benchmarks
);
criterion_main!(benches);
