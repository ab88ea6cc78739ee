//! Benchmarks for the periodicity analyzers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tsanalyzer::prelude::*;

fn generate_sine(n: usize, period: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin())
        .collect()
}

fn bench_spectral(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectral");
    for size in [256, 1024, 4096].iter() {
        let signal = generate_sine(*size, 16);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut analyzer = SpectralAnalyzer::new(black_box(signal.clone()), 1.0);
                analyzer.compute().unwrap();
            })
        });
    }
    group.finish();
}

fn bench_decomposition(c: &mut Criterion) {
    let mut group = c.benchmark_group("decomposition");
    for size in [120, 480, 960].iter() {
        let signal = generate_sine(*size, 12);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut decomposer = StlDecomposer::new(black_box(signal.clone()), 12);
                decomposer.compute().unwrap();
            })
        });
    }
    group.finish();
}

fn bench_autocorrelation(c: &mut Criterion) {
    let mut group = c.benchmark_group("autocorrelation");
    for size in [256, 1024, 4096].iter() {
        let signal = generate_sine(*size, 16);
        let max_lag = size / 4;
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut analyzer =
                    AutocorrelationAnalyzer::new(black_box(signal.clone()), max_lag);
                analyzer.compute().unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_spectral,
    bench_decomposition,
    bench_autocorrelation
);
criterion_main!(benches);
