//! Criterion benchmarks for sinefold-effects
//!
//! Run with: cargo bench -p sinefold-effects
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sinefold_core::Effect;
use sinefold_effects::{BusFilter, Cabinet, CombFilter, CombParams, Echo};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 220.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_bus_stage<E: Effect>(c: &mut Criterion, name: &str, mut create: impl FnMut() -> E) {
    let mut group = c.benchmark_group(name);
    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(BenchmarkId::new("process_stereo", block_size), &block_size, |b, _| {
            let mut effect = create();
            b.iter(|| {
                for &sample in &input {
                    black_box(effect.process_stereo(black_box(sample), black_box(-sample)));
                }
            });
        });
    }
    group.finish();
}

fn bench_bus(c: &mut Criterion) {
    bench_bus_stage(c, "BusFilter", || BusFilter::new(SAMPLE_RATE));
    bench_bus_stage(c, "Cabinet", || {
        let mut cab = Cabinet::new(SAMPLE_RATE);
        cab.set_drive_db(18.0);
        cab.set_asym(0.3);
        cab
    });
    bench_bus_stage(c, "Echo", || {
        let mut echo = Echo::new(SAMPLE_RATE);
        echo.set_mix(0.5);
        echo.set_feedback(0.6);
        echo
    });
}

fn bench_comb(c: &mut Criterion) {
    let input = generate_test_signal(1024);
    let mut group = c.benchmark_group("CombFilter");

    group.bench_function("process", |b| {
        let params = CombParams::new(SAMPLE_RATE);
        let mut comb = CombFilter::new(SAMPLE_RATE);
        comb.retune(57.0, &params);
        b.iter(|| {
            for &sample in &input {
                black_box(comb.process(black_box(sample), 0.0, 0.0));
            }
        });
    });

    // Paid per voice and sample while a comb control is ramping.
    group.bench_function("retune", |b| {
        let params = CombParams::new(SAMPLE_RATE);
        let mut comb = CombFilter::new(SAMPLE_RATE);
        let mut pitch = 40.0;
        b.iter(|| {
            pitch = if pitch > 90.0 { 40.0 } else { pitch + 0.5 };
            comb.retune(black_box(pitch), &params);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_bus, bench_comb);
criterion_main!(benches);
