//! Per-sample cost of a voice across modes, strategies and smoothness settings.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slopegen_engine::{Engine, EngineConfig, Frame, Params, RampMode, ShapeKind};

const BLOCK: usize = 1024;

fn bench_loop_dry(c: &mut Criterion) {
    let mut e = Engine::new(EngineConfig::default()).unwrap();
    let p = Params::default().with_frequency(2.0).with_shape(0.6);

    c.bench_function("loop_dry_sample", |b| b.iter(|| black_box(e.process(black_box(&p), None))));
}

fn bench_smoothness(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoothness");

    let settings = [("bypass", 0.5), ("filter", 0.25), ("fold", 0.9)];

    for (name, k) in settings {
        let mut e = Engine::new(EngineConfig::default()).unwrap();
        let p = Params::default().with_frequency(110.0).with_shape(0.3).with_smoothness(k);
        let mut out = [0.0_f32; BLOCK];

        group.bench_function(name, |b| {
            b.iter(|| {
                e.render(&mut black_box(p), &mut out);
                black_box(out[BLOCK - 1])
            })
        });
    }

    group.finish();
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape_strategy");

    for (name, kind) in [("table", ShapeKind::Table), ("power", ShapeKind::PowerCurve)] {
        let mut e = Engine::new(EngineConfig::default().with_shape(kind)).unwrap();
        let p = Params::default().with_frequency(110.0).with_shape(0.8);
        let mut out = [0.0_f32; BLOCK];

        group.bench_function(name, |b| {
            b.iter(|| {
                e.render(&mut black_box(p), &mut out);
                black_box(out[BLOCK - 1])
            })
        });
    }

    group.finish();
}

fn bench_envelope_block(c: &mut Criterion) {
    let mut e = Engine::new(EngineConfig::default().with_mode(RampMode::AttackRelease)).unwrap();
    let p = Params::default().with_frequency(20.0).with_slope(0.1);
    let mut n = 0_usize;
    let mut gate = move || {
        n = n.wrapping_add(1);
        Frame::new(p).with_trigger(if n % 4800 < 2400 { 1.0 } else { 0.0 })
    };
    let mut out = [0.0_f32; BLOCK];

    c.bench_function("attack_release_gated_block", |b| {
        b.iter(|| {
            e.render(&mut gate, &mut out);
            black_box(out[BLOCK - 1])
        })
    });
}

criterion_group!(
    benches,
    bench_loop_dry,
    bench_smoothness,
    bench_strategies,
    bench_envelope_block
);
criterion_main!(benches);
