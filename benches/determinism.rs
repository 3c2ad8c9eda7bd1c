//! Simulation throughput benchmarks.
//!
//! Measures seeded runs and snapshot capture, the numbers that bound how
//! fast one server process can drive the game and broadcast its state.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use temple_dash::game::{Engine, EngineConfig};

/// One minute of simulated time at the reference tick rate.
const RUN_TICKS: u32 = 3600;

/// Drive a seeded engine through a fixed input script.
fn seeded_run(seed: u64, ticks: u32) -> u32 {
    let mut engine = Engine::with_seed(EngineConfig::default(), seed).unwrap();

    engine.start();
    for t in 0..ticks {
        if t % 45 == 0 {
            engine.jump();
        }
        if t % 97 == 0 {
            engine.slide();
        }
        if engine.advance(1.0 / 60.0).game_over {
            engine.start();
        }
    }

    engine.session().high_score
}

/// Engine with both entity collections filled to their caps.
fn busy_engine() -> Engine {
    let config = EngineConfig {
        obstacle_spawn_rate: 1.0,
        coin_spawn_rate: 1.0,
        ..EngineConfig::default()
    };
    let mut engine = Engine::with_seed(config, 99).unwrap();

    engine.start();
    for _ in 0..120 {
        engine.advance(1.0 / 60.0);
    }

    engine
}

fn bench_tick_throughput(c: &mut Criterion) {
    c.bench_function("scripted_run_3600_ticks", |b| {
        b.iter(|| seeded_run(black_box(12345), RUN_TICKS));
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let engine = busy_engine();

    c.bench_function("snapshot_full_field", |b| {
        b.iter(|| black_box(engine.snapshot()));
    });
}

fn bench_snapshot_json(c: &mut Criterion) {
    let engine = busy_engine();
    let snapshot = engine.snapshot();

    c.bench_function("snapshot_to_json", |b| {
        b.iter(|| serde_json::to_string(black_box(&snapshot)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_tick_throughput,
    bench_snapshot,
    bench_snapshot_json
);
criterion_main!(benches);
