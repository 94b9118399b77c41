use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

// Import from the crate being benchmarked
extern crate springloom;
use springloom::physics::integrators::IntegratorKind;
use springloom::physics::math::Scalar;
use springloom::physics::pendulum::PendulumSystem;
use springloom::physics::state::ParticleState;
use springloom::physics::system::OdeSystem;
use springloom::physics::topology::GridConfig;
use springloom::simulation::Simulation;

/// A square cloth of `size` x `size` particles and its resting layout
fn cloth(size: usize) -> (PendulumSystem, ParticleState) {
    let network = GridConfig {
        rows: size,
        cols: size,
        ..Default::default()
    }
    .build()
    .expect("valid grid");
    (network.system, ParticleState::from_positions(network.positions))
}

fn benchmark_time_derivative(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_derivative");

    for &size in &[4, 8, 16, 32, 64] {
        let (system, state) = cloth(size);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("cloth", size), &size, |b, _| {
            b.iter(|| black_box(system.time_derivative(black_box(&state), 0.0)));
        });
    }

    group.finish();
}

fn benchmark_integrators(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrators");
    let dt: Scalar = 0.002;

    for &size in &[8, 32] {
        let (system, state) = cloth(size);
        group.throughput(Throughput::Elements((size * size) as u64));

        for kind in IntegratorKind::ALL {
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &size, |b, _| {
                b.iter(|| black_box(kind.integrate(&system, black_box(&state), 0.0, dt)));
            });
        }
    }

    group.finish();
}

fn benchmark_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    let (system, state) = cloth(8);

    for kind in IntegratorKind::ALL {
        group.bench_function(kind.name(), |b| {
            let mut sim =
                Simulation::new(system.clone(), state.clone(), kind, 0.002).expect("valid step size");
            b.iter(|| {
                sim.reset();
                black_box(sim.advance(1.0 / 60.0).expect("stable frame"))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_time_derivative,
    benchmark_integrators,
    benchmark_frame
);
criterion_main!(benches);
