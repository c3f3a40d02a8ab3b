use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use progressive_tracer::accumulation::Accumulator;
use progressive_tracer::camera::Camera;
use progressive_tracer::uniforms::{SeedSource, ShaderUniforms};
use glam::Vec2;

fn bench_camera_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("camera");

    group.bench_function("add_rotation", |b| {
        let mut camera = Camera::default();
        b.iter(|| camera.add_rotation(black_box(3.0), black_box(-1.5)));
    });

    group.bench_function("move_by", |b| {
        let mut camera = Camera::default();
        b.iter(|| camera.move_by(black_box(1.0), black_box(1.0), black_box(0.0)));
    });

    group.bench_function("basis", |b| {
        let mut camera = Camera::default();
        camera.add_rotation(120.0, 40.0);
        b.iter(|| {
            black_box(camera.look_direction());
            black_box(camera.right());
            black_box(camera.up());
        });
    });

    group.finish();
}

fn bench_accumulator(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulator");

    for moving in [false, true] {
        let label = if moving { "moving" } else { "static" };
        group.bench_with_input(BenchmarkId::new("next_frame", label), &moving, |b, &moving| {
            let mut camera = Camera::default();
            let mut accumulator = Accumulator::new();
            b.iter(|| {
                if moving {
                    camera.add_rotation(1.0, 0.0);
                }
                black_box(accumulator.next_frame(camera.pose()))
            });
        });
    }

    group.bench_function("uniforms", |b| {
        let camera = Camera::default();
        let mut seeds = SeedSource::from_seed(9);
        b.iter(|| {
            let uniforms = ShaderUniforms::from_camera(
                &camera,
                black_box(1.57),
                Vec2::new(1280.0, 720.0),
                0.5,
                4,
                &mut seeds,
                0.0,
            );
            black_box(uniforms.to_gpu())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_camera_updates, bench_accumulator);
criterion_main!(benches);
