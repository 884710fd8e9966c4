use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use spring_message::*;
use std::hint::black_box;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn populated_manager(letters: usize, parallel: bool) -> PhysicsManager {
    let mut manager = PhysicsManager::new(ExperienceConfig::default()).expect("default config");
    manager.world_mut().set_parallel_enabled(parallel);
    manager.set_closed_area(30.0, 30.0, 30.0);

    let text = "A".repeat(letters);
    let indices = manager.set_message(&text).expect("first message");
    for index in indices {
        let position = Vec3::new(
            (index % 10) as f32 * 2.0 - 10.0,
            2.0 + (index / 10) as f32 * 2.0,
            -6.0,
        );
        let descriptor = VisualDescriptor::new(
            VisualId(index as u64 + 10),
            position,
            Aabb::from_center_size(Vec3::ZERO, Vec3::splat(0.8)),
        )
        .with_spring_target(index);
        manager
            .register(descriptor, ShapeKind::Box, BodyKind::Springable, None)
            .expect("letter");
    }
    manager
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("experience_update");

    for &count in &[10usize, 100, 400] {
        for parallel in [false, true] {
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, count), &count, |b, &count| {
                let mut manager = populated_manager(count, parallel);
                manager.show_all();
                let mut timestamp = 0.0;
                b.iter(|| {
                    timestamp += FRAME_MS;
                    black_box(manager.update(timestamp));
                })
            });
        }
    }
    group.finish();
}

fn bench_attraction(c: &mut Criterion) {
    let mut manager = populated_manager(100, false);
    manager.update(0.0);
    c.bench_function("attract_all_to_player_100", |b| {
        b.iter(|| manager.attract_all_to_player())
    });
}

criterion_group!(benches, bench_update, bench_attraction);
criterion_main!(benches);
