//! Benchmarks for the per-frame hot path: physics integration and the
//! broad-phase grid rebuild.

use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec3;

use ember_core::{
    Component, EngineConfig, Entity, EntityId, FrameData, InputState, InstancedPhysicsComponent,
    InstancedSpriteComponent, PhysicsSystem, SceneRegistry, SpatialGridSystem, SupportSystem,
    TickContext, TransformComponent, Viewport,
};

const INSTANCES: usize = 1024;

fn build_scene() -> SceneRegistry {
    let mut scene = SceneRegistry::new(4);
    let level = EntityId::new(0);
    scene.submit_entity(Entity::new(level, "Level"));

    let positions: Vec<Vec3> = (0..INSTANCES)
        .map(|i| Vec3::new((i % 64) as f32 * 12.0, (i / 64) as f32 * 12.0, 0.0))
        .collect();
    let sizes = vec![Vec3::new(10.0, 10.0, 1.0); INSTANCES];

    scene
        .attach(
            level,
            Component::InstancedSprite(InstancedSpriteComponent::new(positions, sizes).unwrap()),
        )
        .unwrap();
    scene
        .attach(
            level,
            Component::InstancedPhysics(
                InstancedPhysicsComponent::new(
                    vec![1.0; INSTANCES],
                    vec![Vec3::ZERO; INSTANCES],
                    vec![Vec3::ZERO; INSTANCES],
                )
                .unwrap(),
            ),
        )
        .unwrap();
    scene
        .attach(
            level,
            Component::Transform(TransformComponent::identity(INSTANCES as u32)),
        )
        .unwrap();
    scene
}

fn bench_physics_tick(c: &mut Criterion) {
    let mut scene = build_scene();
    let mut system = PhysicsSystem::new(EntityId::new(0), &EngineConfig::default());
    system.collect(&scene);

    let mut input = InputState::new();
    let mut frame = FrameData::new();

    c.bench_function("physics_tick_1024_instances", |b| {
        b.iter(|| {
            let mut ctx = TickContext {
                dt: 1.0 / 60.0,
                input: &mut input,
                viewport: Viewport::new(800.0, 600.0),
            };
            system.run(&mut scene, &mut ctx, &mut frame);
        });
    });
}

fn bench_grid_rebuild(c: &mut Criterion) {
    let mut scene = build_scene();
    let mut grid = SpatialGridSystem::new(2, 2, Viewport::new(800.0, 600.0));
    grid.collect(&scene);

    let mut input = InputState::new();
    let mut frame = FrameData::new();

    c.bench_function("grid_rebuild_1024_instances", |b| {
        b.iter(|| {
            let mut ctx = TickContext {
                dt: 1.0 / 60.0,
                input: &mut input,
                viewport: Viewport::new(800.0, 600.0),
            };
            grid.run(&mut scene, &mut ctx, &mut frame);
        });
    });
}

criterion_group!(benches, bench_physics_tick, bench_grid_rebuild);
criterion_main!(benches);
