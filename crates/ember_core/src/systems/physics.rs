//! # Physics System
//!
//! Advances every physics-bearing sprite by one frame: input forces for the
//! player entity, Newton's second law, Euler integration, and a from-scratch
//! model matrix rebuild flattened straight into the transform's float buffer.

use glam::{Mat4, Vec3};
use tracing::warn;

use super::{FrameData, SupportSystem, TickContext};
use crate::config::EngineConfig;
use crate::ecs::{ComponentKind, EntityId, SceneRegistry};
use crate::input::Key;

/// Per-frame physics integration.
pub struct PhysicsSystem {
    members: Vec<EntityId>,
    player: EntityId,
    move_force: f32,
    jump_impulse: Vec3,
}

impl PhysicsSystem {
    /// Creates the system. `player` names the entity that receives input
    /// forces; force magnitudes come from the engine config.
    #[must_use]
    pub fn new(player: EntityId, config: &EngineConfig) -> Self {
        Self {
            members: Vec::new(),
            player,
            move_force: config.move_force,
            jump_impulse: Vec3::from_array(config.jump_impulse),
        }
    }

    /// Member entities, in registry order.
    #[must_use]
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }

    /// Translates this frame's input into forces on the player entity.
    ///
    /// Held move keys apply a horizontal force every frame; the jump key is
    /// edge-triggered and applies its impulse once per key-down transition.
    fn apply_player_forces(&self, scene: &mut SceneRegistry, ctx: &mut TickContext<'_>) {
        let Some(physics) = scene.physics.get_mut(self.player.index()) else {
            return;
        };

        if ctx.input.take_pressed(Key::Space) {
            physics.apply_force(self.jump_impulse);
        }
        if ctx.input.is_held(Key::A) || ctx.input.is_held(Key::ArrowLeft) {
            physics.apply_force(Vec3::new(-self.move_force, 0.0, 0.0));
        }
        if ctx.input.is_held(Key::D) || ctx.input.is_held(Key::ArrowRight) {
            physics.apply_force(Vec3::new(self.move_force, 0.0, 0.0));
        }
    }

    /// Model matrix for one instance: translate, then scale, composed so
    /// that scale does not distort the translation.
    #[inline]
    fn model_matrix(position: Vec3, size: Vec3) -> Mat4 {
        Mat4::from_translation(position) * Mat4::from_scale(size)
    }

    fn integrate_single(scene: &mut SceneRegistry, id: EntityId) {
        let index = id.index();
        let Some(physics) = scene.physics.get_mut(index) else {
            return;
        };
        let Some(sprite) = scene.sprites.get_mut(index) else {
            warn!(entity = index, "physics member has no sprite component, skipping");
            return;
        };
        let Some(transform) = scene.transforms.get_mut(index) else {
            warn!(entity = index, "physics member has no transform component, skipping");
            return;
        };

        physics.velocity += physics.acceleration;
        sprite.position += physics.velocity;
        sprite.sync_collider();

        transform.set_matrix(0, Self::model_matrix(sprite.position, sprite.size));
        physics.reset();
    }

    fn integrate_instanced(scene: &mut SceneRegistry, id: EntityId) {
        let index = id.index();
        let Some(physics) = scene.instanced_physics.get_mut(index) else {
            return;
        };
        let Some(sprite) = scene.instanced_sprites.get_mut(index) else {
            warn!(entity = index, "physics member has no sprite component, skipping");
            return;
        };
        let Some(transform) = scene.transforms.get_mut(index) else {
            warn!(entity = index, "physics member has no transform component, skipping");
            return;
        };

        for instance in 0..physics.masses.len() {
            physics.velocities[instance] += physics.accelerations[instance];
            sprite.positions[instance] += physics.velocities[instance];
            sprite.sync_collider(instance);

            transform.set_matrix(
                instance,
                Self::model_matrix(sprite.positions[instance], sprite.sizes[instance]),
            );
        }
        physics.reset_all();
    }
}

impl SupportSystem for PhysicsSystem {
    fn collect(&mut self, scene: &SceneRegistry) {
        self.members.clear();
        for entity in scene.entities() {
            if entity.has(ComponentKind::Physics) || entity.has(ComponentKind::InstancedPhysics) {
                self.members.push(entity.id);
            }
        }
    }

    fn run(&mut self, scene: &mut SceneRegistry, ctx: &mut TickContext<'_>, _frame: &mut FrameData) {
        self.apply_player_forces(scene, ctx);

        for &id in &self.members {
            let Ok(entity) = scene.entity(id) else {
                continue;
            };
            if entity.has(ComponentKind::Physics) {
                Self::integrate_single(scene, id);
            } else {
                Self::integrate_instanced(scene, id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{
        Component, Entity, PhysicsComponent, SpriteComponent, TransformComponent,
    };
    use crate::input::InputState;
    use crate::systems::Viewport;

    const PLAYER: EntityId = EntityId::new(0);

    fn player_scene(position: Vec3, size: Vec3, mass: f32) -> SceneRegistry {
        let mut scene = SceneRegistry::new(4);
        scene.submit_entity(Entity::new(PLAYER, "Player"));
        scene
            .attach(PLAYER, Component::Sprite(SpriteComponent::new(position, size)))
            .unwrap();
        scene
            .attach(
                PLAYER,
                Component::Physics(PhysicsComponent::new(mass, Vec3::ZERO, Vec3::ZERO).unwrap()),
            )
            .unwrap();
        scene
            .attach(PLAYER, Component::Transform(TransformComponent::identity(1)))
            .unwrap();
        scene
    }

    fn tick(system: &mut PhysicsSystem, scene: &mut SceneRegistry, input: &mut InputState) {
        let mut ctx = TickContext {
            dt: 1.0 / 60.0,
            input,
            viewport: Viewport::new(800.0, 600.0),
        };
        let mut frame = FrameData::new();
        system.run(scene, &mut ctx, &mut frame);
    }

    #[test]
    fn test_force_integration_scenario() {
        // Player at (100,100), size (30,30), mass 1.0; one frame with a
        // (-2,0,0) force and zero initial velocity.
        let mut scene = player_scene(
            Vec3::new(100.0, 100.0, 0.0),
            Vec3::new(30.0, 30.0, 1.0),
            1.0,
        );
        scene
            .physics
            .get_mut(PLAYER.index())
            .unwrap()
            .apply_force(Vec3::new(-2.0, 0.0, 0.0));

        let mut system = PhysicsSystem::new(PLAYER, &EngineConfig::default());
        system.collect(&scene);
        let mut input = InputState::new();
        tick(&mut system, &mut scene, &mut input);

        let sprite = scene.sprites.get(PLAYER.index()).unwrap();
        assert_eq!(sprite.position, Vec3::new(98.0, 100.0, 0.0));

        // Velocity and acceleration are zeroed at end of frame.
        let physics = scene.physics.get(PLAYER.index()).unwrap();
        assert_eq!(physics.velocity, Vec3::ZERO);
        assert_eq!(physics.acceleration, Vec3::ZERO);
    }

    #[test]
    fn test_matrix_rebuilt_not_accumulated() {
        let mut scene = player_scene(
            Vec3::new(10.0, 20.0, 0.0),
            Vec3::new(2.0, 2.0, 1.0),
            1.0,
        );
        let mut system = PhysicsSystem::new(PLAYER, &EngineConfig::default());
        system.collect(&scene);
        let mut input = InputState::new();

        // Two frames without forces: position is unchanged, and the model
        // matrix must equal translate*scale exactly (not a product of
        // repeated applications).
        tick(&mut system, &mut scene, &mut input);
        tick(&mut system, &mut scene, &mut input);

        let transform = scene.transforms.get(PLAYER.index()).unwrap();
        let expected = Mat4::from_translation(Vec3::new(10.0, 20.0, 0.0))
            * Mat4::from_scale(Vec3::new(2.0, 2.0, 1.0));
        assert_eq!(transform.matrix(0), expected);
        assert_eq!(transform.flattened().len(), 16);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let mut scene = player_scene(Vec3::ZERO, Vec3::ONE, 1.0);
        let mut system = PhysicsSystem::new(PLAYER, &EngineConfig::default());
        system.collect(&scene);

        let mut input = InputState::new();
        input.key_down(Key::Space);

        // First frame: the impulse applies once.
        tick(&mut system, &mut scene, &mut input);
        let after_jump = scene.sprites.get(PLAYER.index()).unwrap().position;
        assert_eq!(after_jump, Vec3::new(0.0, -10.0, 0.0));

        // Key still held: no second impulse, no further motion.
        tick(&mut system, &mut scene, &mut input);
        let next = scene.sprites.get(PLAYER.index()).unwrap().position;
        assert_eq!(next, after_jump);
    }

    #[test]
    fn test_held_move_key_applies_every_frame() {
        let mut scene = player_scene(Vec3::ZERO, Vec3::ONE, 1.0);
        let mut system = PhysicsSystem::new(PLAYER, &EngineConfig::default());
        system.collect(&scene);

        let mut input = InputState::new();
        input.key_down(Key::D);

        tick(&mut system, &mut scene, &mut input);
        tick(&mut system, &mut scene, &mut input);

        // +1 force each frame; velocity does not persist across frames, so
        // each frame moves exactly one unit.
        let sprite = scene.sprites.get(PLAYER.index()).unwrap();
        assert_eq!(sprite.position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_member_without_sprite_is_skipped() {
        let mut scene = SceneRegistry::new(4);
        scene.submit_entity(Entity::new(PLAYER, "Ghost"));
        scene
            .attach(
                PLAYER,
                Component::Physics(PhysicsComponent::new(1.0, Vec3::ZERO, Vec3::ZERO).unwrap()),
            )
            .unwrap();

        let mut system = PhysicsSystem::new(PLAYER, &EngineConfig::default());
        system.collect(&scene);
        assert_eq!(system.members(), &[PLAYER]);

        // Must not panic; the entity is skipped with a warning.
        let mut input = InputState::new();
        tick(&mut system, &mut scene, &mut input);
    }

    #[test]
    fn test_flattened_buffer_length_after_run() {
        use crate::ecs::{InstancedPhysicsComponent, InstancedSpriteComponent};

        let level = EntityId::new(1);
        let mut scene = SceneRegistry::new(4);
        scene.submit_entity(Entity::new(level, "Level"));
        let positions = vec![Vec3::ZERO; 7];
        let sizes = vec![Vec3::ONE; 7];
        scene
            .attach(
                level,
                Component::InstancedSprite(
                    InstancedSpriteComponent::new(positions, sizes).unwrap(),
                ),
            )
            .unwrap();
        scene
            .attach(
                level,
                Component::InstancedPhysics(
                    InstancedPhysicsComponent::new(
                        vec![1.0; 7],
                        vec![Vec3::ZERO; 7],
                        vec![Vec3::ZERO; 7],
                    )
                    .unwrap(),
                ),
            )
            .unwrap();
        scene
            .attach(level, Component::Transform(TransformComponent::identity(7)))
            .unwrap();

        let mut system = PhysicsSystem::new(PLAYER, &EngineConfig::default());
        system.collect(&scene);
        let mut input = InputState::new();
        tick(&mut system, &mut scene, &mut input);

        let transform = scene.transforms.get(level.index()).unwrap();
        assert_eq!(transform.flattened().len(), 16 * 7);
    }
}
