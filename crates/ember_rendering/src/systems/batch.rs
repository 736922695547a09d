//! # Batch Render System
//!
//! Draws entities whose sprite is instanced. The entire concatenated
//! per-instance transform buffer goes up in one write (offset 0, full byte
//! length), and each member costs exactly one draw call with the geometry's
//! declared instance count - N instances of the same geometry/material for
//! the price of one draw.

use tracing::warn;

use ember_core::{Albedo, ComponentKind, EntityId, SceneRegistry};

use super::RenderSystem;
use crate::binding::{GROUP_CAMERA, GROUP_MATERIAL, GROUP_TRANSFORM};
use crate::error::FrameError;
use crate::frame::{DrawCall, FrameCommands, MAX_BIND_GROUPS};
use crate::registry::Registry;

/// Instanced rendering with one draw call per member entity.
#[derive(Default)]
pub struct BatchSystem {
    members: Vec<EntityId>,
}

impl BatchSystem {
    /// Creates the system with an empty member list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Member entities, in registry order.
    #[must_use]
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }
}

impl RenderSystem for BatchSystem {
    fn collect(&mut self, scene: &SceneRegistry) {
        self.members.clear();
        for entity in scene.entities() {
            if entity.has(ComponentKind::InstancedSprite) {
                self.members.push(entity.id);
            }
        }
    }

    fn update_buffers(
        &self,
        registry: &Registry,
        commands: &mut FrameCommands,
    ) -> Result<(), FrameError> {
        // The camera uniform itself is the simple system's upload; this
        // system only refuses to run without a shared camera.
        if registry.scene.camera().is_err() || registry.camera_binding().is_none() {
            return Err(FrameError::MissingCamera);
        }

        for &id in &self.members {
            let index = id.index();
            let Some(binding) = registry.binding(id) else {
                warn!(entity = index, "batch member has no render binding, skipping");
                continue;
            };
            let Some(material) = registry.scene.materials.get(index) else {
                warn!(entity = index, "batch member has no material component, skipping");
                continue;
            };
            let Some(transform) = registry.scene.transforms.get(index) else {
                warn!(entity = index, "batch member has no transform component, skipping");
                continue;
            };

            if let Albedo::Color(color) = material.albedo {
                commands.push_write(binding.material_ubo, 0, bytemuck::bytes_of(&color));
            }
            // One write covers every instance's matrix: offset 0, full
            // byte length of the flattened buffer.
            commands.push_write(binding.transform_ubo, 0, transform.flattened_bytes());
        }
        Ok(())
    }

    fn run(&self, registry: &Registry, commands: &mut FrameCommands) -> Result<(), FrameError> {
        let Some(camera) = registry.camera_binding() else {
            return Err(FrameError::MissingCamera);
        };

        for &id in &self.members {
            let index = id.index();
            let Some(binding) = registry.binding(id) else {
                warn!(entity = index, "batch member has no render binding, skipping");
                continue;
            };
            let Some(geometry) = registry.scene.geometries.get(index) else {
                warn!(entity = index, "batch member has no geometry component, skipping");
                continue;
            };

            let mut bind_groups = [None; MAX_BIND_GROUPS];
            bind_groups[GROUP_CAMERA as usize] = Some(camera.group);
            bind_groups[GROUP_MATERIAL as usize] = Some(binding.material_group);
            bind_groups[GROUP_TRANSFORM as usize] = Some(binding.transform_group);

            commands.push_draw(DrawCall {
                pipeline: binding.pipeline,
                bind_groups,
                vertex_buffer: binding.vertex_buffer,
                vertex_count: geometry.vertex_count(),
                instance_count: geometry.instance_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{CameraBinding, RenderBinding};
    use crate::systems::SimpleSystem;
    use ember_core::{
        BindGroupHandle, CameraComponent, Component, Entity, EntityId, GeometryComponent,
        InstancedSpriteComponent, MaterialComponent, PipelineHandle, ShaderHandle,
        TransformComponent, UniformBufferHandle, VertexBufferHandle,
    };
    use glam::{Mat4, Vec3};

    const PLAYER: EntityId = EntityId::new(0);
    const LEVEL: EntityId = EntityId::new(1);

    const CAMERA_UBO: UniformBufferHandle = UniformBufferHandle(0);
    const LEVEL_MATERIAL_UBO: UniformBufferHandle = UniformBufferHandle(3);
    const LEVEL_TRANSFORM_UBO: UniformBufferHandle = UniformBufferHandle(4);

    fn level_binding() -> RenderBinding {
        RenderBinding {
            pipeline: PipelineHandle(1),
            material_group: BindGroupHandle(3),
            transform_group: BindGroupHandle(4),
            material_ubo: LEVEL_MATERIAL_UBO,
            transform_ubo: LEVEL_TRANSFORM_UBO,
            vertex_buffer: VertexBufferHandle(1),
        }
    }

    /// A registry with a camera on the player entity and a 7-instance
    /// level entity wired for batch rendering.
    fn batch_registry() -> Registry {
        let mut registry = Registry::new(8);

        registry.scene.submit_entity(Entity::new(PLAYER, "Player"));
        registry
            .scene
            .attach(
                PLAYER,
                Component::Camera(CameraComponent::new(
                    Mat4::IDENTITY,
                    Mat4::IDENTITY,
                    Vec3::ZERO,
                )),
            )
            .unwrap();

        registry.scene.submit_entity(Entity::new(LEVEL, "Level"));
        let positions: Vec<Vec3> = (0..7).map(|i| Vec3::new(i as f32 * 50.0, 0.0, 0.0)).collect();
        let sizes = vec![Vec3::new(30.0, 10.0, 1.0); 7];
        registry
            .scene
            .attach(
                LEVEL,
                Component::InstancedSprite(
                    InstancedSpriteComponent::new(positions, sizes).unwrap(),
                ),
            )
            .unwrap();
        registry
            .scene
            .attach(LEVEL, Component::Geometry(GeometryComponent::square(7)))
            .unwrap();
        registry
            .scene
            .attach(
                LEVEL,
                Component::Material(MaterialComponent::with_color(
                    ShaderHandle(1),
                    Vec3::new(0.5, 0.0, 1.0),
                )),
            )
            .unwrap();
        registry
            .scene
            .attach(LEVEL, Component::Transform(TransformComponent::identity(7)))
            .unwrap();

        registry.submit_camera_binding(CameraBinding {
            group: BindGroupHandle(0),
            ubo: CAMERA_UBO,
        });
        registry.submit_binding(LEVEL, level_binding());
        registry
    }

    #[test]
    fn test_batch_draws_once_with_declared_instance_count() {
        let registry = batch_registry();
        let mut system = BatchSystem::new();
        system.collect(&registry.scene);
        assert_eq!(system.members(), &[LEVEL]);

        let mut commands = FrameCommands::new();
        system.update_buffers(&registry, &mut commands).unwrap();
        system.run(&registry, &mut commands).unwrap();

        // Exactly one draw call, with instanceCount = 7.
        assert_eq!(commands.draw_count(), 1);
        let draw = commands.draws()[0];
        assert_eq!(draw.instance_count, 7);
        assert_eq!(draw.vertex_count, 6);
        assert_eq!(draw.pipeline, PipelineHandle(1));
        assert_eq!(draw.bind_groups[0], Some(BindGroupHandle(0)));
        assert_eq!(draw.bind_groups[1], Some(BindGroupHandle(3)));
        assert_eq!(draw.bind_groups[2], Some(BindGroupHandle(4)));
    }

    #[test]
    fn test_batch_writes_whole_transform_buffer_once() {
        let registry = batch_registry();
        let mut system = BatchSystem::new();
        system.collect(&registry.scene);

        let mut commands = FrameCommands::new();
        system.update_buffers(&registry, &mut commands).unwrap();

        // Exactly one write targets the transform buffer, at offset 0,
        // covering all 7 x 16 floats.
        let transform_writes: Vec<_> = commands
            .writes()
            .filter(|(write, _)| write.buffer == LEVEL_TRANSFORM_UBO)
            .collect();
        assert_eq!(transform_writes.len(), 1);
        let (write, bytes) = &transform_writes[0];
        assert_eq!(write.offset, 0);
        assert_eq!(bytes.len(), 7 * 16 * 4);
    }

    #[test]
    fn test_missing_camera_aborts_update() {
        let mut registry = batch_registry();
        registry.scene.despawn(PLAYER);

        let mut system = BatchSystem::new();
        system.collect(&registry.scene);

        let mut commands = FrameCommands::new();
        let err = system.update_buffers(&registry, &mut commands).unwrap_err();
        assert_eq!(err, FrameError::MissingCamera);
    }

    #[test]
    fn test_member_without_geometry_is_skipped() {
        let mut registry = batch_registry();
        registry.scene.geometries.reset(LEVEL.index());

        let mut system = BatchSystem::new();
        system.collect(&registry.scene);

        let mut commands = FrameCommands::new();
        system.update_buffers(&registry, &mut commands).unwrap();
        system.run(&registry, &mut commands).unwrap();
        assert_eq!(commands.draw_count(), 0);
    }

    #[test]
    fn test_simple_system_ignores_instanced_members() {
        let registry = batch_registry();
        let mut simple = SimpleSystem::new();
        simple.collect(&registry.scene);
        // The level's sprite is instanced; the simple system must not
        // claim it.
        assert!(simple.members().is_empty());
    }
}
