//! # Simple Render System
//!
//! Draws entities with exactly one (non-instanced) sprite: one uniform
//! upload and one draw call per member, plus the shared camera upload.

use tracing::warn;

use ember_core::{Albedo, ComponentKind, EntityId, SceneRegistry};

use super::RenderSystem;
use crate::binding::{GROUP_CAMERA, GROUP_MATERIAL, GROUP_TRANSFORM};
use crate::error::FrameError;
use crate::frame::{DrawCall, FrameCommands, MAX_BIND_GROUPS};
use crate::registry::Registry;

/// Byte offset of the view matrix in the camera uniform buffer.
pub(crate) const CAMERA_VIEW_OFFSET: u64 = 64;
/// Byte offset of the camera position in the camera uniform buffer.
pub(crate) const CAMERA_POSITION_OFFSET: u64 = 128;

/// Writes the shared camera's projection, view and position into the
/// camera uniform buffer.
///
/// Shared by both render systems; either may run first in a frame.
pub(crate) fn write_camera(
    registry: &Registry,
    commands: &mut FrameCommands,
) -> Result<(), FrameError> {
    let camera = registry
        .scene
        .camera()
        .map_err(|_| FrameError::MissingCamera)?;
    let Some(binding) = registry.camera_binding() else {
        return Err(FrameError::MissingCamera);
    };

    commands.push_write(binding.ubo, 0, bytemuck::bytes_of(&camera.projection));
    commands.push_write(
        binding.ubo,
        CAMERA_VIEW_OFFSET,
        bytemuck::bytes_of(&camera.view),
    );
    commands.push_write(
        binding.ubo,
        CAMERA_POSITION_OFFSET,
        bytemuck::bytes_of(&camera.position),
    );
    Ok(())
}

/// Per-sprite rendering with one draw call per member entity.
#[derive(Default)]
pub struct SimpleSystem {
    members: Vec<EntityId>,
}

impl SimpleSystem {
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

impl RenderSystem for SimpleSystem {
    fn collect(&mut self, scene: &SceneRegistry) {
        self.members.clear();
        for entity in scene.entities() {
            if entity.has(ComponentKind::Sprite) {
                self.members.push(entity.id);
            }
        }
    }

    fn update_buffers(
        &self,
        registry: &Registry,
        commands: &mut FrameCommands,
    ) -> Result<(), FrameError> {
        write_camera(registry, commands)?;

        for &id in &self.members {
            let index = id.index();
            let Some(binding) = registry.binding(id) else {
                warn!(entity = index, "simple member has no render binding, skipping");
                continue;
            };
            let Some(material) = registry.scene.materials.get(index) else {
                warn!(entity = index, "simple member has no material component, skipping");
                continue;
            };
            let Some(transform) = registry.scene.transforms.get(index) else {
                warn!(entity = index, "simple member has no transform component, skipping");
                continue;
            };

            // Textured materials are fully described by their bind group;
            // only flat colors go through the material uniform.
            if let Albedo::Color(color) = material.albedo {
                commands.push_write(binding.material_ubo, 0, bytemuck::bytes_of(&color));
            }
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
                warn!(entity = index, "simple member has no render binding, skipping");
                continue;
            };
            let Some(geometry) = registry.scene.geometries.get(index) else {
                warn!(entity = index, "simple member has no geometry component, skipping");
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
                instance_count: 1,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{CameraBinding, RenderBinding};
    use ember_core::{
        BindGroupHandle, CameraComponent, Component, Entity, GeometryComponent, MaterialComponent,
        PipelineHandle, ShaderHandle, SpriteComponent, TransformComponent, UniformBufferHandle,
        VertexBufferHandle,
    };
    use glam::{Mat4, Vec3};

    const PLAYER: EntityId = EntityId::new(0);

    const CAMERA_UBO: UniformBufferHandle = UniformBufferHandle(0);
    const PLAYER_MATERIAL_UBO: UniformBufferHandle = UniformBufferHandle(1);
    const PLAYER_TRANSFORM_UBO: UniformBufferHandle = UniformBufferHandle(2);

    fn player_binding() -> RenderBinding {
        RenderBinding {
            pipeline: PipelineHandle(0),
            material_group: BindGroupHandle(1),
            transform_group: BindGroupHandle(2),
            material_ubo: PLAYER_MATERIAL_UBO,
            transform_ubo: PLAYER_TRANSFORM_UBO,
            vertex_buffer: VertexBufferHandle(0),
        }
    }

    fn player_registry() -> Registry {
        let mut registry = Registry::new(8);
        registry.scene.submit_entity(Entity::new(PLAYER, "Player"));
        registry
            .scene
            .attach(
                PLAYER,
                Component::Camera(CameraComponent::new(
                    Mat4::IDENTITY,
                    Mat4::IDENTITY,
                    Vec3::new(0.0, 0.0, -3.0),
                )),
            )
            .unwrap();
        registry
            .scene
            .attach(
                PLAYER,
                Component::Sprite(SpriteComponent::new(
                    Vec3::new(100.0, 100.0, 0.0),
                    Vec3::new(30.0, 30.0, 1.0),
                )),
            )
            .unwrap();
        registry
            .scene
            .attach(
                PLAYER,
                Component::Material(MaterialComponent::with_color(
                    ShaderHandle(0),
                    Vec3::new(1.0, 0.7, 0.2),
                )),
            )
            .unwrap();
        registry
            .scene
            .attach(PLAYER, Component::Geometry(GeometryComponent::square(1)))
            .unwrap();
        registry
            .scene
            .attach(PLAYER, Component::Transform(TransformComponent::identity(1)))
            .unwrap();

        registry.submit_camera_binding(CameraBinding {
            group: BindGroupHandle(0),
            ubo: CAMERA_UBO,
        });
        registry.submit_binding(PLAYER, player_binding());
        registry
    }

    #[test]
    fn test_camera_writes_cover_projection_view_position() {
        let registry = player_registry();
        let mut system = SimpleSystem::new();
        system.collect(&registry.scene);

        let mut commands = FrameCommands::new();
        system.update_buffers(&registry, &mut commands).unwrap();

        let camera_writes: Vec<_> = commands
            .writes()
            .filter(|(write, _)| write.buffer == CAMERA_UBO)
            .map(|(write, bytes)| (write.offset, bytes.len()))
            .collect();
        assert_eq!(camera_writes, vec![(0, 64), (64, 64), (128, 12)]);
    }

    #[test]
    fn test_member_buffers_are_written() {
        let registry = player_registry();
        let mut system = SimpleSystem::new();
        system.collect(&registry.scene);
        assert_eq!(system.members(), &[PLAYER]);

        let mut commands = FrameCommands::new();
        system.update_buffers(&registry, &mut commands).unwrap();

        let material: Vec<_> = commands
            .writes()
            .filter(|(write, _)| write.buffer == PLAYER_MATERIAL_UBO)
            .collect();
        assert_eq!(material.len(), 1);
        assert_eq!(material[0].1, bytemuck::bytes_of(&Vec3::new(1.0, 0.7, 0.2)));

        let transform: Vec<_> = commands
            .writes()
            .filter(|(write, _)| write.buffer == PLAYER_TRANSFORM_UBO)
            .collect();
        assert_eq!(transform.len(), 1);
        assert_eq!(transform[0].1.len(), 16 * 4);
    }

    #[test]
    fn test_draw_uses_binding_descriptor() {
        let registry = player_registry();
        let mut system = SimpleSystem::new();
        system.collect(&registry.scene);

        let mut commands = FrameCommands::new();
        system.run(&registry, &mut commands).unwrap();

        assert_eq!(commands.draw_count(), 1);
        let draw = commands.draws()[0];
        assert_eq!(draw.pipeline, PipelineHandle(0));
        assert_eq!(draw.vertex_count, 6);
        assert_eq!(draw.instance_count, 1);
        assert_eq!(draw.vertex_buffer, VertexBufferHandle(0));
        assert_eq!(draw.bind_groups[GROUP_CAMERA as usize], Some(BindGroupHandle(0)));
        assert_eq!(draw.bind_groups[GROUP_MATERIAL as usize], Some(BindGroupHandle(1)));
        assert_eq!(draw.bind_groups[GROUP_TRANSFORM as usize], Some(BindGroupHandle(2)));
    }

    #[test]
    fn test_missing_camera_aborts_frame_update() {
        let mut registry = player_registry();
        registry.scene.cameras.reset(PLAYER.index());

        let mut system = SimpleSystem::new();
        system.collect(&registry.scene);

        let mut commands = FrameCommands::new();
        let err = system.update_buffers(&registry, &mut commands).unwrap_err();
        assert_eq!(err, FrameError::MissingCamera);
    }

    #[test]
    fn test_member_without_material_is_skipped_not_fatal() {
        let mut registry = player_registry();
        registry.scene.materials.reset(PLAYER.index());

        let mut system = SimpleSystem::new();
        system.collect(&registry.scene);

        let mut commands = FrameCommands::new();
        system.update_buffers(&registry, &mut commands).unwrap();

        // Camera still written; the member's own uploads are skipped.
        assert!(commands
            .writes()
            .all(|(write, _)| write.buffer == CAMERA_UBO));
    }
}
