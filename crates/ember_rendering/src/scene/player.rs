//! # Player Setup
//!
//! One physics-driven sprite at the viewport center, drawn by the simple
//! pipeline and steered by the keyboard.

use glam::{Mat4, Vec3};

use ember_core::{
    CameraComponent, Component, Entity, GeometryComponent, MaterialComponent, PhysicsComponent,
    SpriteComponent, TransformComponent, Viewport,
};

use super::{assets, geometry_of, SharedLayouts, MATERIAL_UBO_SIZE, MATRIX_SIZE};
use crate::binding::RenderBinding;
use crate::error::SetupError;
use crate::gpu::pipeline::{buffer_bind_group, sprite_pipeline};
use crate::gpu::shaders::SPRITE_SHADER;
use crate::registry::Registry;

const PLAYER_SIZE: Vec3 = Vec3::new(30.0, 30.0, 1.0);
const PLAYER_COLOR: Vec3 = Vec3::new(1.0, 0.7, 0.2);
const PLAYER_MASS: f32 = 1.0;

/// Registers the player entity and its components. The shared camera rides
/// on the player, handed in ready-made by the platform layer.
///
/// # Errors
///
/// Returns a [`SetupError`] if a component is malformed.
pub fn prepare(
    registry: &mut Registry,
    camera: CameraComponent,
    viewport: Viewport,
) -> Result<(), SetupError> {
    let position = Vec3::new(viewport.width / 2.0, viewport.height / 2.0, 0.0);

    registry
        .scene
        .submit_entity(Entity::new(assets::PLAYER, "Player"));
    registry.scene.attach(assets::PLAYER, Component::Camera(camera))?;
    registry.scene.attach(
        assets::PLAYER,
        Component::Geometry(GeometryComponent::square(1)),
    )?;
    registry.scene.attach(
        assets::PLAYER,
        Component::Material(MaterialComponent::with_color(
            assets::SPRITE_SHADER,
            PLAYER_COLOR,
        )),
    )?;
    registry.scene.attach(
        assets::PLAYER,
        Component::Sprite(SpriteComponent::new(position, PLAYER_SIZE)),
    )?;
    registry.scene.attach(
        assets::PLAYER,
        Component::Physics(PhysicsComponent::new(PLAYER_MASS, Vec3::ZERO, Vec3::ZERO)?),
    )?;
    registry.scene.attach(
        assets::PLAYER,
        Component::Transform(TransformComponent::new(vec![
            Mat4::from_translation(position) * Mat4::from_scale(PLAYER_SIZE),
        ])),
    )?;
    Ok(())
}

/// Creates the player's GPU resources and binding descriptor.
///
/// # Errors
///
/// Returns a [`SetupError`] if the player was not prepared first.
pub fn load_assets(
    registry: &mut Registry,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    layouts: &SharedLayouts,
) -> Result<(), SetupError> {
    let geometry = geometry_of(registry, assets::PLAYER)?;

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("sprite shader"),
        source: wgpu::ShaderSource::Wgsl(SPRITE_SHADER.into()),
    });

    let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("player vertices"),
        size: geometry.byte_length() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    queue.write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(&geometry.vertices));

    let material_ubo = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("player material ubo"),
        size: MATERIAL_UBO_SIZE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let transform_ubo = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("player transform ubo"),
        size: MATRIX_SIZE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let material_group = buffer_bind_group(
        device,
        "player material group",
        &layouts.material,
        &material_ubo,
    );
    let transform_group = buffer_bind_group(
        device,
        "player transform group",
        &layouts.transform,
        &transform_ubo,
    );

    let pipeline = sprite_pipeline(
        device,
        "simple sprite pipeline",
        &shader,
        &[&layouts.camera, &layouts.material, &layouts.transform],
        &geometry.layout,
        surface_format,
    );

    registry.submit_shader(assets::SPRITE_SHADER, shader);
    registry.submit_vertex_buffer(assets::PLAYER_VERTICES, vertex_buffer);
    registry.submit_uniform_buffer(assets::PLAYER_MATERIAL_UBO, material_ubo);
    registry.submit_uniform_buffer(assets::PLAYER_TRANSFORM_UBO, transform_ubo);
    registry.submit_bind_group(assets::PLAYER_MATERIAL_GROUP, material_group);
    registry.submit_bind_group(assets::PLAYER_TRANSFORM_GROUP, transform_group);
    registry.submit_pipeline(assets::SIMPLE_PIPELINE, pipeline);

    registry.submit_binding(
        assets::PLAYER,
        RenderBinding {
            pipeline: assets::SIMPLE_PIPELINE,
            material_group: assets::PLAYER_MATERIAL_GROUP,
            transform_group: assets::PLAYER_TRANSFORM_GROUP,
            material_ubo: assets::PLAYER_MATERIAL_UBO,
            transform_ubo: assets::PLAYER_TRANSFORM_UBO,
            vertex_buffer: assets::PLAYER_VERTICES,
        },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::ComponentKind;
    use glam::Mat4;

    #[test]
    fn test_prepare_wires_the_player() {
        let mut registry = Registry::new(8);
        let camera = CameraComponent::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO);
        prepare(&mut registry, camera, Viewport::new(800.0, 600.0)).unwrap();

        let entity = registry.scene.entity(assets::PLAYER).unwrap();
        assert!(entity.has(ComponentKind::Camera));
        assert!(entity.has(ComponentKind::Sprite));
        assert!(entity.has(ComponentKind::Physics));
        assert!(entity.is_renderable());
        assert!(entity.is_collidable());

        let sprite = registry.scene.sprites.get(assets::PLAYER.index()).unwrap();
        assert_eq!(sprite.position, Vec3::new(400.0, 300.0, 0.0));

        assert!(registry.scene.validate().is_ok());
    }
}
