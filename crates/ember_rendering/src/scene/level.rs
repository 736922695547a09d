//! # Level Setup
//!
//! Seven static platforms as one instanced entity: one geometry, one
//! material, one concatenated transform buffer, one draw call per frame.

use glam::{Mat4, Vec3};

use ember_core::{
    Component, Entity, GeometryComponent, InstancedSpriteComponent, MaterialComponent,
    TransformComponent, Viewport,
};

use super::{assets, geometry_of, SharedLayouts, MATERIAL_UBO_SIZE, MATRIX_SIZE};
use crate::binding::RenderBinding;
use crate::error::SetupError;
use crate::gpu::pipeline::{buffer_bind_group, sprite_pipeline};
use crate::gpu::shaders::INSTANCED_SPRITE_SHADER;
use crate::registry::Registry;

/// Number of platform instances.
pub const INSTANCE_COUNT: u32 = 7;

const PLATFORM_SIZE: Vec3 = Vec3::new(90.0, 12.0, 1.0);
const LEVEL_COLOR: Vec3 = Vec3::new(0.5, 0.0, 1.0);

// Platform anchors in viewport fractions: staggered left/right columns
// climbing from the bottom of the surface.
const PLATFORM_ANCHORS: [(f32, f32); INSTANCE_COUNT as usize] = [
    (0.50, 0.90),
    (0.30, 0.70),
    (0.35, 0.45),
    (0.25, 0.20),
    (0.70, 0.70),
    (0.65, 0.45),
    (0.75, 0.20),
];

fn platform_positions(viewport: Viewport) -> Vec<Vec3> {
    PLATFORM_ANCHORS
        .iter()
        .map(|&(x, y)| Vec3::new(viewport.width * x, viewport.height * y, 0.0))
        .collect()
}

/// Registers the level entity and its components.
///
/// # Errors
///
/// Returns a [`SetupError`] if a component is malformed.
pub fn prepare(registry: &mut Registry, viewport: Viewport) -> Result<(), SetupError> {
    let positions = platform_positions(viewport);
    let sizes = vec![PLATFORM_SIZE; INSTANCE_COUNT as usize];
    let matrices: Vec<Mat4> = positions
        .iter()
        .map(|&position| Mat4::from_translation(position) * Mat4::from_scale(PLATFORM_SIZE))
        .collect();

    registry
        .scene
        .submit_entity(Entity::new(assets::LEVEL, "Level"));
    registry.scene.attach(
        assets::LEVEL,
        Component::Geometry(GeometryComponent::square(INSTANCE_COUNT)),
    )?;
    registry.scene.attach(
        assets::LEVEL,
        Component::Material(MaterialComponent::with_color(
            assets::INSTANCED_SPRITE_SHADER,
            LEVEL_COLOR,
        )),
    )?;
    registry.scene.attach(
        assets::LEVEL,
        Component::InstancedSprite(InstancedSpriteComponent::new(positions, sizes)?),
    )?;
    registry.scene.attach(
        assets::LEVEL,
        Component::Transform(TransformComponent::new(matrices)),
    )?;
    Ok(())
}

/// Creates the level's GPU resources and binding descriptor.
///
/// # Errors
///
/// Returns a [`SetupError`] if the level was not prepared first.
pub fn load_assets(
    registry: &mut Registry,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    layouts: &SharedLayouts,
) -> Result<(), SetupError> {
    let geometry = geometry_of(registry, assets::LEVEL)?;

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("instanced sprite shader"),
        source: wgpu::ShaderSource::Wgsl(INSTANCED_SPRITE_SHADER.into()),
    });

    let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("level vertices"),
        size: geometry.byte_length() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    queue.write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(&geometry.vertices));

    let material_ubo = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("level material ubo"),
        size: MATERIAL_UBO_SIZE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    // One matrix per instance, written back-to-back in a single upload
    // each frame; storage usage because the instance count is decided at
    // scene setup, not in the shader.
    let transform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("level transform buffer"),
        size: MATRIX_SIZE * u64::from(geometry.instance_count),
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let material_group = buffer_bind_group(
        device,
        "level material group",
        &layouts.material,
        &material_ubo,
    );
    let transform_group = buffer_bind_group(
        device,
        "level transform group",
        &layouts.instance_transform,
        &transform_buffer,
    );

    let pipeline = sprite_pipeline(
        device,
        "batch sprite pipeline",
        &shader,
        &[
            &layouts.camera,
            &layouts.material,
            &layouts.instance_transform,
        ],
        &geometry.layout,
        surface_format,
    );

    registry.submit_shader(assets::INSTANCED_SPRITE_SHADER, shader);
    registry.submit_vertex_buffer(assets::LEVEL_VERTICES, vertex_buffer);
    registry.submit_uniform_buffer(assets::LEVEL_MATERIAL_UBO, material_ubo);
    registry.submit_uniform_buffer(assets::LEVEL_TRANSFORM_UBO, transform_buffer);
    registry.submit_bind_group(assets::LEVEL_MATERIAL_GROUP, material_group);
    registry.submit_bind_group(assets::LEVEL_TRANSFORM_GROUP, transform_group);
    registry.submit_pipeline(assets::BATCH_PIPELINE, pipeline);

    registry.submit_binding(
        assets::LEVEL,
        RenderBinding {
            pipeline: assets::BATCH_PIPELINE,
            material_group: assets::LEVEL_MATERIAL_GROUP,
            transform_group: assets::LEVEL_TRANSFORM_GROUP,
            material_ubo: assets::LEVEL_MATERIAL_UBO,
            transform_ubo: assets::LEVEL_TRANSFORM_UBO,
            vertex_buffer: assets::LEVEL_VERTICES,
        },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::ComponentKind;

    #[test]
    fn test_prepare_wires_seven_instances() {
        let mut registry = Registry::new(8);
        prepare(&mut registry, Viewport::new(800.0, 600.0)).unwrap();

        let entity = registry.scene.entity(assets::LEVEL).unwrap();
        assert!(entity.has(ComponentKind::InstancedSprite));
        assert!(entity.is_renderable());

        let index = assets::LEVEL.index();
        let sprite = registry.scene.instanced_sprites.get(index).unwrap();
        assert_eq!(sprite.instance_count(), INSTANCE_COUNT);

        let transform = registry.scene.transforms.get(index).unwrap();
        assert_eq!(transform.flattened().len(), 16 * INSTANCE_COUNT as usize);

        assert!(registry.scene.validate().is_ok());
    }

    #[test]
    fn test_platforms_spread_across_the_viewport() {
        let positions = platform_positions(Viewport::new(800.0, 600.0));
        assert_eq!(positions.len(), INSTANCE_COUNT as usize);
        assert_eq!(positions[0], Vec3::new(400.0, 540.0, 0.0));
    }
}
