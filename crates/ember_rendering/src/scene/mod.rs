//! # Scene Setup
//!
//! Builds the demo scene: a player sprite and a level of instanced
//! platforms. Setup happens in two steps per game object, mirroring the
//! component lifecycle:
//!
//! 1. `prepare` - pure CPU: components into the registry under their
//!    build-time ids, validated before anything touches the GPU.
//! 2. `load_assets` - GPU objects: shader modules, buffers, bind groups,
//!    pipelines, and the per-entity binding descriptors the render loop
//!    dispatches on.
//!
//! Every handle used below is a build-time constant in [`assets`].

pub mod level;
pub mod player;

use ember_core::{
    CameraComponent, EntityId, GeometryComponent, RegistryError, Viewport,
};

use crate::binding::CameraBinding;
use crate::error::SetupError;
use crate::gpu::pipeline::{
    buffer_bind_group, storage_bind_group_layout, uniform_bind_group_layout,
};
use crate::registry::Registry;

/// Build-time handles for every entity and GPU resource in the scene.
pub mod assets {
    use ember_core::{
        BindGroupHandle, BindGroupLayoutHandle, EntityId, PipelineHandle, ShaderHandle,
        UniformBufferHandle, VertexBufferHandle,
    };

    /// The player entity.
    pub const PLAYER: EntityId = EntityId::new(0);
    /// The level entity.
    pub const LEVEL: EntityId = EntityId::new(1);

    /// Shader drawing single sprites.
    pub const SPRITE_SHADER: ShaderHandle = ShaderHandle(0);
    /// Shader drawing instanced sprites.
    pub const INSTANCED_SPRITE_SHADER: ShaderHandle = ShaderHandle(1);

    /// Camera uniform buffer: projection + view + position.
    pub const CAMERA_UBO: UniformBufferHandle = UniformBufferHandle(0);
    /// Player albedo uniform buffer.
    pub const PLAYER_MATERIAL_UBO: UniformBufferHandle = UniformBufferHandle(1);
    /// Player model matrix uniform buffer.
    pub const PLAYER_TRANSFORM_UBO: UniformBufferHandle = UniformBufferHandle(2);
    /// Level albedo uniform buffer.
    pub const LEVEL_MATERIAL_UBO: UniformBufferHandle = UniformBufferHandle(3);
    /// Level per-instance transform buffer (storage usage).
    pub const LEVEL_TRANSFORM_UBO: UniformBufferHandle = UniformBufferHandle(4);

    /// Layout of the camera bind group.
    pub const CAMERA_LAYOUT: BindGroupLayoutHandle = BindGroupLayoutHandle(0);
    /// Layout of material bind groups.
    pub const MATERIAL_LAYOUT: BindGroupLayoutHandle = BindGroupLayoutHandle(1);
    /// Layout of single-transform bind groups.
    pub const TRANSFORM_LAYOUT: BindGroupLayoutHandle = BindGroupLayoutHandle(2);
    /// Layout of per-instance transform bind groups.
    pub const INSTANCE_TRANSFORM_LAYOUT: BindGroupLayoutHandle = BindGroupLayoutHandle(3);

    /// Camera bind group.
    pub const CAMERA_GROUP: BindGroupHandle = BindGroupHandle(0);
    /// Player material bind group.
    pub const PLAYER_MATERIAL_GROUP: BindGroupHandle = BindGroupHandle(1);
    /// Player transform bind group.
    pub const PLAYER_TRANSFORM_GROUP: BindGroupHandle = BindGroupHandle(2);
    /// Level material bind group.
    pub const LEVEL_MATERIAL_GROUP: BindGroupHandle = BindGroupHandle(3);
    /// Level transform bind group.
    pub const LEVEL_TRANSFORM_GROUP: BindGroupHandle = BindGroupHandle(4);

    /// Pipeline for single sprites.
    pub const SIMPLE_PIPELINE: PipelineHandle = PipelineHandle(0);
    /// Pipeline for instanced sprites.
    pub const BATCH_PIPELINE: PipelineHandle = PipelineHandle(1);

    /// Player square vertices.
    pub const PLAYER_VERTICES: VertexBufferHandle = VertexBufferHandle(0);
    /// Level square vertices.
    pub const LEVEL_VERTICES: VertexBufferHandle = VertexBufferHandle(1);
}

/// Size of the camera uniform buffer: two 4x4 matrices plus a vec3 and
/// struct padding.
pub const CAMERA_UBO_SIZE: u64 = 144;
/// Size of a flat-color material uniform buffer.
pub const MATERIAL_UBO_SIZE: u64 = 12;
/// Size of one flattened model matrix.
pub const MATRIX_SIZE: u64 = 64;

/// Bind-group layouts shared by both pipelines, created once and moved
/// into the registry after every dependent object exists.
pub struct SharedLayouts {
    /// Camera uniform layout (vertex stage).
    pub camera: wgpu::BindGroupLayout,
    /// Material uniform layout (fragment stage).
    pub material: wgpu::BindGroupLayout,
    /// Single-transform uniform layout (vertex stage).
    pub transform: wgpu::BindGroupLayout,
    /// Per-instance transform storage layout (vertex stage).
    pub instance_transform: wgpu::BindGroupLayout,
}

impl SharedLayouts {
    /// Creates the four shared layouts.
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            camera: uniform_bind_group_layout(device, "camera layout", wgpu::ShaderStages::VERTEX),
            material: uniform_bind_group_layout(
                device,
                "material layout",
                wgpu::ShaderStages::FRAGMENT,
            ),
            transform: uniform_bind_group_layout(
                device,
                "transform layout",
                wgpu::ShaderStages::VERTEX,
            ),
            instance_transform: storage_bind_group_layout(
                device,
                "instance transform layout",
                wgpu::ShaderStages::VERTEX,
            ),
        }
    }
}

/// Builds the whole scene: components, validation, GPU resources,
/// binding descriptors.
///
/// The camera's matrices are handed in ready-made; projection math is the
/// platform layer's business.
///
/// # Errors
///
/// Returns a [`SetupError`] on malformed component wiring; nothing is
/// drawn from a scene that failed validation.
pub fn build(
    registry: &mut Registry,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    camera: CameraComponent,
    viewport: Viewport,
) -> Result<(), SetupError> {
    player::prepare(registry, camera, viewport)?;
    level::prepare(registry, viewport)?;
    registry.scene.validate()?;

    let layouts = SharedLayouts::new(device);

    // Camera: one UBO + one bind group shared by every pipeline.
    let camera_ubo = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("camera ubo"),
        size: CAMERA_UBO_SIZE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let camera_group = buffer_bind_group(device, "camera group", &layouts.camera, &camera_ubo);
    registry.submit_uniform_buffer(assets::CAMERA_UBO, camera_ubo);
    registry.submit_bind_group(assets::CAMERA_GROUP, camera_group);
    registry.submit_camera_binding(CameraBinding {
        group: assets::CAMERA_GROUP,
        ubo: assets::CAMERA_UBO,
    });

    player::load_assets(registry, device, queue, surface_format, &layouts)?;
    level::load_assets(registry, device, queue, surface_format, &layouts)?;

    registry.submit_bind_group_layout(assets::CAMERA_LAYOUT, layouts.camera);
    registry.submit_bind_group_layout(assets::MATERIAL_LAYOUT, layouts.material);
    registry.submit_bind_group_layout(assets::TRANSFORM_LAYOUT, layouts.transform);
    registry.submit_bind_group_layout(assets::INSTANCE_TRANSFORM_LAYOUT, layouts.instance_transform);
    Ok(())
}

/// Clones an entity's geometry out of the scene so GPU objects can be
/// built from it while the registry is mutably borrowed.
pub(crate) fn geometry_of(
    registry: &Registry,
    id: EntityId,
) -> Result<GeometryComponent, SetupError> {
    registry
        .scene
        .geometries
        .get(id.index())
        .cloned()
        .ok_or(SetupError::Registry(RegistryError::OutOfRange {
            kind: "geometry-component",
            handle: id.index(),
            capacity: registry.scene.capacity(),
        }))
}
