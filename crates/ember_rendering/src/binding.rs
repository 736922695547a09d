//! # Render Bindings
//!
//! Per-entity binding descriptors, computed once at scene setup and stored
//! alongside the entity. The render loop reads which pipeline, bind groups
//! and buffers apply to an entity from here, so drawing stays label-agnostic.

use ember_core::{BindGroupHandle, PipelineHandle, UniformBufferHandle, VertexBufferHandle};

/// Bind-group slot for the shared camera.
pub const GROUP_CAMERA: u32 = 0;
/// Bind-group slot for the entity's material.
pub const GROUP_MATERIAL: u32 = 1;
/// Bind-group slot for the entity's transform(s).
pub const GROUP_TRANSFORM: u32 = 2;

/// Which GPU resources draw one entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderBinding {
    /// Pipeline the entity is drawn with.
    pub pipeline: PipelineHandle,
    /// Bind group carrying the material uniform.
    pub material_group: BindGroupHandle,
    /// Bind group carrying the transform buffer.
    pub transform_group: BindGroupHandle,
    /// Uniform buffer receiving the albedo each frame.
    pub material_ubo: UniformBufferHandle,
    /// Buffer receiving the flattened model matrices each frame.
    pub transform_ubo: UniformBufferHandle,
    /// Vertex buffer holding the entity's geometry.
    pub vertex_buffer: VertexBufferHandle,
}

/// GPU resources of the shared camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraBinding {
    /// Bind group carrying the camera uniform.
    pub group: BindGroupHandle,
    /// Uniform buffer receiving projection/view/position each frame.
    pub ubo: UniformBufferHandle,
}
