//! # Resource Registry
//!
//! The single point of truth binding CPU-side component data to GPU-side
//! draw resources. One instance is owned by the frame driver and borrowed
//! by every system; there are no global managers. The scene half (entities
//! and components) lives in [`ember_core`]; this type adds the GPU pools
//! and the per-entity binding descriptors.
//!
//! Every pool is fixed-capacity with dense integer handles enumerated at
//! scene-build time. Reading a handle that was never submitted fails with
//! [`RegistryError::OutOfRange`](ember_core::RegistryError::OutOfRange).

use ember_core::{
    BindGroupHandle, BindGroupLayoutHandle, ComponentStorage, EntityId, PipelineHandle, Pool,
    RegistryError, SceneRegistry, ShaderHandle, TextureHandle, UniformBufferHandle,
    VertexBufferHandle,
};

use crate::binding::{CameraBinding, RenderBinding};

/// Fixed capacity of each GPU resource pool.
const POOL_CAPACITY: usize = 32;

/// Scene data plus GPU resource pools.
pub struct Registry {
    /// Entities and component storages.
    pub scene: SceneRegistry,

    bindings: ComponentStorage<RenderBinding>,
    camera_binding: Option<CameraBinding>,

    shaders: Pool<wgpu::ShaderModule>,
    pipelines: Pool<wgpu::RenderPipeline>,
    bind_group_layouts: Pool<wgpu::BindGroupLayout>,
    bind_groups: Pool<wgpu::BindGroup>,
    uniform_buffers: Pool<wgpu::Buffer>,
    vertex_buffers: Pool<wgpu::Buffer>,
    textures: Pool<wgpu::Texture>,
}

impl Registry {
    /// Creates an empty registry for at most `entity_capacity` entities.
    #[must_use]
    pub fn new(entity_capacity: usize) -> Self {
        Self {
            scene: SceneRegistry::new(entity_capacity),
            bindings: ComponentStorage::new(entity_capacity),
            camera_binding: None,
            shaders: Pool::new("shader", POOL_CAPACITY),
            pipelines: Pool::new("pipeline", POOL_CAPACITY),
            bind_group_layouts: Pool::new("bind-group-layout", POOL_CAPACITY),
            bind_groups: Pool::new("bind-group", POOL_CAPACITY),
            uniform_buffers: Pool::new("uniform-buffer", POOL_CAPACITY),
            vertex_buffers: Pool::new("vertex-buffer", POOL_CAPACITY),
            textures: Pool::new("texture", POOL_CAPACITY),
        }
    }

    // =========================================================================
    // Binding descriptors
    // =========================================================================

    /// Stores the binding descriptor computed for an entity at scene setup.
    pub fn submit_binding(&mut self, entity: EntityId, binding: RenderBinding) {
        self.bindings.set(entity.index(), binding);
    }

    /// The binding descriptor for an entity, if one was computed.
    #[must_use]
    pub fn binding(&self, entity: EntityId) -> Option<&RenderBinding> {
        self.bindings.get(entity.index())
    }

    /// Stores the shared camera's GPU binding.
    pub fn submit_camera_binding(&mut self, binding: CameraBinding) {
        self.camera_binding = Some(binding);
    }

    /// The shared camera's GPU binding, if set up.
    #[must_use]
    pub fn camera_binding(&self) -> Option<CameraBinding> {
        self.camera_binding
    }

    // =========================================================================
    // GPU pools - submit / get per kind
    // =========================================================================

    /// Submits a shader module.
    pub fn submit_shader(&mut self, handle: ShaderHandle, module: wgpu::ShaderModule) {
        self.shaders.submit(handle.index(), module);
    }

    /// The shader module at `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OutOfRange`] if the handle was never
    /// submitted.
    pub fn shader(&self, handle: ShaderHandle) -> Result<&wgpu::ShaderModule, RegistryError> {
        self.shaders.get(handle.index())
    }

    /// Submits a render pipeline.
    pub fn submit_pipeline(&mut self, handle: PipelineHandle, pipeline: wgpu::RenderPipeline) {
        self.pipelines.submit(handle.index(), pipeline);
    }

    /// The render pipeline at `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OutOfRange`] if the handle was never
    /// submitted.
    pub fn pipeline(&self, handle: PipelineHandle) -> Result<&wgpu::RenderPipeline, RegistryError> {
        self.pipelines.get(handle.index())
    }

    /// Submits a bind-group layout.
    pub fn submit_bind_group_layout(
        &mut self,
        handle: BindGroupLayoutHandle,
        layout: wgpu::BindGroupLayout,
    ) {
        self.bind_group_layouts.submit(handle.index(), layout);
    }

    /// The bind-group layout at `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OutOfRange`] if the handle was never
    /// submitted.
    pub fn bind_group_layout(
        &self,
        handle: BindGroupLayoutHandle,
    ) -> Result<&wgpu::BindGroupLayout, RegistryError> {
        self.bind_group_layouts.get(handle.index())
    }

    /// Submits a bind group.
    pub fn submit_bind_group(&mut self, handle: BindGroupHandle, group: wgpu::BindGroup) {
        self.bind_groups.submit(handle.index(), group);
    }

    /// The bind group at `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OutOfRange`] if the handle was never
    /// submitted.
    pub fn bind_group(&self, handle: BindGroupHandle) -> Result<&wgpu::BindGroup, RegistryError> {
        self.bind_groups.get(handle.index())
    }

    /// Submits a uniform (or per-instance storage) buffer.
    pub fn submit_uniform_buffer(&mut self, handle: UniformBufferHandle, buffer: wgpu::Buffer) {
        self.uniform_buffers.submit(handle.index(), buffer);
    }

    /// The uniform buffer at `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OutOfRange`] if the handle was never
    /// submitted.
    pub fn uniform_buffer(
        &self,
        handle: UniformBufferHandle,
    ) -> Result<&wgpu::Buffer, RegistryError> {
        self.uniform_buffers.get(handle.index())
    }

    /// Submits a vertex buffer.
    pub fn submit_vertex_buffer(&mut self, handle: VertexBufferHandle, buffer: wgpu::Buffer) {
        self.vertex_buffers.submit(handle.index(), buffer);
    }

    /// The vertex buffer at `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OutOfRange`] if the handle was never
    /// submitted.
    pub fn vertex_buffer(
        &self,
        handle: VertexBufferHandle,
    ) -> Result<&wgpu::Buffer, RegistryError> {
        self.vertex_buffers.get(handle.index())
    }

    /// Submits a texture.
    pub fn submit_texture(&mut self, handle: TextureHandle, texture: wgpu::Texture) {
        self.textures.submit(handle.index(), texture);
    }

    /// The texture at `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OutOfRange`] if the handle was never
    /// submitted.
    pub fn texture(&self, handle: TextureHandle) -> Result<&wgpu::Texture, RegistryError> {
        self.textures.get(handle.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{CameraBinding, RenderBinding};

    fn binding() -> RenderBinding {
        RenderBinding {
            pipeline: PipelineHandle(0),
            material_group: BindGroupHandle(1),
            transform_group: BindGroupHandle(2),
            material_ubo: UniformBufferHandle(1),
            transform_ubo: UniformBufferHandle(2),
            vertex_buffer: VertexBufferHandle(0),
        }
    }

    #[test]
    fn test_binding_roundtrip() {
        let mut registry = Registry::new(8);
        let entity = EntityId::new(0);
        assert!(registry.binding(entity).is_none());

        registry.submit_binding(entity, binding());
        assert_eq!(registry.binding(entity), Some(&binding()));
    }

    #[test]
    fn test_camera_binding_roundtrip() {
        let mut registry = Registry::new(8);
        assert!(registry.camera_binding().is_none());

        let camera = CameraBinding {
            group: BindGroupHandle(0),
            ubo: UniformBufferHandle(0),
        };
        registry.submit_camera_binding(camera);
        assert_eq!(registry.camera_binding(), Some(camera));
    }

    #[test]
    fn test_unsubmitted_pipeline_fails_loudly() {
        let registry = Registry::new(8);
        let err = registry.pipeline(PipelineHandle(99)).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::OutOfRange {
                kind: "pipeline",
                handle: 99,
                ..
            }
        ));
    }
}
