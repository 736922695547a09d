//! # Resource Handles
//!
//! Typed handles for every GPU-side resource pool. Handles are dense small
//! integers enumerated at scene-build time; the registry's capacity for each
//! pool is therefore fixed and known ahead of time.
//!
//! The types live in the core crate (they are plain integers) so that CPU-side
//! components such as [`MaterialComponent`](crate::ecs::MaterialComponent) can
//! reference GPU resources without this crate depending on any graphics API.

macro_rules! declare_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        pub struct $name(pub u16);

        impl $name {
            /// Returns the dense pool index of this handle.
            #[inline]
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

declare_handle!(
    /// Handle to a compiled shader module.
    ShaderHandle
);
declare_handle!(
    /// Handle to a render pipeline.
    PipelineHandle
);
declare_handle!(
    /// Handle to a bind-group layout.
    BindGroupLayoutHandle
);
declare_handle!(
    /// Handle to a bind group.
    BindGroupHandle
);
declare_handle!(
    /// Handle to a uniform (or per-instance storage) buffer.
    UniformBufferHandle
);
declare_handle!(
    /// Handle to a vertex buffer.
    VertexBufferHandle
);
declare_handle!(
    /// Handle to a texture.
    TextureHandle
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_index() {
        assert_eq!(ShaderHandle(3).index(), 3);
        assert_eq!(UniformBufferHandle(0).index(), 0);
    }
}
