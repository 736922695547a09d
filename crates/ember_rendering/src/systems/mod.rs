//! # Render Systems
//!
//! Two cooperating systems, both driven once per frame after the support
//! systems finish: the simple system draws entities with a single sprite,
//! the batch system draws instanced sprites with one draw call per entity.
//!
//! Both implement the same capability interface and only ever record into
//! the frame command list - the wgpu executor is the one place that touches
//! the device.

mod batch;
mod simple;

pub use batch::BatchSystem;
pub use simple::SimpleSystem;

use ember_core::SceneRegistry;

use crate::error::FrameError;
use crate::frame::FrameCommands;
use crate::registry::Registry;

/// A rendering system: collects member entities, updates GPU-bound buffers,
/// then issues draws.
pub trait RenderSystem {
    /// Scans the registry and caches member entities by structural match.
    /// Called at construction and again after entities are despawned.
    fn collect(&mut self, scene: &SceneRegistry);

    /// Records this frame's buffer writes.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::MissingCamera`] if the scene has no shared
    /// camera; the frame's submission is aborted.
    fn update_buffers(
        &self,
        registry: &Registry,
        commands: &mut FrameCommands,
    ) -> Result<(), FrameError>;

    /// Records this frame's draw calls.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::MissingCamera`] if the camera binding is
    /// missing; the frame's submission is aborted.
    fn run(&self, registry: &Registry, commands: &mut FrameCommands) -> Result<(), FrameError>;
}
