//! # Frame Driver
//!
//! The entry point the platform layer calls once per display refresh.
//! Owns the registry, the input state, and every system; enforces the
//! frame-ordering contract:
//!
//! physics -> spatial grid -> collision -> buffer updates -> draws -> submit
//!
//! All support systems finish before any render system reads component
//! state, and a frame's buffer writes are submitted before the next frame
//! begins its own. Everything runs synchronously inside one callback; the
//! only suspension point is the yield back to the platform between frames.

use std::sync::Arc;

use tracing::trace;

use ember_core::{
    CollisionSystem, EngineConfig, EntityId, FrameData, InputQueue, InputState, PhysicsSystem,
    SpatialGridSystem, SupportSystem, TickContext, Viewport,
};

use crate::error::FrameError;
use crate::frame::{FrameCommands, FrameStats};
use crate::gpu::{submit_frame, GpuContext};
use crate::registry::Registry;
use crate::systems::{BatchSystem, RenderSystem, SimpleSystem};

/// Owns the scene and drives one frame at a time.
pub struct Engine {
    registry: Registry,
    input: InputState,
    input_queue: Arc<InputQueue>,

    physics: PhysicsSystem,
    grid: SpatialGridSystem,
    collision: CollisionSystem,
    simple: SimpleSystem,
    batch: BatchSystem,

    frame_data: FrameData,
    commands: FrameCommands,
    viewport: Viewport,
    clear_color: wgpu::Color,
    frame_number: u64,
}

impl Engine {
    /// Creates the engine over an already-built scene. Every system
    /// collects its members here; `player` names the entity that receives
    /// input forces.
    #[must_use]
    pub fn new(
        config: &EngineConfig,
        registry: Registry,
        player: EntityId,
        viewport: Viewport,
    ) -> Self {
        let mut physics = PhysicsSystem::new(player, config);
        let mut grid = SpatialGridSystem::new(config.grid_rows, config.grid_cols, viewport);
        let mut collision = CollisionSystem::new();
        let mut simple = SimpleSystem::new();
        let mut batch = BatchSystem::new();

        physics.collect(&registry.scene);
        grid.collect(&registry.scene);
        collision.collect(&registry.scene);
        simple.collect(&registry.scene);
        batch.collect(&registry.scene);

        let [r, g, b, a] = config.clear_color;
        Self {
            registry,
            input: InputState::new(),
            input_queue: Arc::new(InputQueue::new()),
            physics,
            grid,
            collision,
            simple,
            batch,
            frame_data: FrameData::new(),
            commands: FrameCommands::new(),
            viewport,
            clear_color: wgpu::Color { r, g, b, a },
            frame_number: 0,
        }
    }

    /// The queue platform callbacks push key transitions into.
    #[must_use]
    pub fn input_queue(&self) -> Arc<InputQueue> {
        Arc::clone(&self.input_queue)
    }

    /// The resource registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the resource registry.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Re-runs every system's member collection. Call after despawning
    /// entities; membership is otherwise cached from construction.
    pub fn recollect(&mut self) {
        self.physics.collect(&self.registry.scene);
        self.grid.collect(&self.registry.scene);
        self.collision.collect(&self.registry.scene);
        self.simple.collect(&self.registry.scene);
        self.batch.collect(&self.registry.scene);
    }

    /// Notifies the engine that the drawable surface changed size.
    ///
    /// Updates the viewport and the spatial grid's cell dimensions. The
    /// platform layer recreates its depth target (see
    /// [`DepthTarget`](crate::gpu::DepthTarget)) alongside this call.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.grid.on_resize(self.viewport);
    }

    /// Runs the support systems for this frame: input drain, physics,
    /// spatial grid, collision - in that order.
    fn tick(&mut self, elapsed_seconds: f32) {
        self.input_queue.drain_into(&mut self.input);

        let mut ctx = TickContext {
            dt: elapsed_seconds,
            input: &mut self.input,
            viewport: self.viewport,
        };
        self.physics
            .run(&mut self.registry.scene, &mut ctx, &mut self.frame_data);
        self.grid
            .run(&mut self.registry.scene, &mut ctx, &mut self.frame_data);
        self.collision
            .run(&mut self.registry.scene, &mut ctx, &mut self.frame_data);
    }

    /// Records this frame's command list: every buffer update, then every
    /// draw.
    fn record(&mut self) -> Result<(), FrameError> {
        self.commands.begin_frame();
        self.simple.update_buffers(&self.registry, &mut self.commands)?;
        self.batch.update_buffers(&self.registry, &mut self.commands)?;
        self.simple.run(&self.registry, &mut self.commands)?;
        self.batch.run(&self.registry, &mut self.commands)?;
        Ok(())
    }

    /// Advances the simulation by one frame and submits it to the GPU.
    ///
    /// # Errors
    ///
    /// Returns a [`FrameError`] if the camera is missing or a handle fails
    /// to resolve. The frame submits completely or not at all; simulation
    /// state has still advanced either way.
    pub fn run_frame(
        &mut self,
        gpu: &GpuContext<'_>,
        elapsed_seconds: f32,
    ) -> Result<FrameStats, FrameError> {
        self.tick(elapsed_seconds);
        self.record()?;
        submit_frame(gpu, &self.registry, &self.commands, self.clear_color)?;

        self.frame_number += 1;
        let stats = FrameStats {
            frame_number: self.frame_number,
            draw_calls: self.commands.draw_count(),
            instances: self.commands.instance_count(),
            buffer_writes: self.commands.write_count(),
            collision_pairs: self.frame_data.collisions.len() as u32,
        };
        trace!(
            frame = stats.frame_number,
            draws = stats.draw_calls,
            instances = stats.instances,
            collisions = stats.collision_pairs,
            "frame submitted"
        );
        Ok(stats)
    }
}
