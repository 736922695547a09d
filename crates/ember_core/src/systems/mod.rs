//! # Support Systems
//!
//! The three per-frame simulation systems: physics integration, broad-phase
//! spatial partitioning, and narrow-phase collision. They run in that order,
//! mutate component data only (no GPU calls), and must all finish before any
//! render system reads component state.
//!
//! Every system implements the same small capability interface,
//! [`SupportSystem`], and communicates with the next one through the
//! per-frame [`FrameData`] blackboard.

mod collision;
mod physics;
mod spatial_grid;

use std::collections::HashMap;

pub use collision::{CollisionPair, CollisionSystem};
pub use physics::PhysicsSystem;
pub use spatial_grid::{CellKey, SpatialGridSystem};

use crate::ecs::{EntityId, SceneRegistry};
use crate::input::InputState;

/// Current drawable-surface dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport description.
    #[inline]
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Per-tick context handed to every support system.
pub struct TickContext<'a> {
    /// Seconds elapsed since the previous frame.
    pub dt: f32,
    /// Keyboard state, drained from the platform queue for this frame.
    pub input: &'a mut InputState,
    /// Current viewport.
    pub viewport: Viewport,
}

/// Per-frame data passed from one support system to the next.
///
/// Lives on the frame driver and is reused every frame: the containers are
/// cleared, not reallocated, so steady-state frames stay allocation-free.
#[derive(Debug, Default)]
pub struct FrameData {
    /// Broad-phase output: cell key to the entities occupying that cell.
    pub cells: HashMap<CellKey, Vec<EntityId>>,
    /// Narrow-phase output: entity pairs whose colliders overlap this frame.
    pub collisions: Vec<CollisionPair>,
}

impl FrameData {
    /// Creates empty frame data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// A simulation-only system: collects its member entities once, then runs
/// once per frame.
pub trait SupportSystem {
    /// Scans the registry and caches member entities by structural match.
    /// Called at construction and again after entities are despawned.
    fn collect(&mut self, scene: &SceneRegistry);

    /// Advances the system by one frame.
    fn run(&mut self, scene: &mut SceneRegistry, ctx: &mut TickContext<'_>, frame: &mut FrameData);
}
