//! # Spatial Grid
//!
//! Broad-phase partition of all sprite-bearing entities into a fixed N x M
//! grid of axis-aligned cells. Bounds the number of pairs the collision
//! system has to test: only entities sharing a cell are candidates.
//!
//! The grid is rebuilt from scratch every frame (clear-then-reinsert).
//! Incremental updates would be cheaper for mostly-static scenes but are
//! wrong under arbitrary per-frame movement; O(entities) rebuild keeps the
//! partition trivially correct.

use glam::Vec3;
use tracing::warn;

use super::{FrameData, SupportSystem, TickContext, Viewport};
use crate::ecs::{ComponentKind, EntityId, SceneRegistry};

/// Integer cell coordinates: `(floor(x / cell_width), floor(y / cell_height))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellKey(pub i32, pub i32);

/// Broad-phase spatial partitioning over sprite-bearing entities.
pub struct SpatialGridSystem {
    members: Vec<EntityId>,
    rows: u32,
    cols: u32,
    cell_width: f32,
    cell_height: f32,
}

impl SpatialGridSystem {
    /// Creates an N x M grid (`rows` x `cols`) covering the viewport.
    #[must_use]
    pub fn new(rows: u32, cols: u32, viewport: Viewport) -> Self {
        let mut system = Self {
            members: Vec::new(),
            rows: rows.max(1),
            cols: cols.max(1),
            cell_width: 0.0,
            cell_height: 0.0,
        };
        system.on_resize(viewport);
        system
    }

    /// Recomputes cell dimensions. Called only when the surface resizes;
    /// cell sizes are stable between resizes.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.cell_width = viewport.width / self.cols as f32;
        self.cell_height = viewport.height / self.rows as f32;
    }

    /// Cell width in pixels.
    #[inline]
    #[must_use]
    pub const fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Cell height in pixels.
    #[inline]
    #[must_use]
    pub const fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// The cell key for a world position.
    #[inline]
    #[must_use]
    pub fn cell_key(&self, position: Vec3) -> CellKey {
        CellKey(
            (position.x / self.cell_width).floor() as i32,
            (position.y / self.cell_height).floor() as i32,
        )
    }

    fn insert(frame: &mut FrameData, key: CellKey, id: EntityId) {
        let cell = frame.cells.entry(key).or_default();
        // Several instances of one entity can land in the same cell; the
        // cell list carries each entity at most once.
        if !cell.contains(&id) {
            cell.push(id);
        }
    }

    fn assign_cells(&self, scene: &SceneRegistry, frame: &mut FrameData, id: EntityId) {
        let index = id.index();
        if let Some(sprite) = scene.sprites.get(index) {
            Self::insert(frame, self.cell_key(sprite.position), id);
        } else if let Some(sprite) = scene.instanced_sprites.get(index) {
            for &position in &sprite.positions {
                Self::insert(frame, self.cell_key(position), id);
            }
        } else {
            warn!(entity = index, "grid member has no sprite component, skipping");
        }
    }
}

impl SupportSystem for SpatialGridSystem {
    fn collect(&mut self, scene: &SceneRegistry) {
        self.members.clear();
        for entity in scene.entities() {
            if entity.has(ComponentKind::Sprite) || entity.has(ComponentKind::InstancedSprite) {
                self.members.push(entity.id);
            }
        }
    }

    fn run(&mut self, scene: &mut SceneRegistry, _ctx: &mut TickContext<'_>, frame: &mut FrameData) {
        frame.cells.clear();
        for &id in &self.members {
            self.assign_cells(scene, frame, id);
        }
    }
}
