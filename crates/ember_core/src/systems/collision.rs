//! # Collision System
//!
//! Narrow-phase AABB overlap testing, restricted to entity pairs that share
//! a spatial-grid cell. Each operand contributes its own collider fields;
//! the test is symmetric by construction. The system's contract ends at
//! producing the frame's pair list - gameplay reactions belong to consumers.

use std::collections::HashSet;

use tracing::warn;

use super::{FrameData, SupportSystem, TickContext};
use crate::ecs::{Aabb, ComponentKind, EntityId, SceneRegistry};

/// One overlapping entity pair, reported once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionPair {
    /// First entity of the unordered pair (lower id).
    pub a: EntityId,
    /// Second entity of the unordered pair (higher id).
    pub b: EntityId,
}

impl CollisionPair {
    fn ordered(x: EntityId, y: EntityId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }
}

/// Narrow-phase collision detection over grid cells.
#[derive(Default)]
pub struct CollisionSystem {
    members: Vec<EntityId>,
    // Pairs already tested this frame; two entities can share more than one
    // cell and must be reported at most once.
    seen: HashSet<(EntityId, EntityId)>,
}

impl CollisionSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Member entities, in registry order.
    #[must_use]
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }

    /// The colliders an entity contributes: one for a single sprite, one
    /// per instance for an instanced sprite.
    fn colliders_of(scene: &SceneRegistry, id: EntityId) -> Option<&[Aabb]> {
        let index = id.index();
        if let Some(sprite) = scene.sprites.get(index) {
            Some(std::slice::from_ref(&sprite.collider))
        } else if let Some(sprite) = scene.instanced_sprites.get(index) {
            Some(&sprite.colliders)
        } else {
            None
        }
    }

    /// Whether any collider of `a` overlaps any collider of `b`.
    fn entities_overlap(scene: &SceneRegistry, a: EntityId, b: EntityId) -> bool {
        let Some(colliders_a) = Self::colliders_of(scene, a) else {
            warn!(entity = a.index(), "cell occupant has no sprite component");
            return false;
        };
        let Some(colliders_b) = Self::colliders_of(scene, b) else {
            warn!(entity = b.index(), "cell occupant has no sprite component");
            return false;
        };

        colliders_a
            .iter()
            .any(|box_a| colliders_b.iter().any(|box_b| box_a.overlaps(box_b)))
    }
}

impl SupportSystem for CollisionSystem {
    fn collect(&mut self, scene: &SceneRegistry) {
        self.members.clear();
        for entity in scene.entities() {
            if entity.has(ComponentKind::Sprite) || entity.has(ComponentKind::InstancedSprite) {
                self.members.push(entity.id);
            }
        }
    }

    fn run(&mut self, scene: &mut SceneRegistry, _ctx: &mut TickContext<'_>, frame: &mut FrameData) {
        frame.collisions.clear();
        self.seen.clear();

        for occupants in frame.cells.values() {
            for (slot, &a) in occupants.iter().enumerate() {
                for &b in &occupants[slot + 1..] {
                    if a == b {
                        continue;
                    }
                    let pair = CollisionPair::ordered(a, b);
                    if !self.seen.insert((pair.a, pair.b)) {
                        continue;
                    }
                    if Self::entities_overlap(scene, a, b) {
                        frame.collisions.push(pair);
                    }
                }
            }
        }
    }
}
