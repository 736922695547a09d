//! # Entity Management
//!
//! Entities are an identity plus a record of which components are attached.
//! They carry no behavior of their own; all data lives in the per-kind
//! component storages of the [`SceneRegistry`](super::registry::SceneRegistry).

use super::component::ComponentKind;

/// Stable identifier for an entity.
///
/// Entity handles are dense small integers enumerated at scene-build time
/// (e.g. player = 0, level = 1), not generated at runtime. The id doubles as
/// the index into every per-kind component storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates an entity id from its dense index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the dense index of this entity.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// An entity: identity, human-readable label, and attached-component mask.
///
/// Component lookup is by kind, not by label string. The mask answers
/// "does this entity own a Sprite component?" in one bit test, which is
/// what the per-frame system scans run on.
#[derive(Clone, Debug)]
pub struct Entity {
    /// The stable identifier for this entity.
    pub id: EntityId,
    /// Human-readable label, used only for diagnostics.
    pub label: String,
    /// Bitmask of attached component kinds.
    component_mask: u64,
}

impl Entity {
    /// Creates a new entity with no components attached.
    #[must_use]
    pub fn new(id: EntityId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            component_mask: 0,
        }
    }

    /// Checks whether a component of the given kind is attached.
    #[inline]
    #[must_use]
    pub const fn has(&self, kind: ComponentKind) -> bool {
        (self.component_mask & kind.bit()) != 0
    }

    /// Marks a component kind as attached.
    #[inline]
    pub fn attach(&mut self, kind: ComponentKind) {
        self.component_mask |= kind.bit();
    }

    /// Marks a component kind as detached.
    #[inline]
    pub fn detach(&mut self, kind: ComponentKind) {
        self.component_mask &= !kind.bit();
    }

    /// True if the entity owns a Sprite or InstancedSprite component, which
    /// makes it eligible for spatial partitioning and collision.
    #[inline]
    #[must_use]
    pub const fn is_collidable(&self) -> bool {
        self.has(ComponentKind::Sprite) || self.has(ComponentKind::InstancedSprite)
    }

    /// True if the entity owns a Geometry component, which makes it eligible
    /// for rendering.
    #[inline]
    #[must_use]
    pub const fn is_renderable(&self) -> bool {
        self.has(ComponentKind::Geometry)
    }
}
