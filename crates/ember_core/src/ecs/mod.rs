//! # Entity Component System
//!
//! Flat, frame-scoped entity/component model:
//!
//! - Entities are identities with a component bitmask; ids are dense small
//!   integers enumerated at scene-build time.
//! - Components are plain data records, one tagged union over the variant
//!   list, stored in per-kind dense arrays indexed by entity id.
//! - All storage is allocated once at registry creation; per-frame work
//!   only mutates numeric fields in place.

mod component;
mod entity;
mod registry;
mod storage;

pub use component::{
    Aabb, Albedo, AttributeFormat, BufferAttribute, BufferLayout, CameraComponent, Component,
    ComponentKind, GeometryComponent, InstancedPhysicsComponent, InstancedSpriteComponent,
    MaterialComponent, PhysicsComponent, SpriteComponent, TransformComponent, SQUARE_VERTICES,
};
pub use entity::{Entity, EntityId};
pub use registry::SceneRegistry;
pub use storage::{ComponentStorage, Pool};
