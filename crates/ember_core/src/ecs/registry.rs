//! # Scene Registry
//!
//! The CPU half of the resource registry: entities plus one dense storage
//! per component kind, all behind stable integer ids. A single instance is
//! owned by the frame driver and borrowed by every system - there is no
//! global state, which keeps tests isolated to a fresh registry each.

use super::component::{
    CameraComponent, Component, ComponentKind, GeometryComponent, InstancedPhysicsComponent,
    InstancedSpriteComponent, MaterialComponent, PhysicsComponent, SpriteComponent,
    TransformComponent,
};
use super::entity::{Entity, EntityId};
use super::storage::ComponentStorage;
use crate::error::{ConfigError, RegistryError};

/// Entities and per-kind component storages.
///
/// Storages are public so that systems can take disjoint mutable borrows
/// of the kinds they work on (e.g. physics mutates sprites, physics and
/// transforms of one entity in the same pass).
pub struct SceneRegistry {
    capacity: usize,
    entities: Vec<Option<Entity>>,

    // =========================================================================
    // Component storages - one per kind
    // =========================================================================
    /// Camera components.
    pub cameras: ComponentStorage<CameraComponent>,
    /// Material components.
    pub materials: ComponentStorage<MaterialComponent>,
    /// Geometry components.
    pub geometries: ComponentStorage<GeometryComponent>,
    /// Single-sprite components.
    pub sprites: ComponentStorage<SpriteComponent>,
    /// Instanced-sprite components.
    pub instanced_sprites: ComponentStorage<InstancedSpriteComponent>,
    /// Single-sprite physics components.
    pub physics: ComponentStorage<PhysicsComponent>,
    /// Instanced physics components.
    pub instanced_physics: ComponentStorage<InstancedPhysicsComponent>,
    /// Transform components.
    pub transforms: ComponentStorage<TransformComponent>,
}

impl SceneRegistry {
    /// Creates an empty registry for at most `capacity` entities.
    ///
    /// All storage is allocated here; nothing grows afterwards.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut entities = Vec::with_capacity(capacity);
        entities.resize_with(capacity, || None);
        Self {
            capacity,
            entities,
            cameras: ComponentStorage::new(capacity),
            materials: ComponentStorage::new(capacity),
            geometries: ComponentStorage::new(capacity),
            sprites: ComponentStorage::new(capacity),
            instanced_sprites: ComponentStorage::new(capacity),
            physics: ComponentStorage::new(capacity),
            instanced_physics: ComponentStorage::new(capacity),
            transforms: ComponentStorage::new(capacity),
        }
    }

    /// Maximum number of entities.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts or overwrites the entity slot at its id.
    ///
    /// # Panics
    ///
    /// Panics if the id is outside the fixed capacity; ids are enumerated
    /// at build time, so this is a setup bug.
    pub fn submit_entity(&mut self, entity: Entity) {
        let index = entity.id.index();
        assert!(
            index < self.capacity,
            "entity id {index} exceeds registry capacity {}",
            self.capacity
        );
        self.entities[index] = Some(entity);
    }

    /// The entity with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OutOfRange`] if no entity was submitted
    /// under this id.
    pub fn entity(&self, id: EntityId) -> Result<&Entity, RegistryError> {
        self.entities
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(RegistryError::OutOfRange {
                kind: "entity",
                handle: id.index(),
                capacity: self.capacity,
            })
    }

    /// Iterates all registered entities, for once-per-frame system scans.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter_map(Option::as_ref)
    }

    /// Attaches a component to an entity: stores the payload in its kind's
    /// storage slot and sets the entity's mask bit.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OutOfRange`] if the entity does not exist.
    pub fn attach(&mut self, id: EntityId, component: Component) -> Result<(), RegistryError> {
        let index = id.index();
        let kind = component.kind();
        let entity = self
            .entities
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(RegistryError::OutOfRange {
                kind: "entity",
                handle: index,
                capacity: self.capacity,
            })?;
        entity.attach(kind);

        match component {
            Component::Camera(camera) => self.cameras.set(index, camera),
            Component::Material(material) => self.materials.set(index, material),
            Component::Geometry(geometry) => self.geometries.set(index, geometry),
            Component::Sprite(sprite) => self.sprites.set(index, sprite),
            Component::InstancedSprite(sprite) => self.instanced_sprites.set(index, sprite),
            Component::Physics(physics) => self.physics.set(index, physics),
            Component::InstancedPhysics(physics) => self.instanced_physics.set(index, physics),
            Component::Transform(transform) => self.transforms.set(index, transform),
        }
        Ok(())
    }

    /// Removes an entity and every component attached to it, freeing the
    /// slot for reuse. Systems cache membership at collect time, so they
    /// must re-collect after a despawn.
    ///
    /// Returns `false` if no entity was registered under this id.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let index = id.index();
        let Some(slot) = self.entities.get_mut(index) else {
            return false;
        };
        if slot.take().is_none() {
            return false;
        }
        self.cameras.reset(index);
        self.materials.reset(index);
        self.geometries.reset(index);
        self.sprites.reset(index);
        self.instanced_sprites.reset(index);
        self.physics.reset(index);
        self.instanced_physics.reset(index);
        self.transforms.reset(index);
        true
    }

    /// The shared camera. Exactly one is expected per scene; if several are
    /// registered the lowest entity id wins.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingCamera`] if no entity carries one.
    pub fn camera(&self) -> Result<&CameraComponent, RegistryError> {
        self.cameras
            .iter()
            .next()
            .map(|(_, camera)| camera)
            .ok_or(RegistryError::MissingCamera)
    }

    /// Cross-checks component wiring after scene setup.
    ///
    /// Verifies that every entity pairing a Geometry with a sprite agrees
    /// on the instance count, and that transforms carry one matrix per
    /// instance. Malformed wiring aborts setup here instead of surfacing
    /// as a stale or short GPU buffer mid-frame.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for entity in self.entities() {
            let index = entity.id.index();
            let Some(geometry) = self.geometries.get(index) else {
                continue;
            };

            let sprite_instances = if entity.has(ComponentKind::InstancedSprite) {
                self.instanced_sprites
                    .get(index)
                    .map(InstancedSpriteComponent::instance_count)
            } else if entity.has(ComponentKind::Sprite) {
                self.sprites.get(index).map(|_| 1)
            } else {
                None
            };

            if let Some(sprite_instances) = sprite_instances {
                if geometry.instance_count != sprite_instances {
                    return Err(ConfigError::InstanceCountMismatch {
                        label: entity.label.clone(),
                        geometry: geometry.instance_count,
                        sprite: sprite_instances,
                    });
                }
            }

            if let Some(transform) = self.transforms.get(index) {
                if transform.instance_count() != geometry.instance_count {
                    return Err(ConfigError::InstanceCountMismatch {
                        label: entity.label.clone(),
                        geometry: geometry.instance_count,
                        sprite: transform.instance_count(),
                    });
                }
            }
        }
        Ok(())
    }
}
