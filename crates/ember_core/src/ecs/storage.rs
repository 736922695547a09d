//! # Component and Resource Storage
//!
//! Two fixed-capacity slot containers back the registry:
//! [`ComponentStorage`] holds one component kind indexed by entity id, and
//! [`Pool`] holds arbitrary resources behind dense integer handles. Both are
//! allocated once at creation and never grow.

use crate::error::RegistryError;

/// Dense per-kind component storage, indexed by entity id.
///
/// Capacity is fixed at creation; slots for entities without this component
/// stay `None`. Attach/detach touch single slots, so per-frame mutation
/// never reallocates.
#[derive(Debug)]
pub struct ComponentStorage<T> {
    slots: Vec<Option<T>>,
}

impl<T> ComponentStorage<T> {
    /// Creates storage for `capacity` entities.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    /// Maximum number of entities this storage covers.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Inserts or overwrites the component for one entity.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the fixed capacity; entity ids are
    /// enumerated at build time, so this is a setup bug.
    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        assert!(
            index < self.slots.len(),
            "entity index {index} exceeds storage capacity {}",
            self.slots.len()
        );
        self.slots[index] = Some(value);
    }

    /// The component for one entity, if attached.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Mutable access to one entity's component, if attached.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Clears one entity's slot, returning the component if one was there.
    #[inline]
    pub fn reset(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Iterates attached components with their entity indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }
}

/// Fixed-capacity resource pool addressed by dense integer handles.
///
/// Handles are enumerated at build time, so capacity is known ahead of
/// time. Reading a handle that was never submitted fails loudly with
/// [`RegistryError::OutOfRange`] - there is no undefined-slot fallback.
#[derive(Debug)]
pub struct Pool<T> {
    kind: &'static str,
    slots: Vec<Option<T>>,
}

impl<T> Pool<T> {
    /// Creates an empty pool. `kind` names the pool in error messages.
    #[must_use]
    pub fn new(kind: &'static str, capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { kind, slots }
    }

    /// Fixed capacity of this pool.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Inserts or overwrites the slot at `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is outside the fixed capacity; handles are
    /// enumerated at build time, so this is a setup bug.
    #[inline]
    pub fn submit(&mut self, handle: usize, value: T) {
        assert!(
            handle < self.slots.len(),
            "{} handle {handle} exceeds pool capacity {}",
            self.kind,
            self.slots.len()
        );
        self.slots[handle] = Some(value);
    }

    /// The resource at `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OutOfRange`] if the handle was never
    /// submitted.
    #[inline]
    pub fn get(&self, handle: usize) -> Result<&T, RegistryError> {
        self.slots
            .get(handle)
            .and_then(Option::as_ref)
            .ok_or(RegistryError::OutOfRange {
                kind: self.kind,
                handle,
                capacity: self.slots.len(),
            })
    }

    /// Iterates submitted resources with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(handle, slot)| slot.as_ref().map(|value| (handle, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_set_get_reset() {
        let mut storage = ComponentStorage::new(4);
        assert!(storage.get(2).is_none());

        storage.set(2, 99u32);
        assert_eq!(storage.get(2), Some(&99));

        assert_eq!(storage.reset(2), Some(99));
        assert!(storage.get(2).is_none());
    }

    #[test]
    fn test_storage_iter_skips_empty_slots() {
        let mut storage = ComponentStorage::new(8);
        storage.set(1, "a");
        storage.set(5, "b");

        let collected: Vec<_> = storage.iter().collect();
        assert_eq!(collected, vec![(1, &"a"), (5, &"b")]);
    }

    #[test]
    fn test_pool_roundtrip() {
        let mut pool = Pool::new("pipeline", 8);
        pool.submit(0, 10u64);
        pool.submit(1, 11u64);

        assert_eq!(pool.get(0), Ok(&10));
        assert_eq!(pool.get(1), Ok(&11));
    }

    #[test]
    fn test_pool_unsubmitted_handle_fails_loudly() {
        let mut pool = Pool::new("pipeline", 128);
        pool.submit(0, 10u64);
        pool.submit(1, 11u64);

        // A handle that was never submitted must not hand back an
        // undefined slot.
        let err = pool.get(99).unwrap_err();
        assert_eq!(
            err,
            RegistryError::OutOfRange {
                kind: "pipeline",
                handle: 99,
                capacity: 128,
            }
        );
    }

    #[test]
    fn test_pool_overwrite() {
        let mut pool = Pool::new("shader", 2);
        pool.submit(0, 1u8);
        pool.submit(0, 2u8);
        assert_eq!(pool.get(0), Ok(&2));
    }
}
