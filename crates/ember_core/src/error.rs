//! # Core Error Types
//!
//! Two families: configuration errors, which are discovered at scene-setup
//! time and abort setup, and registry errors, which are programming errors
//! discovered at runtime and fail loudly instead of returning an undefined
//! slot.

use thiserror::Error;

/// Errors in component wiring, discovered while a scene is being prepared.
///
/// These fail fast: setup is aborted, nothing is partially registered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A physics component was constructed with a non-positive mass.
    /// Mass is a divisor in force application and must be strictly positive.
    #[error("mass must be strictly positive, got {mass}")]
    NonPositiveMass {
        /// The rejected mass value.
        mass: f32,
    },

    /// A geometry's declared instance count disagrees with the sprite
    /// component it is paired with.
    #[error("instance count mismatch on '{label}': geometry declares {geometry}, sprite carries {sprite}")]
    InstanceCountMismatch {
        /// Label of the offending entity.
        label: String,
        /// Instance count declared by the geometry component.
        geometry: u32,
        /// Instance count carried by the sprite/transform side.
        sprite: u32,
    },

    /// Parallel per-instance arrays of one component disagree in length.
    #[error("parallel instance arrays disagree in length: {left} vs {right}")]
    ArrayLengthMismatch {
        /// Length of the first array.
        left: usize,
        /// Length of the second array.
        right: usize,
    },

    /// The engine configuration file could not be parsed.
    #[error("failed to parse engine config: {0}")]
    Parse(String),
}

/// Errors raised by registry lookups.
///
/// Reading a handle that was never submitted is treated as a programming
/// error; the legacy behavior of silently handing back an empty slot is
/// explicitly rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The handle does not address a submitted slot.
    #[error("{kind} handle {handle} was never submitted (pool capacity {capacity})")]
    OutOfRange {
        /// Pool the lookup was made against.
        kind: &'static str,
        /// The offending handle value.
        handle: usize,
        /// Fixed capacity of the pool.
        capacity: usize,
    },

    /// No camera component is registered in the scene. Render systems need
    /// exactly one shared camera each frame.
    #[error("no camera component registered in the scene")]
    MissingCamera,
}
