//! # Rendering Error Types
//!
//! Frame errors abort the current frame's submission (never a partial
//! submit); setup errors abort scene setup before anything is drawn.

use thiserror::Error;

use ember_core::{ConfigError, RegistryError};

/// Errors that abort one frame.
///
/// The frame driver stops at the first error and submits nothing; the next
/// frame starts clean because buffers are fully rewritten every frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The scene has no camera component or no camera binding; render
    /// systems cannot update buffers without the shared camera.
    #[error("scene has no camera; render systems cannot run")]
    MissingCamera,

    /// A handle did not resolve during command replay.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors that abort scene setup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    /// Malformed component wiring.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A submit or attach addressed a missing entity.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
