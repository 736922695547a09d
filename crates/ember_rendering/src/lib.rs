//! # EMBER Rendering Engine
//!
//! The GPU half of the sprite game: binds post-simulation component state
//! to GPU draw resources and turns it into exactly one render pass per
//! frame.
//!
//! ## Architecture
//!
//! ```text
//! driver -> support systems -> render systems -> wgpu executor -> present
//!            (ember_core)       update_buffers     one pass,
//!                               then run           writes first
//! ```
//!
//! - The [`Registry`] is the single point of truth: scene data plus GPU
//!   pools behind dense build-time handles.
//! - Render systems record into a [`FrameCommands`] list and never touch
//!   the device; the executor replays the list, so a frame submits
//!   completely or not at all.
//! - The batch system draws N instances of one geometry for the price of
//!   one draw call.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod binding;
pub mod driver;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod registry;
pub mod scene;
pub mod systems;

pub use binding::{CameraBinding, RenderBinding};
pub use driver::Engine;
pub use error::{FrameError, SetupError};
pub use frame::{BufferWrite, DrawCall, FrameCommands, FrameStats, MAX_BIND_GROUPS};
pub use gpu::{submit_frame, DepthTarget, GpuContext, DEPTH_FORMAT};
pub use registry::Registry;
pub use systems::{BatchSystem, RenderSystem, SimpleSystem};
