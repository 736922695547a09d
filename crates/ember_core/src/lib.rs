//! # EMBER Core Engine
//!
//! The simulation half of a real-time 2D sprite game:
//!
//! - A flat entity/component registry with dense per-kind storage
//! - Per-frame support systems: physics, spatial grid, collision
//! - Keyboard state with edge-triggered single presses
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in the per-frame hot path** - all storage is
//!    sized at scene setup and mutated in place
//! 2. **Data-oriented design** - components live in per-kind dense arrays
//!    indexed by entity id; lookup is a bit test plus an array index
//! 3. **Frame ordering is a contract** - every support system completes
//!    before any render system reads component state
//!
//! ## Example
//!
//! ```rust,ignore
//! use ember_core::{SceneRegistry, Entity, EntityId};
//!
//! let mut scene = SceneRegistry::new(64);
//! scene.submit_entity(Entity::new(EntityId::new(0), "Player"));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod handle;
pub mod input;
pub mod systems;

pub use config::EngineConfig;
pub use ecs::{
    Aabb, Albedo, AttributeFormat, BufferAttribute, BufferLayout, CameraComponent, Component,
    ComponentKind, ComponentStorage, Entity, EntityId, GeometryComponent,
    InstancedPhysicsComponent, InstancedSpriteComponent, MaterialComponent, PhysicsComponent,
    Pool, SceneRegistry, SpriteComponent, TransformComponent,
};
pub use error::{ConfigError, RegistryError};
pub use handle::{
    BindGroupHandle, BindGroupLayoutHandle, PipelineHandle, ShaderHandle, TextureHandle,
    UniformBufferHandle, VertexBufferHandle,
};
pub use input::{InputQueue, InputState, Key, KeyEvent};
pub use systems::{
    CellKey, CollisionPair, CollisionSystem, FrameData, PhysicsSystem, SpatialGridSystem,
    SupportSystem, TickContext, Viewport,
};
