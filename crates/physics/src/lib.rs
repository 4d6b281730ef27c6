//! Kickstep locomotion physics.
//!
//! A first-person character controller with jumping, crouch-sliding and a
//! physics kick, built on a small parry3d collision world.
//!
//! # Architecture
//!
//! The crate is split into two systems:
//!
//! - **Collision**: Static brushes and dynamic bodies, overlap/trace/sweep
//!   queries, and the collide-and-slide character body
//! - **Movement**: The locomotion state machine, which talks to collision
//!   only through the [`LocomotionHost`] trait
//!
//! Libraries log through the `log` facade; binaries choose the backend.

pub mod collision;
pub mod movement;

// Re-export commonly used types
pub use collision::{
    BodySettings, CharacterBody, ColliderHandle, CollisionWorld, ContentFlags, QueryError,
    ShapeContact, TraceResult, TraceShape,
};
pub use movement::{
    AbilityConfig, AbilitySet, CommandQueue, ConfigError, KickPath, LocomotionCommand,
    LocomotionController, LocomotionEvent, LocomotionHost, LocomotionState, MotionSnapshot,
    ProbeError, Stance, TickContext, TickOutput, ViewRay, WorldHost,
};
