//! Collision detection for the reference locomotion host.
//!
//! This module provides world collision testing using capsule and box
//! shapes, plus a kinematic character body that moves through it.
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: Static brushes and dynamic bodies
//! - [`CharacterBody`]: Kinematic capsule with ground detection
//! - [`TraceResult`] / [`ShapeContact`]: Output from traces, sweeps and overlaps
//! - [`TraceShape`]: Shape used for queries (capsule, box, segment capsule, point)
//!
//! # Tracing Algorithm
//!
//! Traces march the shape along the path in steps no longer than half its
//! smallest extent, then bisect the first blocked step. Shapes that touch
//! within [`CONTACT_SKIN`] do not block.

mod body;
mod flags;
mod slide_move;
mod trace;
mod world;

pub use body::{BodySettings, CharacterBody};
pub use flags::ContentFlags;
pub use slide_move::{clip_velocity, slide_move, step_slide_move, SlideOutcome};
pub use trace::{ColliderHandle, ShapeContact, TraceResult, TraceShape};
pub use world::{CollisionWorld, DynamicBody, QueryError, StaticBrush, CONTACT_SKIN};
