//! Character locomotion and abilities.
//!
//! This module implements a first-person locomotion state machine with:
//!
//! - Ground probing with a stick velocity
//! - Jumping with coyote time and input buffering
//! - Crouching and momentum slides with headroom-checked standing
//! - A kick that pushes dynamic bodies and propels the kicker
//!
//! # Design
//!
//! Locomotion is driven by the [`LocomotionController`], which drains a
//! [`CommandQueue`] each tick and updates a caller-owned [`LocomotionState`].
//! All physical queries go through the [`LocomotionHost`] trait, so the
//! controller can run against a [`WorldHost`] or a scripted test double.
//!
//! Given the same commands, time stamps and host answers, a tick always
//! produces the same state and events.

mod command;
mod config;
mod controller;
mod events;
mod host;
mod jump;
mod kick;
mod stance;
mod state;

pub use command::{CommandQueue, LocomotionCommand};
pub use config::{AbilityConfig, AbilitySet, ConfigError};
pub use controller::{LocomotionController, TickContext, TickOutput, MAX_DELTA_TIME};
pub use events::{KickPath, LocomotionEvent};
pub use host::{LocomotionHost, ProbeError, WorldHost};
pub use kick::{resolve_target, KickTarget, ViewRay};
pub use state::{
    JumpState, KickState, LocomotionState, MotionSnapshot, Stance, StanceState, NEVER,
};
