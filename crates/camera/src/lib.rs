//! Kickstep Camera
//!
//! First-person camera rig and the presentation effects driven by locomotion.
//!
//! # Features
//!
//! - View and projection matrices with roll
//! - Eye height that follows the crouch/slide collider
//! - Head bob, lean, slide tilt and slide FOV boost
//! - Screen shake as a time-boxed effect record
//!
//! # Usage
//!
//! Each tick, feed [`CameraEffects::update`] the controller's snapshot and
//! events, then place the [`FirstPersonCamera`] with the returned pose.

pub mod camera;
pub mod effects;

pub use camera::FirstPersonCamera;
pub use effects::{CameraConfig, CameraEffects, CameraPose, TimedEffect};
