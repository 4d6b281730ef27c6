//! Discrete events emitted by the locomotion controller.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::ColliderHandle;

/// Which query found the kick target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KickPath {
    /// The target already overlapped the kick capsule.
    Overlap,
    /// The target was found by sweeping the capsule forward.
    Sweep,
}

/// Something that happened during a tick.
///
/// Consumed by presentation collaborators (audio, camera shake, HUD).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LocomotionEvent {
    /// Ground contact regained. `impact_speed` is the downward speed before landing.
    Landed { impact_speed: f32 },
    Jumped { launch_velocity: f32 },
    SlideStarted { speed: f32 },
    SlideEnded,
    StoodUp,
    /// A kick was admitted, whether or not it hits anything.
    KickPerformed,
    KickHit {
        collider: ColliderHandle,
        point: Vec3,
        path: KickPath,
        impulse_applied: bool,
    },
}
