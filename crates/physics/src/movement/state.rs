//! Locomotion state, stance and the snapshot exposed to presentation.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::config::AbilityConfig;

/// Timestamp meaning "never happened". Every window comparison against it fails.
pub const NEVER: f32 = f32::NEG_INFINITY;

/// Crouch/slide stance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stance {
    #[default]
    Standing,
    /// Crouched and walking at crouch speed.
    Crouching,
    /// Crouched and carried by a decaying slide velocity.
    Sliding,
}

impl Stance {
    /// Whether the collider targets the crouched height.
    #[inline]
    pub fn is_crouched(self) -> bool {
        !matches!(self, Stance::Standing)
    }
}

/// Jump admission timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpState {
    /// Last tick at which the ground probe reported contact.
    pub last_grounded_time: f32,
    /// Time of the pending jump press, [`NEVER`] once consumed.
    pub last_jump_request_time: f32,
}

impl Default for JumpState {
    fn default() -> Self {
        Self {
            last_grounded_time: NEVER,
            last_jump_request_time: NEVER,
        }
    }
}

/// Crouch/slide state plus the blended collider height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StanceState {
    pub stance: Stance,
    /// Crouch input is held.
    pub slide_held: bool,
    /// Horizontal slide velocity (meters/second).
    pub slide_velocity: Vec3,
    /// Current collider height, always within `[crouch_height, standing_height]`.
    pub collider_height: f32,
}

impl StanceState {
    fn standing(height: f32) -> Self {
        Self {
            stance: Stance::Standing,
            slide_held: false,
            slide_velocity: Vec3::ZERO,
            collider_height: height,
        }
    }

    /// Collider center height above the feet. Feet stay anchored.
    #[inline]
    pub fn collider_center_y(&self) -> f32 {
        self.collider_height * 0.5
    }
}

/// Kick cooldown and recoil.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KickState {
    pub last_kick_time: f32,
    /// Decaying horizontal recoil (meters/second).
    pub kick_velocity: Vec3,
}

impl Default for KickState {
    fn default() -> Self {
        Self {
            last_kick_time: NEVER,
            kick_velocity: Vec3::ZERO,
        }
    }
}

/// Complete locomotion state for one character.
///
/// Owned by the caller and mutated only by
/// [`LocomotionController`](super::LocomotionController).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocomotionState {
    /// Movement intent: `x` strafes right, `y` moves forward. Length ≤ 1.
    pub horizontal_intent: Vec2,

    /// Facing yaw in radians. Yaw 0 faces +X, increasing toward +Z.
    pub yaw: f32,

    /// Vertical velocity (meters/second, positive is up).
    pub vertical_velocity: f32,

    /// Ground contact as of the current tick.
    pub grounded: bool,

    /// Horizontal velocity actually achieved by the last tick's move.
    pub horizontal_velocity: Vec3,

    pub jump: JumpState,
    pub stance: StanceState,
    pub kick: KickState,
}

impl LocomotionState {
    /// Create a standing state with the collider snapped to standing height.
    pub fn new(config: &AbilityConfig) -> Self {
        Self {
            horizontal_intent: Vec2::ZERO,
            yaw: 0.0,
            vertical_velocity: 0.0,
            grounded: false,
            horizontal_velocity: Vec3::ZERO,
            jump: JumpState::default(),
            stance: StanceState::standing(config.standing_height),
            kick: KickState::default(),
        }
    }

    /// Horizontal facing direction.
    pub fn facing(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_yaw, 0.0, sin_yaw)
    }

    /// Horizontal right direction.
    pub fn right(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(-sin_yaw, 0.0, cos_yaw)
    }

    #[inline]
    pub fn is_sliding(&self) -> bool {
        self.stance.stance == Stance::Sliding
    }

    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.stance.stance.is_crouched()
    }

    /// Current horizontal speed.
    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        self.horizontal_velocity.length()
    }

    /// Values consumed by camera effects and HUD collaborators.
    pub fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            grounded: self.grounded,
            sliding: self.is_sliding(),
            crouching: self.is_crouching(),
            horizontal_speed: self.horizontal_speed(),
            vertical_velocity: self.vertical_velocity,
            collider_height: self.stance.collider_height,
            collider_center_y: self.stance.collider_center_y(),
            yaw: self.yaw,
        }
    }
}

/// Read-only view of the locomotion state after a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionSnapshot {
    pub grounded: bool,
    pub sliding: bool,
    pub crouching: bool,
    pub horizontal_speed: f32,
    pub vertical_velocity: f32,
    pub collider_height: f32,
    pub collider_center_y: f32,
    pub yaw: f32,
}
