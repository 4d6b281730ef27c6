//! Player input handling.
//!
//! This module converts raw held-button input (keyboard, mouse, gamepad)
//! into locomotion commands. Buttons are edge-detected against the previous
//! frame so holding a key produces exactly one press.

use glam::Vec2;
use kickstep_physics::{CommandQueue, LocomotionCommand};
use serde::{Deserialize, Serialize};

/// Mouse pixels to radians at sensitivity 1.0.
const RADIANS_PER_PIXEL: f32 = 0.001;

/// Raw player input for a single frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys held.
    pub movement: MovementInput,

    /// Mouse delta this frame (pixels). Positive `y` moves the mouse down.
    pub mouse_delta: (f32, f32),

    /// Action buttons held.
    pub actions: ActionInput,

    /// Frame number this input was generated.
    pub frame: u32,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub crouch: bool,
    pub kick: bool,
    pub lean_left: bool,
    pub lean_right: bool,
}

impl PlayerInput {
    /// Movement intent: `x` strafes right, `y` moves forward. Diagonals are normalized.
    pub fn intent(&self) -> Vec2 {
        let mut intent = Vec2::ZERO;
        if self.movement.forward {
            intent.y += 1.0;
        }
        if self.movement.backward {
            intent.y -= 1.0;
        }
        if self.movement.right {
            intent.x += 1.0;
        }
        if self.movement.left {
            intent.x -= 1.0;
        }
        intent.clamp_length_max(1.0)
    }

    /// Lean request in `-1..=1` (negative leans left).
    pub fn lean(&self) -> f32 {
        let mut lean = 0.0;
        if self.actions.lean_left {
            lean -= 1.0;
        }
        if self.actions.lean_right {
            lean += 1.0;
        }
        lean
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.movement.forward || self.movement.backward || self.movement.left || self.movement.right
    }
}

/// Presentation-only values extracted from a frame of input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameLook {
    /// Pitch change in radians (positive looks down).
    pub pitch_delta: f32,
    /// Lean request in `-1..=1`.
    pub lean: f32,
}

/// Stateful translator from [`PlayerInput`] to [`LocomotionCommand`]s.
#[derive(Debug, Clone)]
pub struct InputAdapter {
    /// Mouse sensitivity multiplier.
    pub mouse_sensitivity: f32,
    previous: ActionInput,
    last_intent: Vec2,
    yaw: f32,
}

impl InputAdapter {
    pub fn new(mouse_sensitivity: f32, initial_yaw: f32) -> Self {
        Self {
            mouse_sensitivity,
            previous: ActionInput::default(),
            last_intent: Vec2::ZERO,
            yaw: initial_yaw,
        }
    }

    /// Accumulated yaw in radians.
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Push this frame's commands onto `queue`.
    pub fn translate(&mut self, input: &PlayerInput, queue: &mut CommandQueue) -> FrameLook {
        let radians = self.mouse_sensitivity * RADIANS_PER_PIXEL;

        let (dx, dy) = input.mouse_delta;
        if dx != 0.0 && dx.is_finite() {
            self.yaw += dx * radians;
            queue.push(LocomotionCommand::Look(self.yaw));
        }

        let intent = input.intent();
        if intent != self.last_intent {
            self.last_intent = intent;
            queue.push(LocomotionCommand::SetIntent(intent));
        }

        let now = input.actions;
        let before = self.previous;
        if now.crouch && !before.crouch {
            queue.push(LocomotionCommand::CrouchPressed);
        }
        if !now.crouch && before.crouch {
            queue.push(LocomotionCommand::CrouchReleased);
        }
        if now.jump && !before.jump {
            queue.push(LocomotionCommand::JumpPressed);
        }
        if now.kick && !before.kick {
            queue.push(LocomotionCommand::KickPressed);
        }
        self.previous = now;

        FrameLook {
            pitch_delta: if dy.is_finite() { dy * radians } else { 0.0 },
            lean: input.lean(),
        }
    }
}
