//! Typed input commands and the per-tick command queue.
//!
//! The input layer pushes commands as they happen; the controller drains
//! the queue in arrival order at the start of each tick, so callback timing
//! never races the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Commands the controller accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LocomotionCommand {
    /// Replace the horizontal movement intent (`x` right, `y` forward).
    SetIntent(Vec2),
    /// Set the facing yaw in radians.
    Look(f32),
    JumpPressed,
    CrouchPressed,
    CrouchReleased,
    KickPressed,
}

/// Small FIFO of commands drained once per tick.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: Vec<LocomotionCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    pub fn push(&mut self, command: LocomotionCommand) {
        self.pending.push(command);
    }

    /// Remove and return every pending command in arrival order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, LocomotionCommand> {
        self.pending.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
