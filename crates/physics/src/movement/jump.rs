//! Jump admission with coyote time and input buffering.
//!
//! A press is remembered for `jump_buffer_time`; ground contact is
//! remembered for `coyote_time`. A jump fires on the first tick both
//! windows are open, and consumes both so one press launches exactly once.

use super::config::AbilityConfig;
use super::state::{JumpState, NEVER};

impl JumpState {
    /// Record a jump press.
    pub fn request(&mut self, now: f32) {
        self.last_jump_request_time = now;
    }

    /// Record ground contact for this tick.
    pub fn mark_grounded(&mut self, now: f32) {
        self.last_grounded_time = now;
    }

    /// Whether a press is still inside the buffer window.
    pub fn has_pending_request(&self, now: f32, config: &AbilityConfig) -> bool {
        now - self.last_jump_request_time <= config.jump_buffer_time
    }

    /// Whether ground contact is recent enough to jump from.
    pub fn within_coyote(&self, now: f32, config: &AbilityConfig) -> bool {
        now - self.last_grounded_time <= config.coyote_time
    }

    /// Admit a jump if both windows are open.
    ///
    /// Returns the launch velocity and invalidates the request and the
    /// coyote window, so the same press cannot fire again.
    pub fn try_admit(&mut self, now: f32, config: &AbilityConfig) -> Option<f32> {
        if !(self.within_coyote(now, config) && self.has_pending_request(now, config)) {
            return None;
        }

        self.last_jump_request_time = NEVER;
        self.last_grounded_time = NEVER;
        Some(config.jump_launch_velocity())
    }
}

// ============================================================================
// Tests
// ============================================================================
