//! Crouch, slide and collider height blending.
//!
//! Stance transitions:
//! - Crouch press while `Standing` starts a slide (or a plain crouch when
//!   slide is disabled). Presses in any other stance only mark crouch held
//! - A slide decays exponentially and settles into `Crouching`
//! - `Crouching` stands back up once crouch is released and headroom is clear
//!
//! The collider height follows the stance target with an exponential blend
//! and is clamped to `[crouch_height, standing_height]`.

use glam::Vec3;

use super::config::AbilityConfig;
use super::state::{Stance, StanceState};

/// Speed below which decayed recoil or slide velocity snaps to zero.
const VELOCITY_EPSILON: f32 = 1e-4;

impl StanceState {
    /// Handle a crouch press.
    ///
    /// Returns the starting slide speed when a slide begins.
    pub fn press_crouch(
        &mut self,
        facing: Vec3,
        horizontal_velocity: Vec3,
        config: &AbilityConfig,
    ) -> Option<f32> {
        self.slide_held = true;

        if self.stance != Stance::Standing {
            return None;
        }
        if !config.abilities.slide {
            self.stance = Stance::Crouching;
            return None;
        }

        let mut seed = Vec3::new(horizontal_velocity.x, 0.0, horizontal_velocity.z);
        if seed.length() < config.slide_min_start_speed {
            seed = facing * config.move_speed;
        }

        self.slide_velocity = seed + facing * config.slide_boost;
        self.stance = Stance::Sliding;
        Some(self.slide_velocity.length())
    }

    /// Handle a crouch release.
    pub fn release_crouch(&mut self) {
        self.slide_held = false;
    }

    /// End a slide immediately, leaving the character crouched.
    ///
    /// Returns `true` if a slide was active.
    pub fn cancel_slide(&mut self) -> bool {
        if self.stance != Stance::Sliding {
            return false;
        }
        self.slide_velocity = Vec3::ZERO;
        self.stance = Stance::Crouching;
        true
    }

    /// Decay slide velocity. Returns `true` when the slide just ended.
    pub fn decay_slide(&mut self, dt: f32, config: &AbilityConfig) -> bool {
        if self.stance != Stance::Sliding {
            return false;
        }

        self.slide_velocity *= (-config.slide_friction * dt).exp();
        if self.slide_velocity.length() < config.slide_stop_speed.max(VELOCITY_EPSILON) {
            self.slide_velocity = Vec3::ZERO;
            self.stance = Stance::Crouching;
            return true;
        }
        false
    }

    /// Whether this tick should poll for standing headroom.
    #[inline]
    pub fn wants_to_stand(&self) -> bool {
        self.stance == Stance::Crouching && !self.slide_held
    }

    /// Stand up if `headroom_clear`. Returns `true` on the transition.
    pub fn try_stand(&mut self, headroom_clear: bool) -> bool {
        if !self.wants_to_stand() || !headroom_clear {
            return false;
        }
        self.stance = Stance::Standing;
        true
    }

    /// Blend collider height toward the stance target and return it.
    pub fn blend_height(&mut self, dt: f32, config: &AbilityConfig) -> f32 {
        let target = config.target_height(self.stance.is_crouched());
        let blend = 1.0 - (-config.height_transition_speed * dt).exp();
        let height = self.collider_height + (target - self.collider_height) * blend;
        self.collider_height = height.clamp(config.crouch_height, config.standing_height);
        self.collider_height
    }
}
