//! Locomotion and ability tunables.
//!
//! All parameters are grouped here for easy tuning. Values use metric
//! units (meters, seconds) and are read-only once a controller is built.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::ContentFlags;

/// A tunable failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Optional abilities. Disabled abilities ignore their input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySet {
    pub jump: bool,
    pub slide: bool,
    pub kick: bool,
}

impl Default for AbilitySet {
    fn default() -> Self {
        Self {
            jump: true,
            slide: true,
            kick: true,
        }
    }
}

/// Configuration for the locomotion state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    // ========================================================================
    // Movement
    // ========================================================================
    /// Walking speed (meters/second).
    pub move_speed: f32,

    /// Crouched walking speed (meters/second).
    pub crouch_speed: f32,

    // ========================================================================
    // Gravity and Jumping
    // ========================================================================
    /// Signed vertical acceleration (meters/second², negative is down).
    pub gravity: f32,

    /// Vertical velocity held while grounded. Slightly negative so the
    /// ground probe keeps touching the floor.
    pub grounded_stick_velocity: f32,

    /// Gravity multiplier while sliding.
    pub slide_gravity_multiplier: f32,

    /// Apex height of a jump (meters).
    pub jump_height: f32,

    /// Grace period after leaving the ground during which a jump is still admitted.
    pub coyote_time: f32,

    /// How long a jump press is remembered before landing.
    pub jump_buffer_time: f32,

    // ========================================================================
    // Crouch and Slide
    // ========================================================================
    /// Speed added along the facing direction when a slide starts.
    pub slide_boost: f32,

    /// Exponential decay rate of slide velocity (1/second).
    pub slide_friction: f32,

    /// Below this horizontal speed a slide is seeded from the facing direction.
    pub slide_min_start_speed: f32,

    /// A slide ends once its speed falls below this.
    pub slide_stop_speed: f32,

    /// Standing collider height (meters).
    pub standing_height: f32,

    /// Crouched collider height (meters).
    pub crouch_height: f32,

    /// Collider radius (meters).
    pub collider_radius: f32,

    /// Exponential blend rate of collider height toward its target (1/second).
    pub height_transition_speed: f32,

    // ========================================================================
    // Kick
    // ========================================================================
    /// Impulse magnitude applied to a struck dynamic body.
    pub kick_force: f32,

    /// Sweep distance when nothing overlaps the kick capsule (meters).
    pub kick_range: f32,

    /// Kick capsule radius (meters).
    pub kick_radius: f32,

    /// Length of the kick capsule segment (meters).
    pub kick_reach: f32,

    /// How far behind the view origin the kick capsule starts (meters).
    pub kick_back_offset: f32,

    /// Minimum time between admitted kicks (seconds).
    pub kick_cooldown: f32,

    /// Vertical velocity set by a kick (meters/second).
    pub kick_up_force: f32,

    /// Backward horizontal speed set by a kick (meters/second).
    pub kick_recoil: f32,

    /// Exponential decay rate of kick recoil (1/second).
    pub kick_recoil_decay: f32,

    /// Content mask for kick overlap and sweep queries.
    pub kick_mask: ContentFlags,

    pub abilities: AbilitySet,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            move_speed: 7.0,
            crouch_speed: 3.5,

            gravity: -9.81,
            grounded_stick_velocity: -2.0,
            slide_gravity_multiplier: 2.0,
            jump_height: 1.4,
            coyote_time: 0.15,
            jump_buffer_time: 0.15,

            slide_boost: 5.0,
            slide_friction: 2.0,
            slide_min_start_speed: 0.1,
            slide_stop_speed: 0.1,
            standing_height: 2.0,
            crouch_height: 1.0,
            collider_radius: 0.5,
            height_transition_speed: 10.0,

            kick_force: 12.0,
            kick_range: 2.0,
            kick_radius: 0.3,
            kick_reach: 0.6,
            kick_back_offset: 0.2,
            kick_cooldown: 0.5,
            kick_up_force: 4.0,
            kick_recoil: 6.0,
            kick_recoil_decay: 4.0,
            kick_mask: ContentFlags::MASK_KICK,

            abilities: AbilitySet::default(),
        }
    }
}

impl AbilityConfig {
    /// Plain walker: crouch and jump, no slide or kick.
    pub fn walker() -> Self {
        Self {
            abilities: AbilitySet {
                jump: true,
                slide: false,
                kick: false,
            },
            ..Default::default()
        }
    }

    /// Vertical launch velocity that reaches `jump_height` under `gravity`.
    #[inline]
    pub fn jump_launch_velocity(&self) -> f32 {
        (self.jump_height * 2.0 * self.gravity.abs()).sqrt()
    }

    /// Walking speed for the given stance.
    #[inline]
    pub fn walk_speed(&self, crouched: bool) -> f32 {
        if crouched {
            self.crouch_speed
        } else {
            self.move_speed
        }
    }

    /// Collider height target for the given stance.
    #[inline]
    pub fn target_height(&self, crouched: bool) -> f32 {
        if crouched {
            self.crouch_height
        } else {
            self.standing_height
        }
    }

    /// Reject values that would break the state machine invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("move_speed", self.move_speed),
            ("crouch_speed", self.crouch_speed),
            ("gravity", self.gravity),
            ("grounded_stick_velocity", self.grounded_stick_velocity),
            ("slide_gravity_multiplier", self.slide_gravity_multiplier),
            ("jump_height", self.jump_height),
            ("coyote_time", self.coyote_time),
            ("jump_buffer_time", self.jump_buffer_time),
            ("slide_boost", self.slide_boost),
            ("slide_friction", self.slide_friction),
            ("slide_min_start_speed", self.slide_min_start_speed),
            ("slide_stop_speed", self.slide_stop_speed),
            ("standing_height", self.standing_height),
            ("crouch_height", self.crouch_height),
            ("collider_radius", self.collider_radius),
            ("height_transition_speed", self.height_transition_speed),
            ("kick_force", self.kick_force),
            ("kick_range", self.kick_range),
            ("kick_radius", self.kick_radius),
            ("kick_reach", self.kick_reach),
            ("kick_back_offset", self.kick_back_offset),
            ("kick_cooldown", self.kick_cooldown),
            ("kick_up_force", self.kick_up_force),
            ("kick_recoil", self.kick_recoil),
            ("kick_recoil_decay", self.kick_recoil_decay),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
            if field != "gravity" && field != "grounded_stick_velocity" && value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be negative",
                });
            }
        }

        let positive = [
            ("move_speed", self.move_speed),
            ("crouch_speed", self.crouch_speed),
            ("standing_height", self.standing_height),
            ("crouch_height", self.crouch_height),
            ("collider_radius", self.collider_radius),
            ("kick_radius", self.kick_radius),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }

        if self.gravity >= 0.0 {
            return Err(ConfigError::Invalid {
                field: "gravity",
                reason: "must point down (negative)",
            });
        }
        if self.grounded_stick_velocity > 0.0 {
            return Err(ConfigError::Invalid {
                field: "grounded_stick_velocity",
                reason: "must not be positive",
            });
        }
        if self.crouch_height > self.standing_height {
            return Err(ConfigError::Invalid {
                field: "crouch_height",
                reason: "must not exceed standing_height",
            });
        }
        if self.collider_radius * 2.0 > self.crouch_height {
            return Err(ConfigError::Invalid {
                field: "collider_radius",
                reason: "capsule must fit within crouch_height",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AbilityConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!(config.abilities.kick && config.abilities.slide && config.abilities.jump);
    }

    #[test]
    fn test_jump_launch_velocity() {
        let config = AbilityConfig {
            gravity: -9.81,
            jump_height: 1.4,
            ..Default::default()
        };
        assert!((config.jump_launch_velocity() - 5.2412).abs() < 1e-3);
    }

    #[test]
    fn test_stance_lookups() {
        let config = AbilityConfig::default();
        assert_eq!(config.walk_speed(true), config.crouch_speed);
        assert_eq!(config.walk_speed(false), config.move_speed);
        assert_eq!(config.target_height(true), config.crouch_height);
        assert_eq!(config.target_height(false), config.standing_height);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let upward = AbilityConfig {
            gravity: 9.81,
            ..Default::default()
        };
        assert!(matches!(
            upward.validate(),
            Err(ConfigError::Invalid { field: "gravity", .. })
        ));

        let inverted = AbilityConfig {
            crouch_height: 2.5,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::Invalid { field: "crouch_height", .. })
        ));

        let nan = AbilityConfig {
            kick_cooldown: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::Invalid { field: "kick_cooldown", .. })
        ));
    }

    #[test]
    fn test_walker_preset_disables_abilities() {
        let config = AbilityConfig::walker();
        assert!(!config.abilities.slide);
        assert!(!config.abilities.kick);
        assert!(config.abilities.jump);
    }
}
