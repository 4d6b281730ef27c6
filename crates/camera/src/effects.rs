//! Motion-driven camera effects.
//!
//! Everything here is presentation state derived from a [`MotionSnapshot`]
//! and the tick's [`LocomotionEvent`]s. Nothing feeds back into locomotion.

use glam::Vec3;
use kickstep_physics::{ConfigError, LocomotionEvent, MotionSnapshot};
use serde::{Deserialize, Serialize};

/// Camera effect tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the collider top down to the eye (meters).
    pub eye_offset: f32,

    /// Bob phase advanced per meter travelled (radians/meter).
    pub bob_frequency: f32,

    /// Vertical bob amplitude (meters).
    pub bob_amplitude: f32,

    /// Blend rate of bob strength in and out (1/second).
    pub bob_blend_speed: f32,

    /// Roll at full lean (radians).
    pub lean_angle: f32,

    /// Sideways eye offset at full lean (meters).
    pub lean_offset: f32,

    pub lean_speed: f32,

    /// Roll while sliding (radians).
    pub slide_tilt: f32,

    pub tilt_speed: f32,

    /// Field of view at rest (degrees).
    pub base_fov: f32,

    /// Extra field of view while sliding (degrees).
    pub slide_fov_boost: f32,

    pub fov_speed: f32,

    /// Screen shake started by a kick hit.
    pub shake_duration: f32,
    pub shake_magnitude: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye_offset: 0.2,
            bob_frequency: 1.8,
            bob_amplitude: 0.05,
            bob_blend_speed: 8.0,
            lean_angle: 0.26,
            lean_offset: 0.4,
            lean_speed: 8.0,
            slide_tilt: 0.1,
            tilt_speed: 6.0,
            base_fov: 90.0,
            slide_fov_boost: 10.0,
            fov_speed: 6.0,
            shake_duration: 0.25,
            shake_magnitude: 0.08,
        }
    }
}

impl CameraConfig {
    /// Reject values that would produce a broken view.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("eye_offset", self.eye_offset),
            ("bob_frequency", self.bob_frequency),
            ("bob_amplitude", self.bob_amplitude),
            ("bob_blend_speed", self.bob_blend_speed),
            ("lean_offset", self.lean_offset),
            ("lean_speed", self.lean_speed),
            ("tilt_speed", self.tilt_speed),
            ("slide_fov_boost", self.slide_fov_boost),
            ("fov_speed", self.fov_speed),
            ("shake_duration", self.shake_duration),
            ("shake_magnitude", self.shake_magnitude),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and not negative",
                });
            }
        }

        let total_fov = self.base_fov + self.slide_fov_boost;
        if !(self.base_fov > 0.0 && total_fov < 180.0) {
            return Err(ConfigError::Invalid {
                field: "base_fov",
                reason: "field of view must stay within (0, 180) degrees",
            });
        }
        if !self.lean_angle.is_finite() || !self.slide_tilt.is_finite() {
            return Err(ConfigError::Invalid {
                field: "lean_angle",
                reason: "roll angles must be finite",
            });
        }

        Ok(())
    }
}

/// A time-boxed effect that fades linearly from `magnitude` to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub start: f32,
    pub duration: f32,
    pub magnitude: f32,
}

impl TimedEffect {
    pub fn new(start: f32, duration: f32, magnitude: f32) -> Self {
        Self {
            start,
            duration,
            magnitude,
        }
    }

    /// Current strength, zero outside `[start, start + duration)`.
    pub fn sample(&self, now: f32) -> f32 {
        let elapsed = now - self.start;
        if elapsed < 0.0 || elapsed >= self.duration {
            return 0.0;
        }
        self.magnitude * (1.0 - elapsed / self.duration)
    }

    pub fn is_finished(&self, now: f32) -> bool {
        now - self.start >= self.duration
    }
}

/// Camera placement relative to the character's feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Eye height above the feet (meters).
    pub eye_height: f32,
    /// Offset in view-local space: `x` right, `y` up, `z` forward.
    pub local_offset: Vec3,
    /// Roll in radians, positive rolls clockwise.
    pub roll: f32,
    /// Field of view in degrees.
    pub fov: f32,
}

/// Smoothed camera effect state for one character.
#[derive(Debug, Clone)]
pub struct CameraEffects {
    pub config: CameraConfig,
    bob_phase: f32,
    bob_weight: f32,
    lean: f32,
    tilt: f32,
    fov: f32,
    shake: Option<TimedEffect>,
}

impl CameraEffects {
    pub fn new(config: CameraConfig) -> Self {
        let fov = config.base_fov;
        Self {
            config,
            bob_phase: 0.0,
            bob_weight: 0.0,
            lean: 0.0,
            tilt: 0.0,
            fov,
            shake: None,
        }
    }

    /// Active shake, if any.
    pub fn shake(&self) -> Option<TimedEffect> {
        self.shake
    }

    /// Advance effects by one tick and return the resulting pose.
    ///
    /// `lean_input` is clamped to `-1..=1` (negative leans left).
    pub fn update(
        &mut self,
        snapshot: &MotionSnapshot,
        events: &[LocomotionEvent],
        lean_input: f32,
        now: f32,
        dt: f32,
    ) -> CameraPose {
        let config = &self.config;

        for event in events {
            if matches!(event, LocomotionEvent::KickHit { .. }) {
                self.shake = Some(TimedEffect::new(
                    now,
                    config.shake_duration,
                    config.shake_magnitude,
                ));
            }
        }

        // Head bob
        let bobbing = snapshot.grounded && !snapshot.sliding && snapshot.horizontal_speed > 0.1;
        if bobbing {
            self.bob_phase += snapshot.horizontal_speed * config.bob_frequency * dt;
            self.bob_phase %= std::f32::consts::TAU * 2.0;
        }
        let bob_target = if bobbing { 1.0 } else { 0.0 };
        self.bob_weight = approach(self.bob_weight, bob_target, config.bob_blend_speed, dt);
        let bob_amplitude = config.bob_amplitude * self.bob_weight;
        let bob = Vec3::new(
            (self.bob_phase * 0.5).cos() * bob_amplitude * 0.5,
            self.bob_phase.sin() * bob_amplitude,
            0.0,
        );

        // Lean and slide tilt
        let lean_input = if lean_input.is_finite() {
            lean_input.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.lean = approach(self.lean, lean_input, config.lean_speed, dt);
        let tilt_target = if snapshot.sliding { config.slide_tilt } else { 0.0 };
        self.tilt = approach(self.tilt, tilt_target, config.tilt_speed, dt);

        // FOV
        let fov_target = if snapshot.sliding {
            config.base_fov + config.slide_fov_boost
        } else {
            config.base_fov
        };
        self.fov = approach(self.fov, fov_target, config.fov_speed, dt);

        // Shake
        let mut shake_offset = Vec3::ZERO;
        if let Some(effect) = self.shake {
            if effect.is_finished(now) {
                self.shake = None;
            } else {
                let strength = effect.sample(now);
                shake_offset = Vec3::new((now * 47.0).sin(), (now * 61.0 + 1.3).sin(), 0.0) * strength;
            }
        }

        CameraPose {
            eye_height: (snapshot.collider_height - config.eye_offset).max(0.0),
            local_offset: bob + Vec3::X * (self.lean * config.lean_offset) + shake_offset,
            roll: self.lean * config.lean_angle + self.tilt,
            fov: self.fov,
        }
    }
}

/// Exponential approach toward `target`, frame-rate independent.
fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickstep_physics::{ColliderHandle, KickPath};

    const DT: f32 = 1.0 / 60.0;

    fn standing(speed: f32) -> MotionSnapshot {
        MotionSnapshot {
            grounded: true,
            horizontal_speed: speed,
            collider_height: 2.0,
            collider_center_y: 1.0,
            ..Default::default()
        }
    }

    fn kick_hit() -> LocomotionEvent {
        LocomotionEvent::KickHit {
            collider: ColliderHandle::Dynamic(3),
            point: Vec3::ZERO,
            path: KickPath::Sweep,
            impulse_applied: true,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(CameraConfig::default().validate(), Ok(()));

        let wide = CameraConfig {
            base_fov: 175.0,
            ..Default::default()
        };
        assert!(wide.validate().is_err());
    }

    #[test]
    fn test_eye_height_follows_collider() {
        let mut effects = CameraEffects::new(CameraConfig::default());
        let mut snapshot = standing(0.0);

        let pose = effects.update(&snapshot, &[], 0.0, 0.0, DT);
        assert!((pose.eye_height - 1.8).abs() < 1e-5);

        snapshot.collider_height = 1.0;
        let pose = effects.update(&snapshot, &[], 0.0, DT, DT);
        assert!((pose.eye_height - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_no_bob_when_still_or_sliding() {
        let mut effects = CameraEffects::new(CameraConfig::default());
        for i in 0..60 {
            let pose = effects.update(&standing(0.0), &[], 0.0, i as f32 * DT, DT);
            assert_eq!(pose.local_offset, Vec3::ZERO);
        }

        let mut sliding = standing(12.0);
        sliding.sliding = true;
        for i in 0..60 {
            let pose = effects.update(&sliding, &[], 0.0, i as f32 * DT, DT);
            assert!(pose.local_offset.y.abs() < 1e-6);
        }
    }

    #[test]
    fn test_bob_while_walking() {
        let mut effects = CameraEffects::new(CameraConfig::default());
        let mut max_offset = 0.0_f32;
        for i in 0..120 {
            let pose = effects.update(&standing(7.0), &[], 0.0, i as f32 * DT, DT);
            max_offset = max_offset.max(pose.local_offset.y.abs());
        }
        assert!(max_offset > 0.02 && max_offset <= 0.05 + 1e-6);
    }

    #[test]
    fn test_slide_tilt_and_fov() {
        let mut effects = CameraEffects::new(CameraConfig::default());
        let mut sliding = standing(12.0);
        sliding.sliding = true;

        let mut pose = effects.update(&sliding, &[], 0.0, 0.0, DT);
        for i in 1..120 {
            pose = effects.update(&sliding, &[], 0.0, i as f32 * DT, DT);
        }
        assert!((pose.roll - 0.1).abs() < 1e-3);
        assert!((pose.fov - 100.0).abs() < 0.05);

        for i in 120..240 {
            pose = effects.update(&standing(0.0), &[], 0.0, i as f32 * DT, DT);
        }
        assert!(pose.roll.abs() < 1e-3);
        assert!((pose.fov - 90.0).abs() < 0.05);
    }

    #[test]
    fn test_lean_is_clamped_and_smoothed() {
        let mut effects = CameraEffects::new(CameraConfig::default());
        let first = effects.update(&standing(0.0), &[], 5.0, 0.0, DT);
        assert!(first.local_offset.x > 0.0 && first.local_offset.x < 0.4);

        let mut pose = first;
        for i in 1..120 {
            pose = effects.update(&standing(0.0), &[], 5.0, i as f32 * DT, DT);
        }
        assert!((pose.local_offset.x - 0.4).abs() < 1e-3);
        assert!((pose.roll - 0.26).abs() < 1e-3);
    }

    #[test]
    fn test_kick_hit_starts_shake_that_ends() {
        let mut effects = CameraEffects::new(CameraConfig::default());
        effects.update(&standing(0.0), &[kick_hit()], 0.0, 1.0, DT);

        let shake = effects.shake().expect("kick hit should start a shake");
        assert_eq!(shake.start, 1.0);
        assert!(shake.sample(1.1) > 0.0);

        let mut now = 1.0;
        while now < 1.5 {
            now += DT;
            effects.update(&standing(0.0), &[], 0.0, now, DT);
        }
        assert!(effects.shake().is_none());
        let pose = effects.update(&standing(0.0), &[], 0.0, now + DT, DT);
        assert_eq!(pose.local_offset, Vec3::ZERO);
    }

    #[test]
    fn test_timed_effect_fades() {
        let effect = TimedEffect::new(2.0, 0.5, 1.0);
        assert_eq!(effect.sample(1.9), 0.0);
        assert!((effect.sample(2.0) - 1.0).abs() < 1e-6);
        assert!((effect.sample(2.25) - 0.5).abs() < 1e-6);
        assert_eq!(effect.sample(2.5), 0.0);
        assert!(effect.is_finished(2.5));
        assert!(!effect.is_finished(2.4));
    }
}
