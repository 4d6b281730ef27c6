//! Kick target resolution.
//!
//! The kick is a short capsule along the view direction, starting slightly
//! behind the eye. Anything already inside it is hit first; otherwise the
//! capsule is swept forward over `kick_range`. At most one path resolves.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::ShapeContact;

use super::config::AbilityConfig;
use super::events::KickPath;
use super::host::LocomotionHost;
use super::state::KickState;

/// World-space view origin and look direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl ViewRay {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Kick capsule segment endpoints for a normalized `direction`.
    pub fn kick_segment(&self, direction: Vec3, config: &AbilityConfig) -> (Vec3, Vec3) {
        let a = self.origin - direction * config.kick_back_offset;
        let b = a + direction * config.kick_reach;
        (a, b)
    }
}

/// Target found by a kick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickTarget {
    pub contact: ShapeContact,
    pub path: KickPath,
}

impl KickState {
    /// Whether the cooldown has elapsed.
    #[inline]
    pub fn ready(&self, now: f32, config: &AbilityConfig) -> bool {
        now - self.last_kick_time >= config.kick_cooldown
    }

    /// Decay recoil velocity.
    pub fn decay_recoil(&mut self, dt: f32, config: &AbilityConfig) {
        self.kick_velocity *= (-config.kick_recoil_decay * dt).exp();
        if self.kick_velocity.length_squared() < 1e-6 {
            self.kick_velocity = Vec3::ZERO;
        }
    }
}

/// Find what a kick along `direction` (normalized) would strike.
///
/// Query failures count as "nothing there".
pub fn resolve_target<H: LocomotionHost + ?Sized>(
    host: &H,
    view: &ViewRay,
    direction: Vec3,
    config: &AbilityConfig,
) -> Option<KickTarget> {
    let (a, b) = view.kick_segment(direction, config);

    match host.overlap_capsule(a, b, config.kick_radius, config.kick_mask) {
        Ok(Some(contact)) => {
            return Some(KickTarget {
                contact,
                path: KickPath::Overlap,
            })
        }
        Ok(None) => {}
        Err(err) => log::warn!("kick overlap query failed: {err}"),
    }

    match host.sweep_capsule(
        a,
        b,
        config.kick_radius,
        direction,
        config.kick_range,
        config.kick_mask,
    ) {
        Ok(hit) => hit.map(|contact| KickTarget {
            contact,
            path: KickPath::Sweep,
        }),
        Err(err) => {
            log::warn!("kick sweep query failed: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{BodySettings, CharacterBody, ColliderHandle, CollisionWorld, ContentFlags};
    use crate::movement::host::WorldHost;

    fn world_with_crate(at: Vec3) -> (CollisionWorld, ColliderHandle) {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(20.0, 0.5, 20.0),
            ContentFlags::SOLID,
        );
        let handle = world.add_body(at, Vec3::splat(0.4), 10.0);
        (world, handle)
    }

    #[test]
    fn test_cooldown() {
        let config = AbilityConfig::default();
        let mut state = KickState::default();
        assert!(state.ready(0.0, &config));

        state.last_kick_time = 1.0;
        assert!(!state.ready(1.2, &config));
        assert!(state.ready(1.5, &config));
    }

    #[test]
    fn test_recoil_decays_to_zero() {
        let config = AbilityConfig::default();
        let mut state = KickState {
            kick_velocity: Vec3::new(-6.0, 0.0, 0.0),
            ..Default::default()
        };

        let mut previous = state.kick_velocity.length();
        for _ in 0..600 {
            state.decay_recoil(1.0 / 60.0, &config);
            assert!(state.kick_velocity.length() <= previous);
            previous = state.kick_velocity.length();
        }
        assert_eq!(state.kick_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_overlap_wins_when_target_is_close() {
        let config = AbilityConfig::default();
        let (mut world, handle) = world_with_crate(Vec3::new(0.6, 1.1, 0.0));
        let mut body = CharacterBody::new(Vec3::new(-5.0, 0.0, 0.0), 2.0, BodySettings::default());
        let host = WorldHost::new(&mut world, &mut body);

        let view = ViewRay::new(Vec3::new(0.0, 1.5, 0.0), Vec3::X);
        let target = resolve_target(&host, &view, Vec3::X, &config).expect("crate in reach");

        assert_eq!(target.path, KickPath::Overlap);
        assert_eq!(target.contact.collider, handle);
    }

    #[test]
    fn test_sweep_finds_target_in_range() {
        let config = AbilityConfig::default();
        let (mut world, handle) = world_with_crate(Vec3::new(2.0, 1.1, 0.0));
        let mut body = CharacterBody::new(Vec3::new(-5.0, 0.0, 0.0), 2.0, BodySettings::default());
        let host = WorldHost::new(&mut world, &mut body);

        let view = ViewRay::new(Vec3::new(0.0, 1.5, 0.0), Vec3::X);
        let target = resolve_target(&host, &view, Vec3::X, &config).expect("crate in range");

        assert_eq!(target.path, KickPath::Sweep);
        assert_eq!(target.contact.collider, handle);
    }

    #[test]
    fn test_nothing_in_range() {
        let config = AbilityConfig::default();
        let (mut world, _) = world_with_crate(Vec3::new(6.0, 1.1, 0.0));
        let mut body = CharacterBody::new(Vec3::new(-5.0, 0.0, 0.0), 2.0, BodySettings::default());
        let host = WorldHost::new(&mut world, &mut body);

        let view = ViewRay::new(Vec3::new(0.0, 1.5, 0.0), Vec3::X);
        assert!(resolve_target(&host, &view, Vec3::X, &config).is_none());
    }
}
