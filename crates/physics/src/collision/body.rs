//! Kinematic capsule character living in a [`CollisionWorld`].
//!
//! The body owns a feet position and a collider height. It moves with
//! collide-and-slide, detects ground with a short downward trace and answers
//! the capsule queries the locomotion controller needs.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;
use super::slide_move::{slide_move, step_slide_move};
use super::trace::{ShapeContact, TraceShape};
use super::world::{CollisionWorld, QueryError};

/// Radius shrink applied to headroom probes so walls touching the sides of
/// the collider do not count as blocking.
const HEADROOM_SIDE_SKIN: f32 = 0.02;

/// Upward displacement above which the body is considered to be leaving the ground.
const ASCENT_EPSILON: f32 = 1e-4;

/// Shape and collision-response settings for a character body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySettings {
    /// Collision radius (meters).
    pub radius: f32,

    /// Maximum ledge height climbed without jumping (meters).
    pub step_height: f32,

    /// Minimum surface normal Y to count as ground (cos of max slope angle).
    /// 0.7 ≈ 45 degrees
    pub min_ground_normal: f32,

    /// How far below the feet the ground probe looks (meters).
    pub ground_probe_distance: f32,

    /// Overbounce factor for displacement clipping (prevents sticking).
    pub overbounce: f32,

    /// Maximum collision planes handled per move.
    pub max_clip_planes: usize,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            radius: 0.5,
            step_height: 0.4,
            min_ground_normal: 0.7,
            ground_probe_distance: 0.06,
            overbounce: 1.001,
            max_clip_planes: 5,
        }
    }
}

/// A kinematic capsule character.
#[derive(Debug, Clone)]
pub struct CharacterBody {
    /// Feet position (bottom-center of the capsule).
    pub position: Vec3,

    /// Current collider height (meters).
    pub height: f32,

    pub settings: BodySettings,

    /// Disabled bodies refuse queries (despawned, teleporting, dead).
    pub enabled: bool,

    grounded: bool,
}

impl CharacterBody {
    /// Create a body standing at `position` with the given collider height.
    pub fn new(position: Vec3, height: f32, settings: BodySettings) -> Self {
        Self {
            position,
            height,
            settings,
            enabled: true,
            grounded: false,
        }
    }

    /// Current capsule shape.
    pub fn shape(&self) -> TraceShape {
        TraceShape::Capsule {
            radius: self.settings.radius,
            height: self.height,
        }
    }

    /// Ground contact as of the last move or refresh.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Move by `displacement`, sliding along geometry, then refresh ground contact.
    pub fn move_by(&mut self, world: &CollisionWorld, displacement: Vec3) {
        let shape = self.shape();

        if self.grounded {
            step_slide_move(world, &mut self.position, displacement, shape, &self.settings);
        } else {
            slide_move(world, &mut self.position, displacement, shape, &self.settings);
        }

        self.refresh_ground(world, displacement.y > ASCENT_EPSILON);
    }

    /// Re-evaluate ground contact without moving.
    ///
    /// Ground is ignored while ascending so a jump is not cancelled by the
    /// floor it just left.
    pub fn refresh_ground(&mut self, world: &CollisionWorld, ascending: bool) {
        if ascending {
            self.grounded = false;
            return;
        }

        let trace = world.trace(
            self.position,
            self.position - Vec3::Y * self.settings.ground_probe_distance,
            self.shape(),
            ContentFlags::MASK_PLAYER_SOLID,
        );

        self.grounded = trace
            .hit_normal
            .is_some_and(|normal| normal.y >= self.settings.min_ground_normal);
        if self.grounded {
            self.position = trace.end_position;
        }
    }

    /// Check that a capsule spanning `from_height..to_height` above the feet
    /// is free of blocking geometry. Trigger volumes never block.
    pub fn headroom_available(
        &self,
        world: &CollisionWorld,
        from_height: f32,
        to_height: f32,
        radius: f32,
    ) -> Result<bool, QueryError> {
        if to_height <= from_height {
            return Ok(true);
        }

        let radius = (radius - HEADROOM_SIDE_SKIN).max(0.01);
        let bottom = from_height + radius;
        let top = (to_height - radius).max(bottom);
        let probe = TraceShape::Segment {
            a: Vec3::new(0.0, bottom, 0.0),
            b: Vec3::new(0.0, top, 0.0),
            radius,
        };

        Ok(world
            .overlap(self.position, probe, ContentFlags::MASK_PLAYER_SOLID)?
            .is_none())
    }

    /// Overlap a capsule around the world-space segment `a..b`.
    pub fn overlap_capsule(
        world: &CollisionWorld,
        a: Vec3,
        b: Vec3,
        radius: f32,
        mask: ContentFlags,
    ) -> Result<Option<ShapeContact>, QueryError> {
        world.overlap(a, segment(a, b, radius), mask)
    }

    /// Sweep a capsule around the world-space segment `a..b` along `direction`.
    pub fn sweep_capsule(
        world: &CollisionWorld,
        a: Vec3,
        b: Vec3,
        radius: f32,
        direction: Vec3,
        distance: f32,
        mask: ContentFlags,
    ) -> Result<Option<ShapeContact>, QueryError> {
        world.sweep(a, direction, distance, segment(a, b, radius), mask)
    }
}

fn segment(a: Vec3, b: Vec3, radius: f32) -> TraceShape {
    TraceShape::Segment {
        a: Vec3::ZERO,
        b: b - a,
        radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );
        world
    }

    #[test]
    fn test_body_settles_on_floor() {
        let world = floor_world();
        let mut body = CharacterBody::new(Vec3::new(0.0, 0.3, 0.0), 2.0, BodySettings::default());

        for _ in 0..30 {
            body.move_by(&world, Vec3::new(0.0, -0.05, 0.0));
        }

        assert!(body.is_grounded());
        assert!(body.position.y.abs() < 0.01, "y={}", body.position.y);
    }

    #[test]
    fn test_ascending_body_is_not_grounded() {
        let world = floor_world();
        let mut body = CharacterBody::new(Vec3::ZERO, 2.0, BodySettings::default());
        body.refresh_ground(&world, false);
        assert!(body.is_grounded());

        body.move_by(&world, Vec3::new(0.0, 0.08, 0.0));
        assert!(!body.is_grounded());
    }

    #[test]
    fn test_headroom_blocked_by_low_ceiling() {
        let mut world = floor_world();
        // Ceiling underside at y=1.5
        world.add_box(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(3.0, 0.5, 3.0),
            ContentFlags::SOLID,
        );
        let body = CharacterBody::new(Vec3::ZERO, 1.0, BodySettings::default());

        assert!(!body.headroom_available(&world, 1.0, 2.0, 0.5).unwrap());
        assert!(body.headroom_available(&world, 0.5, 1.0, 0.5).unwrap());
    }

    #[test]
    fn test_headroom_ignores_triggers_and_side_walls() {
        let mut world = floor_world();
        world.add_box(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(3.0, 0.5, 3.0),
            ContentFlags::TRIGGER,
        );
        // Wall exactly touching the collider's side
        world.add_box(
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.5, 2.0, 3.0),
            ContentFlags::SOLID,
        );
        let body = CharacterBody::new(Vec3::ZERO, 1.0, BodySettings::default());

        assert!(body.headroom_available(&world, 1.0, 2.0, 0.5).unwrap());
    }
}
