//! Level construction.

use glam::Vec3;
use kickstep_physics::{ColliderHandle, CollisionWorld, ContentFlags};
use serde::{Deserialize, Serialize};

/// A level containing collision geometry and spawn points.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world for physics.
    pub collision: CollisionWorld,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,

    /// Kickable bodies, in creation order.
    pub crates: Vec<ColliderHandle>,
}

/// A spawn point for the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Feet position in world space.
    pub position: Vec3,

    /// Initial facing direction (yaw in radians).
    pub facing: f32,
}

/// Landmarks of [`Level::test_arena`].
pub mod arena {
    /// Tunnel spans `x` in this range.
    pub const TUNNEL_START_X: f32 = 10.0;
    pub const TUNNEL_END_X: f32 = 16.0;

    /// Underside of the tunnel ceiling. Between crouch and standing height.
    pub const TUNNEL_CEILING_Y: f32 = 1.4;

    /// Half-size of the arena floor.
    pub const HALF_SIZE: f32 = 30.0;
}

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
            crates: Vec::new(),
        }
    }

    /// Add a flat floor with its top face at `y = 0`.
    pub fn add_floor(&mut self, half_size: f32) {
        self.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(half_size, 0.5, half_size),
            ContentFlags::SOLID,
        );
    }

    /// Add a dynamic crate resting with its bottom-center at `position`.
    pub fn add_crate(&mut self, position: Vec3, half_extents: Vec3, mass: f32) -> ColliderHandle {
        let handle = self.collision.add_body(position, half_extents, mass);
        self.crates.push(handle);
        handle
    }

    /// Create the development arena.
    ///
    /// Spawn faces +X down a clear lane into a crawl tunnel whose ceiling is
    /// too low to stand under. A trigger volume fills the tunnel and must
    /// never block standing or walking. Crates sit beside the lane.
    pub fn test_arena() -> Self {
        use arena::*;

        let mut level = Self::new("test_arena", "Test Arena");
        level.add_floor(HALF_SIZE);

        // Walls
        let wall_height = 5.0;
        let wall_thickness = 0.5;
        for (center, half) in [
            (
                Vec3::new(0.0, wall_height / 2.0, -HALF_SIZE),
                Vec3::new(HALF_SIZE, wall_height / 2.0, wall_thickness),
            ),
            (
                Vec3::new(0.0, wall_height / 2.0, HALF_SIZE),
                Vec3::new(HALF_SIZE, wall_height / 2.0, wall_thickness),
            ),
            (
                Vec3::new(HALF_SIZE, wall_height / 2.0, 0.0),
                Vec3::new(wall_thickness, wall_height / 2.0, HALF_SIZE),
            ),
            (
                Vec3::new(-HALF_SIZE, wall_height / 2.0, 0.0),
                Vec3::new(wall_thickness, wall_height / 2.0, HALF_SIZE),
            ),
        ] {
            level.collision.add_box(center, half, ContentFlags::SOLID);
        }

        // Crawl tunnel: ceiling slab plus side walls
        let tunnel_half_length = (TUNNEL_END_X - TUNNEL_START_X) / 2.0;
        let tunnel_center_x = TUNNEL_START_X + tunnel_half_length;
        level.collision.add_box(
            Vec3::new(tunnel_center_x, TUNNEL_CEILING_Y + 0.5, 0.0),
            Vec3::new(tunnel_half_length, 0.5, 2.0),
            ContentFlags::SOLID,
        );
        for side in [-2.5, 2.5] {
            level.collision.add_box(
                Vec3::new(tunnel_center_x, TUNNEL_CEILING_Y / 2.0, side),
                Vec3::new(tunnel_half_length, TUNNEL_CEILING_Y / 2.0, 0.5),
                ContentFlags::SOLID,
            );
        }
        level.collision.add_box(
            Vec3::new(tunnel_center_x, TUNNEL_CEILING_Y / 2.0, 0.0),
            Vec3::new(tunnel_half_length, TUNNEL_CEILING_Y / 2.0, 1.0),
            ContentFlags::TRIGGER,
        );

        // Crates beside the lane
        level.add_crate(Vec3::new(5.0, 0.0, 6.0), Vec3::splat(0.5), 20.0);
        level.add_crate(Vec3::new(5.0, 0.0, -6.0), Vec3::splat(0.5), 20.0);
        level.add_crate(Vec3::new(-6.0, 0.0, 4.0), Vec3::new(0.4, 0.8, 0.4), 8.0);

        // Spawn points
        level.spawn_points.push(SpawnPoint {
            position: Vec3::ZERO,
            facing: 0.0,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(-20.0, 0.0, 0.0),
            facing: 0.0,
        });

        level
    }

    /// Get a spawn point, falling back to the origin.
    pub fn spawn(&self, index: usize) -> SpawnPoint {
        self.spawn_points.get(index).copied().unwrap_or(SpawnPoint {
            position: Vec3::ZERO,
            facing: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickstep_physics::{BodySettings, CharacterBody};

    #[test]
    fn test_level_creation() {
        let level = Level::new("test", "Test Level");
        assert_eq!(level.id, "test");
        assert_eq!(level.collision.brush_count(), 0);
        assert_eq!(level.spawn(3).position, Vec3::ZERO);
    }

    #[test]
    fn test_test_arena() {
        let level = Level::test_arena();
        assert!(level.collision.brush_count() > 0);
        assert_eq!(level.collision.body_count(), 3);
        assert_eq!(level.crates.len(), 3);
        assert!(level.spawn_points.len() >= 2);
    }

    #[test]
    fn test_tunnel_blocks_standing_but_not_crouching() {
        let level = Level::test_arena();
        let inside = Vec3::new(13.0, 0.0, 0.0);
        let body = CharacterBody::new(inside, 1.0, BodySettings::default());

        assert!(!body
            .headroom_available(&level.collision, 1.0, 2.0, 0.5)
            .unwrap());
        assert!(body
            .headroom_available(&level.collision, 0.2, 0.9, 0.3)
            .unwrap());
    }

    #[test]
    fn test_spawn_is_clear() {
        let level = Level::test_arena();
        let body = CharacterBody::new(level.spawn(0).position, 2.0, BodySettings::default());
        assert!(body
            .headroom_available(&level.collision, 0.5, 2.0, 0.5)
            .unwrap());
    }
}
