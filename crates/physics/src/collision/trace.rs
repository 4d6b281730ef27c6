//! Trace results, contacts and shapes for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;

/// Handle to a collider stored in a [`CollisionWorld`](super::CollisionWorld).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderHandle {
    /// Static brush (walls, floors, triggers). Never moves.
    Static(u32),
    /// Dynamic rigid body. Accepts impulses.
    Dynamic(u32),
}

impl ColliderHandle {
    /// Whether the collider carries a dynamic physical body.
    #[inline]
    pub fn is_dynamic(self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

/// Outcome of moving a shape from a start to an end position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    /// Fraction of the path that was clear: `1.0` means unobstructed.
    pub fraction: f32,

    /// Where the shape came to rest.
    pub end_position: Vec3,

    /// Surface normal at the blocking contact, pointing toward the mover.
    pub hit_normal: Option<Vec3>,

    pub hit_contents: ContentFlags,

    pub hit_collider: Option<ColliderHandle>,

    /// The shape already overlapped geometry at the start position.
    pub started_in_solid: bool,

    /// The shape could not move at all.
    pub all_solid: bool,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO)
    }
}

impl TraceResult {
    /// Unobstructed trace ending at `end_position`.
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_normal: None,
            hit_contents: ContentFlags::EMPTY,
            hit_collider: None,
            started_in_solid: false,
            all_solid: false,
        }
    }

    /// Blocked trace stopped at `fraction` of the path.
    pub fn hit(fraction: f32, end_position: Vec3, normal: Vec3) -> Self {
        Self {
            hit_normal: Some(normal),
            hit_contents: ContentFlags::SOLID,
            fraction,
            ..Self::no_hit(end_position)
        }
    }

    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }

    /// Blocking normal, or straight up for unobstructed traces.
    #[inline]
    pub fn normal_or_up(&self) -> Vec3 {
        self.hit_normal.unwrap_or(Vec3::Y)
    }
}

/// A collider touched by an overlap or sweep query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeContact {
    /// The collider that was touched.
    pub collider: ColliderHandle,
    /// World-space point on the touched collider.
    pub point: Vec3,
    /// Distance travelled along the sweep direction before contact (0 for overlaps).
    pub distance: f32,
}

/// Query shape.
///
/// Positions passed alongside a shape refer to its bottom-center, except
/// for [`TraceShape::Segment`] whose endpoints are offsets from the position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TraceShape {
    /// Upright capsule; `height` spans both caps.
    Capsule { radius: f32, height: f32 },

    /// Axis-aligned box resting on the position.
    Box { half_extents: Vec3 },

    /// Capsule around an arbitrary segment, given relative to the position.
    Segment { a: Vec3, b: Vec3, radius: f32 },

    /// Probe point. Queried as a 1 mm ball.
    Point,
}

impl TraceShape {
    /// Smallest feature size, used to pick the sweep step length.
    pub fn min_extent(&self) -> f32 {
        match self {
            Self::Capsule { radius, .. } | Self::Segment { radius, .. } => *radius,
            Self::Box { half_extents } => half_extents.min_element(),
            Self::Point => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unobstructed_trace() {
        let result = TraceResult::no_hit(Vec3::new(0.0, 3.0, 0.0));
        assert!(!result.hit_something());
        assert_eq!(result.normal_or_up(), Vec3::Y);
        assert!(result.hit_collider.is_none());
    }

    #[test]
    fn test_blocked_trace_keeps_normal() {
        let result = TraceResult::hit(0.25, Vec3::new(1.0, 0.0, 0.0), Vec3::NEG_X);
        assert!(result.hit_something());
        assert_eq!(result.fraction, 0.25);
        assert_eq!(result.normal_or_up(), Vec3::NEG_X);
        assert!(!result.started_in_solid);
    }

    #[test]
    fn test_min_extent() {
        let segment = TraceShape::Segment {
            a: Vec3::ZERO,
            b: Vec3::Y,
            radius: 0.25,
        };
        assert_eq!(segment.min_extent(), 0.25);

        let slab = TraceShape::Box {
            half_extents: Vec3::new(2.0, 0.1, 1.0),
        };
        assert!((slab.min_extent() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_collider_handle_kind() {
        assert!(ColliderHandle::Dynamic(3).is_dynamic());
        assert!(!ColliderHandle::Static(3).is_dynamic());
    }
}
