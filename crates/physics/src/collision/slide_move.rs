//! Collide-and-slide for kinematic characters.
//!
//! Moves a shape by a desired displacement, sliding along every surface
//! it runs into and stepping over low ledges.

use glam::Vec3;

use super::body::BodySettings;
use super::flags::ContentFlags;
use super::trace::TraceShape;
use super::world::CollisionWorld;

/// Maximum number of collision planes to track during a slide.
const MAX_CLIP_PLANES: usize = 5;

/// Clip a displacement against a surface normal.
///
/// Removes the component going into the surface; `overbounce` above 1
/// leaves a small push away from it.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = velocity.dot(normal);

    let adjusted_backoff = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };

    velocity - normal * adjusted_backoff
}

/// Outcome of a slide.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideOutcome {
    /// Whether the whole displacement was applied without touching anything.
    pub unobstructed: bool,
    /// Most upward-facing normal touched during the slide.
    pub floor_normal: Option<Vec3>,
}

/// Slide `position` along `displacement`, clipping against each plane hit.
pub fn slide_move(
    world: &CollisionWorld,
    position: &mut Vec3,
    displacement: Vec3,
    shape: TraceShape,
    settings: &BodySettings,
) -> SlideOutcome {
    let mut remaining = displacement;
    let mut planes = [Vec3::ZERO; MAX_CLIP_PLANES];
    let mut num_planes = 0;
    let mut outcome = SlideOutcome::default();

    for _ in 0..settings.max_clip_planes.min(MAX_CLIP_PLANES) {
        if remaining.length_squared() < 1e-10 {
            break;
        }

        let trace = world.trace(
            *position,
            *position + remaining,
            shape,
            ContentFlags::MASK_PLAYER_SOLID,
        );

        if !trace.hit_something() {
            *position = trace.end_position;
            outcome.unobstructed = num_planes == 0;
            return outcome;
        }

        if trace.fraction > 0.0 {
            *position = trace.end_position;
        }

        remaining *= 1.0 - trace.fraction;

        let Some(normal) = trace.hit_normal else {
            break;
        };

        if trace.all_solid {
            return outcome;
        }

        if outcome.floor_normal.map_or(true, |n| normal.y > n.y) {
            outcome.floor_normal = Some(normal);
        }

        if num_planes < MAX_CLIP_PLANES {
            planes[num_planes] = normal;
            num_planes += 1;
        }

        // Find a clipped displacement that goes into none of the planes
        let mut found_valid = false;
        for i in 0..num_planes {
            let clipped = clip_velocity(remaining, planes[i], settings.overbounce);
            let valid = (0..num_planes)
                .filter(|&j| j != i)
                .all(|j| clipped.dot(planes[j]) >= -0.0001);

            if valid {
                remaining = clipped;
                found_valid = true;
                break;
            }
        }

        if !found_valid {
            if num_planes >= 2 {
                // Slide along the crease between the first two planes
                let crease = planes[0].cross(planes[1]).normalize_or_zero();
                remaining = crease * remaining.dot(crease);
            } else {
                return outcome;
            }
        }
    }

    outcome
}

/// Slide with stair stepping: when the plain slide is blocked, retry from
/// `step_height` higher and keep whichever result went further horizontally.
pub fn step_slide_move(
    world: &CollisionWorld,
    position: &mut Vec3,
    displacement: Vec3,
    shape: TraceShape,
    settings: &BodySettings,
) -> SlideOutcome {
    let start_position = *position;
    let outcome = slide_move(world, position, displacement, shape, settings);

    if outcome.unobstructed || displacement.y > 0.0 {
        return outcome;
    }

    let horizontal = |p: Vec3| Vec3::new(p.x - start_position.x, 0.0, p.z - start_position.z);
    let plain_dist_sq = horizontal(*position).length_squared();

    let up_trace = world.trace(
        start_position,
        start_position + Vec3::Y * settings.step_height,
        shape,
        ContentFlags::MASK_PLAYER_SOLID,
    );
    if up_trace.all_solid {
        return outcome;
    }

    let mut stepped = up_trace.end_position;
    let flat = Vec3::new(displacement.x, 0.0, displacement.z);
    slide_move(world, &mut stepped, flat, shape, settings);

    let down_trace = world.trace(
        stepped,
        stepped - Vec3::Y * (settings.step_height + 0.01),
        shape,
        ContentFlags::MASK_PLAYER_SOLID,
    );
    let landed_on_floor = down_trace
        .hit_normal
        .is_some_and(|n| n.y >= settings.min_ground_normal);

    if !down_trace.all_solid && landed_on_floor {
        stepped = down_trace.end_position;
        if horizontal(stepped).length_squared() > plain_dist_sq {
            *position = stepped;
            return SlideOutcome {
                unobstructed: false,
                floor_normal: down_trace.hit_normal,
            };
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capsule() -> TraceShape {
        TraceShape::Capsule {
            radius: 0.4,
            height: 1.8,
        }
    }

    #[test]
    fn test_clip_removes_motion_into_floor() {
        let falling = Vec3::new(3.0, -4.0, 0.0);

        let clipped = clip_velocity(falling, Vec3::Y, 1.0);
        assert!(clipped.y.abs() < 1e-6);
        assert_eq!(clipped.x, 3.0);

        // Overbounce pushes slightly away from the surface
        let bounced = clip_velocity(falling, Vec3::Y, 1.01);
        assert!(bounced.y > 0.0);
    }

    #[test]
    fn test_open_space_is_unobstructed() {
        let world = CollisionWorld::new();
        let settings = BodySettings::default();
        let displacement = Vec3::new(2.0, 0.5, -1.0);

        let mut position = Vec3::new(0.0, 3.0, 0.0);
        let outcome = slide_move(&world, &mut position, displacement, capsule(), &settings);

        assert!(outcome.unobstructed);
        assert!(outcome.floor_normal.is_none());
        assert!((position - Vec3::new(2.0, 3.5, -1.0)).length() < 1e-4);
    }

    #[test]
    fn test_slide_move_along_wall() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(5.5, 2.0, 0.0),
            Vec3::new(0.5, 2.0, 10.0),
            ContentFlags::SOLID,
        );
        let settings = BodySettings::default();

        let mut position = Vec3::new(0.0, 0.1, 0.0);
        slide_move(&world, &mut position, Vec3::new(10.0, 0.0, 5.0), capsule(), &settings);

        assert!(position.x < 4.61, "x={} should stop before the wall", position.x);
        assert!(position.z > 1.0, "z={} should keep sliding along the wall", position.z);
    }

    #[test]
    fn test_step_slide_climbs_low_ledge() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );
        // 30cm ledge starting at x=1
        world.add_box(
            Vec3::new(6.0, 0.15, 0.0),
            Vec3::new(5.0, 0.15, 5.0),
            ContentFlags::SOLID,
        );
        let settings = BodySettings::default();

        let mut position = Vec3::ZERO;
        step_slide_move(&world, &mut position, Vec3::new(1.5, 0.0, 0.0), capsule(), &settings);

        assert!(position.x > 1.2, "x={} should have stepped forward", position.x);
        assert!(position.y > 0.25, "y={} should be on top of the ledge", position.y);
    }
}
