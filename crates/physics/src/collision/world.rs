//! Collision world containing static brushes and dynamic bodies.
//!
//! The world answers overlap, trace and sweep queries with parry3d shapes
//! and integrates dynamic bodies that have been pushed by impulses.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real};
use parry3d::query::{contact, Contact};
use parry3d::shape::SharedShape;
use thiserror::Error;

use super::flags::ContentFlags;
use super::trace::{ColliderHandle, ShapeContact, TraceResult, TraceShape};

/// Penetration depth below which two shapes count as touching, not overlapping.
pub const CONTACT_SKIN: f32 = 0.001;

/// Bisection iterations used to refine a blocked sweep (~0.025% precision).
const BISECT_ITERATIONS: usize = 12;

/// Upper bound on marching steps for a single sweep.
const MAX_SWEEP_STEPS: usize = 64;

/// Errors raised by shape queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unsupported shape pair in collision query")]
    UnsupportedShapes,
}

/// A static piece of collision geometry.
#[derive(Debug, Clone)]
pub struct StaticBrush {
    pub id: u32,
    pub shape: SharedShape,
    pub transform: Isometry<Real>,
    pub contents: ContentFlags,
}

/// A box-shaped rigid body that reacts to impulses and gravity.
///
/// Only linear motion is simulated; impulses applied off-center do not
/// produce rotation.
#[derive(Debug, Clone)]
pub struct DynamicBody {
    pub id: u32,
    /// Bottom-center position in world space.
    pub position: Vec3,
    pub half_extents: Vec3,
    /// Linear velocity (meters/second).
    pub velocity: Vec3,
    /// Mass (kilograms).
    pub mass: f32,
    /// Exponential damping rate applied to horizontal velocity.
    pub linear_damping: f32,
    shape: SharedShape,
}

impl DynamicBody {
    fn trace_shape(&self) -> TraceShape {
        TraceShape::Box {
            half_extents: self.half_extents,
        }
    }

    fn transform(&self) -> Isometry<Real> {
        Isometry::translation(
            self.position.x,
            self.position.y + self.half_extents.y,
            self.position.z,
        )
    }
}

/// The collision world.
#[derive(Debug)]
pub struct CollisionWorld {
    brushes: Vec<StaticBrush>,
    bodies: Vec<DynamicBody>,
    next_id: u32,
    /// Signed gravity applied to dynamic bodies (meters/second²).
    pub gravity: f32,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            bodies: Vec::new(),
            next_id: 0,
            gravity: -9.81,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// `center` is the box center; `contents` decides which queries see it.
    pub fn add_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        contents: ContentFlags,
    ) -> ColliderHandle {
        let id = self.allocate_id();

        self.brushes.push(StaticBrush {
            id,
            shape: SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            transform: Isometry::translation(center.x, center.y, center.z),
            contents,
        });

        ColliderHandle::Static(id)
    }

    /// Add a dynamic box body resting with its bottom-center at `position`.
    pub fn add_body(&mut self, position: Vec3, half_extents: Vec3, mass: f32) -> ColliderHandle {
        let id = self.allocate_id();

        self.bodies.push(DynamicBody {
            id,
            position,
            half_extents,
            velocity: Vec3::ZERO,
            mass: mass.max(f32::EPSILON),
            linear_damping: 2.0,
            shape: SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
        });

        ColliderHandle::Dynamic(id)
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of static brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Number of dynamic bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Look up a dynamic body.
    pub fn body(&self, handle: ColliderHandle) -> Option<&DynamicBody> {
        match handle {
            ColliderHandle::Dynamic(id) => self.bodies.iter().find(|b| b.id == id),
            ColliderHandle::Static(_) => None,
        }
    }

    /// Apply a world-space impulse to a collider.
    ///
    /// Returns `false` when the collider has no dynamic body to push.
    pub fn apply_impulse(&mut self, handle: ColliderHandle, impulse: Vec3, point: Vec3) -> bool {
        let ColliderHandle::Dynamic(id) = handle else {
            return false;
        };
        let Some(body) = self.bodies.iter_mut().find(|b| b.id == id) else {
            return false;
        };

        body.velocity += impulse / body.mass;
        log::debug!(
            "impulse {:?} at {:?} on body {} -> velocity {:?}",
            impulse,
            point,
            id,
            body.velocity
        );
        true
    }

    /// Advance dynamic bodies by one step.
    ///
    /// Bodies fall under gravity, lose horizontal speed through damping and
    /// slide along whatever they run into.
    pub fn step_bodies(&mut self, delta_time: f32) {
        for index in 0..self.bodies.len() {
            let (handle, position, mut velocity, shape, damping) = {
                let body = &self.bodies[index];
                (
                    ColliderHandle::Dynamic(body.id),
                    body.position,
                    body.velocity,
                    body.trace_shape(),
                    body.linear_damping,
                )
            };

            velocity.y += self.gravity * delta_time;
            let decay = (-damping * delta_time).exp();
            velocity.x *= decay;
            velocity.z *= decay;

            // Horizontal then vertical, so resting contact never blocks sliding
            let mut position = position;
            let legs = [
                Vec3::new(velocity.x, 0.0, velocity.z) * delta_time,
                Vec3::new(0.0, velocity.y, 0.0) * delta_time,
            ];
            for leg in legs {
                if leg.length_squared() < 1e-10 {
                    continue;
                }
                let trace = self.trace_excluding(
                    position,
                    position + leg,
                    shape,
                    ContentFlags::MASK_BODY_SOLID,
                    Some(handle),
                );
                position = trace.end_position;

                if let Some(normal) = trace.hit_normal {
                    let into = velocity.dot(normal);
                    if into < 0.0 {
                        velocity -= normal * into;
                    }
                }
            }
            if velocity.length_squared() < 1e-4 {
                velocity = Vec3::ZERO;
            }

            let body = &mut self.bodies[index];
            body.position = position;
            body.velocity = velocity;
        }
    }

    /// Check if a shape at `position` overlaps anything matching `mask`.
    ///
    /// Unsupported shape pairs count as solid.
    pub fn point_in_solid(&self, position: Vec3, shape: TraceShape, mask: ContentFlags) -> bool {
        self.point_in_solid_excluding(position, shape, mask, None)
    }

    fn point_in_solid_excluding(
        &self,
        position: Vec3,
        shape: TraceShape,
        mask: ContentFlags,
        exclude: Option<ColliderHandle>,
    ) -> bool {
        match self.overlap_excluding(position, shape, mask, exclude) {
            Ok(found) => found.is_some(),
            Err(err) => {
                log::warn!("treating position {:?} as solid: {}", position, err);
                true
            }
        }
    }

    /// Find the first collider (in storage order) that a shape overlaps.
    ///
    /// Static brushes are visited before dynamic bodies.
    pub fn overlap(
        &self,
        position: Vec3,
        shape: TraceShape,
        mask: ContentFlags,
    ) -> Result<Option<ShapeContact>, QueryError> {
        self.overlap_excluding(position, shape, mask, None)
    }

    fn overlap_excluding(
        &self,
        position: Vec3,
        shape: TraceShape,
        mask: ContentFlags,
        exclude: Option<ColliderHandle>,
    ) -> Result<Option<ShapeContact>, QueryError> {
        let (test_shape, test_transform) = parry_shape(position, shape);

        for (handle, other_shape, other_transform) in self.colliders(mask, exclude) {
            if let Some(found) = penetration(&test_transform, &test_shape, &other_transform, other_shape)? {
                return Ok(Some(ShapeContact {
                    collider: handle,
                    point: to_vec3(found.point2),
                    distance: 0.0,
                }));
            }
        }

        Ok(None)
    }

    /// Trace a shape from `start` to `end` and report the first blocking hit.
    pub fn trace(&self, start: Vec3, end: Vec3, shape: TraceShape, mask: ContentFlags) -> TraceResult {
        self.trace_excluding(start, end, shape, mask, None)
    }

    fn trace_excluding(
        &self,
        start: Vec3,
        end: Vec3,
        shape: TraceShape,
        mask: ContentFlags,
        exclude: Option<ColliderHandle>,
    ) -> TraceResult {
        let delta = end - start;
        let distance = delta.length();
        let started_in_solid = self.point_in_solid_excluding(start, shape, mask, exclude);

        // No movement - just check if the position is valid
        if distance < 0.0001 {
            return if started_in_solid {
                TraceResult {
                    fraction: 0.0,
                    end_position: start,
                    hit_normal: Some(Vec3::Y),
                    hit_contents: ContentFlags::SOLID,
                    hit_collider: None,
                    started_in_solid: true,
                    all_solid: true,
                }
            } else {
                TraceResult::no_hit(start)
            };
        }

        // Already stuck: allow any move that ends somewhere clear
        if started_in_solid {
            if !self.point_in_solid_excluding(end, shape, mask, exclude) {
                let mut result = TraceResult::no_hit(end);
                result.started_in_solid = true;
                return result;
            }
            let mut result = TraceResult::hit(0.0, start, self.push_out_normal(start, shape, mask, exclude, delta / distance));
            result.started_in_solid = true;
            result.all_solid = true;
            return result;
        }

        let Some((lo, hi)) = self.first_blocked(start, end, shape, mask, exclude) else {
            return TraceResult::no_hit(end);
        };

        let end_position = start + delta * lo;
        let blocked_at = start + delta * hi;
        let hit = self
            .overlap_excluding(blocked_at, shape, mask, exclude)
            .ok()
            .flatten();

        TraceResult {
            fraction: lo,
            end_position,
            hit_normal: Some(self.push_out_normal(blocked_at, shape, mask, exclude, delta / distance)),
            hit_contents: hit
                .map(|h| self.contents_of(h.collider))
                .unwrap_or(ContentFlags::SOLID),
            hit_collider: hit.map(|h| h.collider),
            started_in_solid: false,
            all_solid: false,
        }
    }

    /// Sweep a shape along `direction` for `distance` and return the first contact.
    pub fn sweep(
        &self,
        start: Vec3,
        direction: Vec3,
        distance: f32,
        shape: TraceShape,
        mask: ContentFlags,
    ) -> Result<Option<ShapeContact>, QueryError> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || distance <= 0.0 {
            return self.overlap(start, shape, mask);
        }

        let end = start + direction * distance;
        let Some((lo, hi)) = self.try_first_blocked(start, end, shape, mask, None)? else {
            return Ok(None);
        };

        let blocked_at = start + direction * distance * hi;
        Ok(self.overlap(blocked_at, shape, mask)?.map(|found| ShapeContact {
            distance: distance * lo,
            ..found
        }))
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn colliders(
        &self,
        mask: ContentFlags,
        exclude: Option<ColliderHandle>,
    ) -> impl Iterator<Item = (ColliderHandle, &SharedShape, Isometry<Real>)> + '_ {
        let statics = self
            .brushes
            .iter()
            .filter(move |brush| mask.intersects(brush.contents))
            .map(|brush| (ColliderHandle::Static(brush.id), &brush.shape, brush.transform));

        let dynamics = self
            .bodies
            .iter()
            .filter(move |_| mask.intersects(ContentFlags::DYNAMIC_BODY))
            .map(|body| (ColliderHandle::Dynamic(body.id), &body.shape, body.transform()));

        statics
            .chain(dynamics)
            .filter(move |(handle, _, _)| Some(*handle) != exclude)
    }

    fn contents_of(&self, handle: ColliderHandle) -> ContentFlags {
        match handle {
            ColliderHandle::Static(id) => self
                .brushes
                .iter()
                .find(|b| b.id == id)
                .map(|b| b.contents)
                .unwrap_or(ContentFlags::SOLID),
            ColliderHandle::Dynamic(_) => ContentFlags::DYNAMIC_BODY,
        }
    }

    fn first_blocked(
        &self,
        start: Vec3,
        end: Vec3,
        shape: TraceShape,
        mask: ContentFlags,
        exclude: Option<ColliderHandle>,
    ) -> Option<(f32, f32)> {
        match self.try_first_blocked(start, end, shape, mask, exclude) {
            Ok(found) => found,
            Err(err) => {
                log::warn!("trace blocked at start: {}", err);
                Some((0.0, 0.0))
            }
        }
    }

    /// March along the path in steps no longer than half the shape's smallest
    /// extent, then bisect the first blocked step. Returns `(clear, blocked)`
    /// path fractions.
    fn try_first_blocked(
        &self,
        start: Vec3,
        end: Vec3,
        shape: TraceShape,
        mask: ContentFlags,
        exclude: Option<ColliderHandle>,
    ) -> Result<Option<(f32, f32)>, QueryError> {
        let delta = end - start;
        let step = (shape.min_extent() * 0.5).max(0.05);
        let steps = ((delta.length() / step).ceil() as usize).clamp(1, MAX_SWEEP_STEPS);

        let solid_at = |fraction: f32| -> Result<bool, QueryError> {
            Ok(self
                .overlap_excluding(start + delta * fraction, shape, mask, exclude)?
                .is_some())
        };

        let mut clear = 0.0_f32;
        for i in 1..=steps {
            let sample = i as f32 / steps as f32;
            if !solid_at(sample)? {
                clear = sample;
                continue;
            }

            let mut lo = clear;
            let mut hi = sample;
            for _ in 0..BISECT_ITERATIONS {
                let mid = (lo + hi) * 0.5;
                if solid_at(mid)? {
                    hi = mid;
                } else {
                    lo = mid;
                }
            }
            return Ok(Some((lo, hi)));
        }

        Ok(None)
    }

    fn push_out_normal(
        &self,
        position: Vec3,
        shape: TraceShape,
        mask: ContentFlags,
        exclude: Option<ColliderHandle>,
        direction: Vec3,
    ) -> Vec3 {
        let push = self.penetration_correction(position, shape, mask, exclude);
        if push.length_squared() > 1e-8 {
            push.normalize()
        } else {
            // Default to opposite of movement direction (projected to horizontal)
            let horizontal = Vec3::new(-direction.x, 0.0, -direction.z);
            if horizontal.length_squared() > 0.1 {
                horizontal.normalize()
            } else {
                Vec3::Y
            }
        }
    }

    fn penetration_correction(
        &self,
        position: Vec3,
        shape: TraceShape,
        mask: ContentFlags,
        exclude: Option<ColliderHandle>,
    ) -> Vec3 {
        let (test_shape, test_transform) = parry_shape(position, shape);
        let mut correction = Vec3::ZERO;

        for (_, other_shape, other_transform) in self.colliders(mask, exclude) {
            if let Ok(Some(found)) = contact(
                &test_transform,
                test_shape.as_ref(),
                &other_transform,
                other_shape.as_ref(),
                0.0,
            ) {
                let depth = -found.dist;
                if depth > 0.0 {
                    // normal2 points out of the other collider
                    let normal = to_vec3_dir(found.normal2.into_inner());
                    correction += normal * (depth + CONTACT_SKIN);
                }
            }
        }

        correction
    }
}

/// Returns the contact when the two shapes penetrate deeper than [`CONTACT_SKIN`].
fn penetration(
    test_transform: &Isometry<Real>,
    test_shape: &SharedShape,
    other_transform: &Isometry<Real>,
    other_shape: &SharedShape,
) -> Result<Option<Contact>, QueryError> {
    let found = contact(
        test_transform,
        test_shape.as_ref(),
        other_transform,
        other_shape.as_ref(),
        0.0,
    )
    .map_err(|_| QueryError::UnsupportedShapes)?;

    Ok(found.filter(|c| c.dist < -CONTACT_SKIN))
}

/// Build the parry3d shape and transform for a trace shape at a position.
fn parry_shape(position: Vec3, shape: TraceShape) -> (SharedShape, Isometry<Real>) {
    match shape {
        TraceShape::Capsule { radius, height } => {
            // Parry capsule is defined by half-height of the cylinder part
            let cylinder_half_height = (height - 2.0 * radius).max(0.0) / 2.0;
            (
                SharedShape::capsule_y(cylinder_half_height, radius),
                Isometry::translation(position.x, position.y + height / 2.0, position.z),
            )
        }
        TraceShape::Box { half_extents } => (
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            Isometry::translation(position.x, position.y + half_extents.y, position.z),
        ),
        TraceShape::Segment { a, b, radius } => (
            SharedShape::capsule(to_point(a), to_point(b), radius),
            Isometry::translation(position.x, position.y, position.z),
        ),
        // Use a tiny sphere for point traces
        TraceShape::Point => (
            SharedShape::ball(0.001),
            Isometry::translation(position.x, position.y, position.z),
        ),
    }
}

fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

fn to_vec3(p: Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

fn to_vec3_dir(v: parry3d::math::Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

// ============================================================================
// Tests
// ============================================================================
