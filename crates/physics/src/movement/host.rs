//! The collaborator seam between the locomotion core and the physics host.
//!
//! The controller never reaches into a scene: everything it needs from the
//! world comes through [`LocomotionHost`], passed in by the caller each tick.

use glam::Vec3;
use thiserror::Error;

use crate::collision::{
    CharacterBody, ColliderHandle, CollisionWorld, ContentFlags, QueryError, ShapeContact,
};

/// A host query could not be answered.
///
/// The controller fails closed on these: not grounded, no headroom, no contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("character body is disabled")]
    BodyDisabled,

    #[error("collision query failed: {0}")]
    Query(#[from] QueryError),
}

/// Physical queries and actions the locomotion controller delegates.
pub trait LocomotionHost {
    /// Whether the character touches walkable ground this tick.
    fn is_grounded(&self) -> Result<bool, ProbeError>;

    /// Whether a capsule between `from_height` and `to_height` above the feet
    /// is free of blocking geometry (trigger volumes ignored).
    fn headroom_available(
        &self,
        from_height: f32,
        to_height: f32,
        radius: f32,
    ) -> Result<bool, ProbeError>;

    /// First collider overlapping a capsule around the world-space segment `a..b`.
    fn overlap_capsule(
        &self,
        a: Vec3,
        b: Vec3,
        radius: f32,
        mask: ContentFlags,
    ) -> Result<Option<ShapeContact>, ProbeError>;

    /// First collider hit when sweeping the capsule `a..b` along `direction`.
    fn sweep_capsule(
        &self,
        a: Vec3,
        b: Vec3,
        radius: f32,
        direction: Vec3,
        distance: f32,
        mask: ContentFlags,
    ) -> Result<Option<ShapeContact>, ProbeError>;

    /// Move the character by `delta`, respecting collision.
    ///
    /// Returns the displacement actually applied.
    fn move_by(&mut self, delta: Vec3) -> Vec3;

    /// Resize the character collider, keeping the feet anchored.
    fn set_collider_height(&mut self, height: f32);

    /// Push a collider. Returns `false` when it has no dynamic body.
    fn apply_impulse(&mut self, target: ColliderHandle, impulse: Vec3, point: Vec3) -> bool;
}

/// [`LocomotionHost`] backed by a [`CharacterBody`] inside a [`CollisionWorld`].
pub struct WorldHost<'a> {
    pub world: &'a mut CollisionWorld,
    pub body: &'a mut CharacterBody,
}

impl<'a> WorldHost<'a> {
    pub fn new(world: &'a mut CollisionWorld, body: &'a mut CharacterBody) -> Self {
        Self { world, body }
    }

    fn ensure_enabled(&self) -> Result<(), ProbeError> {
        if self.body.enabled {
            Ok(())
        } else {
            Err(ProbeError::BodyDisabled)
        }
    }
}

impl LocomotionHost for WorldHost<'_> {
    fn is_grounded(&self) -> Result<bool, ProbeError> {
        self.ensure_enabled()?;
        Ok(self.body.is_grounded())
    }

    fn headroom_available(
        &self,
        from_height: f32,
        to_height: f32,
        radius: f32,
    ) -> Result<bool, ProbeError> {
        self.ensure_enabled()?;
        Ok(self
            .body
            .headroom_available(&*self.world, from_height, to_height, radius)?)
    }

    fn overlap_capsule(
        &self,
        a: Vec3,
        b: Vec3,
        radius: f32,
        mask: ContentFlags,
    ) -> Result<Option<ShapeContact>, ProbeError> {
        self.ensure_enabled()?;
        Ok(CharacterBody::overlap_capsule(&*self.world, a, b, radius, mask)?)
    }

    fn sweep_capsule(
        &self,
        a: Vec3,
        b: Vec3,
        radius: f32,
        direction: Vec3,
        distance: f32,
        mask: ContentFlags,
    ) -> Result<Option<ShapeContact>, ProbeError> {
        self.ensure_enabled()?;
        Ok(CharacterBody::sweep_capsule(
            &*self.world,
            a,
            b,
            radius,
            direction,
            distance,
            mask,
        )?)
    }

    fn move_by(&mut self, delta: Vec3) -> Vec3 {
        if !self.body.enabled {
            return Vec3::ZERO;
        }
        let start = self.body.position;
        self.body.move_by(self.world, delta);
        self.body.position - start
    }

    fn set_collider_height(&mut self, height: f32) {
        self.body.height = height;
    }

    fn apply_impulse(&mut self, target: ColliderHandle, impulse: Vec3, point: Vec3) -> bool {
        self.world.apply_impulse(target, impulse, point)
    }
}
