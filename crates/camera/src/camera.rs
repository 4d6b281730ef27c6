//! First-person camera rig.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::effects::CameraPose;

/// Pitch is clamped just short of straight up/down.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Camera mounted at a character's eye.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstPersonCamera {
    pub position: Vec3,

    /// Pitch, yaw and roll in radians. Positive pitch looks down.
    pub angles: Vec3,

    /// Vertical field of view in degrees.
    pub fov: f32,

    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            angles: Vec3::ZERO,
            fov: 90.0,
            near: 0.05,
            far: 500.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl FirstPersonCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// World-to-view transform. Roll turns the up vector about the look axis.
    pub fn view_matrix(&self) -> Mat4 {
        let look = self.forward();
        let up = Quat::from_axis_angle(look, self.angles.z) * Vec3::Y;
        Mat4::look_at_rh(self.position, self.position + look, up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Look direction. Yaw 0 looks along +X, yaw increases toward +Z.
    pub fn forward(&self) -> Vec3 {
        let (pitch_sin, pitch_cos) = self.angles.x.sin_cos();
        let (yaw_sin, yaw_cos) = self.angles.y.sin_cos();
        Vec3::new(pitch_cos * yaw_cos, -pitch_sin, pitch_cos * yaw_sin)
    }

    /// Horizontal right direction.
    pub fn right(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.angles.y.sin_cos();
        Vec3::new(-yaw_sin, 0.0, yaw_cos)
    }

    /// Horizontal forward direction (pitch ignored).
    pub fn flat_forward(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.angles.y.sin_cos();
        Vec3::new(yaw_cos, 0.0, yaw_sin)
    }

    /// Add a pitch delta, clamped to avoid flipping over.
    pub fn add_pitch(&mut self, delta: f32) {
        self.angles.x = (self.angles.x + delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Place the camera on a character.
    ///
    /// `feet` is the character's feet position; `pose` supplies eye height,
    /// local offsets (right, up, forward), roll and FOV.
    pub fn follow(&mut self, feet: Vec3, yaw: f32, pose: &CameraPose) {
        self.angles.y = yaw;
        self.angles.z = pose.roll;
        self.fov = pose.fov;

        let local = pose.local_offset;
        self.position = feet
            + Vec3::Y * (pose.eye_height + local.y)
            + self.right() * local.x
            + self.flat_forward() * local.z;
    }

    /// Eye position without presentation offsets, for gameplay rays.
    pub fn stable_eye(&self, feet: Vec3, pose: &CameraPose) -> Vec3 {
        feet + Vec3::Y * pose.eye_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_matrices_are_invertible() {
        let mut camera = FirstPersonCamera::new(Vec3::new(2.0, 1.8, -1.0));
        camera.angles.z = 0.2;
        assert!(camera.view_matrix().determinant().abs() > 1e-4);
        assert!(camera.projection_matrix().determinant().abs() > 0.0);
    }

    #[test]
    fn test_yaw_axes() {
        let mut camera = FirstPersonCamera::default();
        assert!((camera.forward() - Vec3::X).length() < 1e-5);
        assert!((camera.right() - Vec3::Z).length() < 1e-5);

        camera.angles.y = FRAC_PI_2;
        assert!((camera.forward() - Vec3::Z).length() < 1e-5);
        assert!((camera.flat_forward() - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_pitch_clamp() {
        let mut camera = FirstPersonCamera::default();
        camera.add_pitch(10.0);
        assert!(camera.angles.x < FRAC_PI_2);
        assert!(camera.forward().y < -0.99);

        camera.add_pitch(-20.0);
        assert!(camera.forward().y > 0.99);
    }

    #[test]
    fn test_follow_applies_pose() {
        let mut camera = FirstPersonCamera::default();
        let pose = CameraPose {
            eye_height: 1.8,
            local_offset: Vec3::new(0.3, 0.0, 0.0),
            roll: -0.1,
            fov: 95.0,
        };

        camera.follow(Vec3::new(1.0, 0.0, 0.0), 0.0, &pose);

        assert!((camera.position - Vec3::new(1.0, 1.8, 0.3)).length() < 1e-5);
        assert_eq!(camera.angles.z, -0.1);
        assert_eq!(camera.fov, 95.0);
        assert!((camera.stable_eye(Vec3::ZERO, &pose).y - 1.8).abs() < 1e-6);
    }
}
