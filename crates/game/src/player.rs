//! Player entity and state.

use glam::Vec3;
use kickstep_camera::{CameraEffects, CameraPose, FirstPersonCamera};
use kickstep_physics::{
    CharacterBody, CollisionWorld, CommandQueue, LocomotionState, MotionSnapshot, ViewRay,
};

use crate::input::InputAdapter;
use crate::level::SpawnPoint;
use crate::simulation::SimulationConfig;

/// Unique identifier for entities.
pub type EntityId = u32;

/// The locally controlled player.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique player ID.
    pub id: EntityId,

    /// Player name/handle.
    pub name: String,

    /// Locomotion state machine.
    pub locomotion: LocomotionState,

    /// Collision capsule.
    pub body: CharacterBody,

    /// Commands waiting for the next tick.
    pub commands: CommandQueue,

    /// Held-button edge detection and mouse look.
    pub input: InputAdapter,

    pub camera: FirstPersonCamera,
    pub effects: CameraEffects,

    /// Camera pose from the last tick.
    pub pose: CameraPose,
}

impl Player {
    /// Create a player standing at `spawn`.
    ///
    /// The body is settled onto the ground below the spawn point.
    pub fn new(
        id: EntityId,
        name: &str,
        spawn: SpawnPoint,
        config: &SimulationConfig,
        world: &CollisionWorld,
    ) -> Self {
        let abilities = &config.abilities;
        let camera_config = config.camera.clone();
        let mut body_settings = config.body.clone();
        body_settings.radius = abilities.collider_radius;
        let mut body = CharacterBody::new(spawn.position, abilities.standing_height, body_settings);
        body.refresh_ground(world, false);

        let mut locomotion = LocomotionState::new(abilities);
        locomotion.yaw = spawn.facing;

        let pose = CameraPose {
            eye_height: abilities.standing_height - camera_config.eye_offset,
            local_offset: Vec3::ZERO,
            roll: 0.0,
            fov: camera_config.base_fov,
        };
        let mut camera = FirstPersonCamera::new(body.position);
        camera.follow(body.position, spawn.facing, &pose);

        Self {
            id,
            name: name.to_string(),
            locomotion,
            body,
            commands: CommandQueue::new(),
            input: InputAdapter::new(config.mouse_sensitivity, spawn.facing),
            camera,
            effects: CameraEffects::new(camera_config),
            pose,
        }
    }

    /// Get the player's feet position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Eye position used for gameplay rays (no bob, lean or shake).
    pub fn eye_position(&self) -> Vec3 {
        self.camera.stable_eye(self.body.position, &self.pose)
    }

    /// View ray for the kick, using the camera's current look direction.
    pub fn view_ray(&self) -> ViewRay {
        ViewRay::new(self.eye_position(), self.camera.forward())
    }

    #[inline]
    pub fn snapshot(&self) -> MotionSnapshot {
        self.locomotion.snapshot()
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.locomotion.grounded
    }

    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.locomotion.is_crouching()
    }

    #[inline]
    pub fn is_sliding(&self) -> bool {
        self.locomotion.is_sliding()
    }
}
