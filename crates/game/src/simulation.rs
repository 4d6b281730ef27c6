//! Game simulation - the fixed-step loop.
//!
//! Each tick translates held input into commands, runs the locomotion
//! controller against the level's collision world, steps dynamic bodies,
//! then updates camera effects and feedback sinks.

use std::path::{Path, PathBuf};

use kickstep_camera::CameraConfig;
use kickstep_physics::{
    AbilityConfig, BodySettings, ConfigError, LocomotionController, TickContext, TickOutput,
    WorldHost,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feedback::{CueRecorder, FeedbackSink};
use crate::input::PlayerInput;
use crate::level::Level;
use crate::player::Player;

/// Failure to load or validate a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Everything a simulation run is tuned by. Loaded from RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed ticks per second.
    pub tick_rate: u32,

    /// Multiplier on mouse look.
    pub mouse_sensitivity: f32,

    /// Locomotion and ability tunables.
    pub abilities: AbilityConfig,

    /// Character body collision settings. `radius` follows `abilities.collider_radius`.
    pub body: BodySettings,

    pub camera: CameraConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            mouse_sensitivity: 2.0,
            abilities: AbilityConfig::default(),
            body: BodySettings::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load and validate a RON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate RON text. Missing fields take their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, LoadError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_rate",
                reason: "must be positive",
            });
        }
        if !self.mouse_sensitivity.is_finite() {
            return Err(ConfigError::Invalid {
                field: "mouse_sensitivity",
                reason: "must be finite",
            });
        }
        self.abilities.validate()?;
        self.camera.validate()
    }

    /// Seconds per tick.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// The game simulation.
///
/// Time is `frame * delta_time`, so replaying the same inputs reproduces
/// the same run.
pub struct Simulation {
    /// Ticks run so far.
    pub frame: u64,

    pub config: SimulationConfig,

    pub level: Level,

    pub player: Player,

    /// Audio cues produced so far.
    pub cues: CueRecorder,

    controller: LocomotionController,
    sinks: Vec<Box<dyn FeedbackSink>>,
}

impl Simulation {
    /// Create a simulation, spawning the player at the level's first spawn point.
    pub fn new(config: SimulationConfig, level: Level) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = LocomotionController::new(config.abilities.clone())?;
        Ok(Self::assemble(config, level, controller))
    }

    /// Create a simulation with default configuration and the test arena.
    pub fn test() -> Self {
        Self::assemble(
            SimulationConfig::default(),
            Level::test_arena(),
            LocomotionController::with_default_config(),
        )
    }

    fn assemble(config: SimulationConfig, level: Level, controller: LocomotionController) -> Self {
        let player = Player::new(1, "Player", level.spawn(0), &config, &level.collision);

        Self {
            frame: 0,
            config,
            level,
            player,
            cues: CueRecorder::new(),
            controller,
            sinks: Vec::new(),
        }
    }

    /// Register an extra feedback collaborator.
    pub fn add_sink(&mut self, sink: Box<dyn FeedbackSink>) {
        self.sinks.push(sink);
    }

    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }

    /// Simulation time at the start of the next tick.
    pub fn now(&self) -> f32 {
        self.frame as f32 * self.delta_time()
    }

    /// Run one fixed step and return the controller's events and snapshot.
    pub fn tick(&mut self, input: &PlayerInput) -> TickOutput {
        let dt = self.delta_time();
        let now = self.now();
        let player = &mut self.player;

        let look = player.input.translate(input, &mut player.commands);
        player.camera.angles.y = player.input.yaw();
        player.camera.add_pitch(look.pitch_delta);
        let ctx = TickContext::new(now, dt).with_view(player.view_ray());

        let output = {
            let mut host = WorldHost::new(&mut self.level.collision, &mut player.body);
            self.controller
                .update(&mut player.locomotion, &mut host, &mut player.commands, ctx)
        };

        self.level.collision.step_bodies(dt);

        player.pose = player
            .effects
            .update(&output.snapshot, &output.events, look.lean, now, dt);
        player
            .camera
            .follow(player.body.position, player.locomotion.yaw, &player.pose);

        for event in &output.events {
            log::debug!("frame {}: {event:?}", self.frame);
            self.cues.on_event(event, now);
            for sink in &mut self.sinks {
                sink.on_event(event, now);
            }
        }

        self.frame += 1;
        output
    }
}

// ============================================================================
// Tests
// ============================================================================
