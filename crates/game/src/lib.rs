//! Kickstep Game Logic
//!
//! This crate wires the locomotion core into a playable simulation:
//!
//! - Held-button input translated into edge-detected commands
//! - A test arena with a crawl tunnel and kickable crates
//! - The player entity (locomotion state, body, camera)
//! - Feedback sinks for audio and animation collaborators
//! - A fixed-step simulation loaded from RON config
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Simulation tick                        │
//! │  ┌─────────┐   ┌────────────┐   ┌──────────┐   ┌───────────┐  │
//! │  │ Input   │──►│ Locomotion │──►│ Camera   │──►│ Feedback  │  │
//! │  │ adapter │   │ controller │   │ effects  │   │ sinks     │  │
//! │  └─────────┘   └─────┬──────┘   └──────────┘   └───────────┘  │
//! │                      │ LocomotionHost                         │
//! │                ┌─────▼──────┐                                 │
//! │                │ Collision  │                                 │
//! │                │ world      │                                 │
//! │                └────────────┘                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod feedback;
pub mod input;
pub mod level;
pub mod player;
pub mod simulation;

// Re-export main types
pub use feedback::{AudioCue, CueRecorder, FeedbackSink, TimedCue};
pub use input::{InputAdapter, PlayerInput};
pub use level::{Level, SpawnPoint};
pub use player::Player;
pub use simulation::{LoadError, Simulation, SimulationConfig};

// Re-export physics types for convenience
pub use kickstep_physics::{
    AbilityConfig, CollisionWorld, ContentFlags, LocomotionEvent, MotionSnapshot, Stance,
    TickOutput,
};
