//! Kickstep headless driver.
//!
//! Runs a scripted session through the test arena and logs every
//! locomotion event. Usage: `kickstep [config.ron]`.

use std::io::ErrorKind;

use anyhow::Context;
use glam::Vec3;
use kickstep_game::level::arena;
use kickstep_game::{
    AudioCue, Level, LoadError, LocomotionEvent, PlayerInput, Simulation, SimulationConfig, Stance,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_CONFIG: &str = "config/default.ron";

/// Crate placed past the tunnel exit for the kick.
const TARGET_CRATE: Vec3 = Vec3::new(24.0, 0.0, 0.0);

/// One leg of the scripted run.
struct Phase {
    name: &'static str,
    input: fn(u32) -> PlayerInput,
    done: fn(&Simulation) -> bool,
    max_ticks: u32,
}

fn idle(_: u32) -> PlayerInput {
    PlayerInput::default()
}

fn forward(_: u32) -> PlayerInput {
    let mut input = PlayerInput::default();
    input.movement.forward = true;
    input
}

fn crouch_forward(tick: u32) -> PlayerInput {
    let mut input = forward(tick);
    input.actions.crouch = true;
    input
}

fn jump(tick: u32) -> PlayerInput {
    let mut input = PlayerInput::default();
    input.actions.jump = tick < 5;
    input
}

fn kick(tick: u32) -> PlayerInput {
    let mut input = PlayerInput::default();
    input.actions.kick = tick == 0;
    input
}

fn never(_: &Simulation) -> bool {
    false
}

fn script() -> Vec<Phase> {
    vec![
        Phase {
            name: "settle",
            input: idle,
            done: never,
            max_ticks: 10,
        },
        Phase {
            name: "jump",
            input: jump,
            done: |sim| sim.frame > 20 && sim.player.on_ground(),
            max_ticks: 120,
        },
        Phase {
            name: "run",
            input: forward,
            done: |sim| sim.player.position().x > 6.0,
            max_ticks: 120,
        },
        Phase {
            name: "slide",
            input: crouch_forward,
            done: |sim| !sim.player.is_sliding(),
            max_ticks: 240,
        },
        Phase {
            name: "crawl",
            input: crouch_forward,
            done: |sim| sim.player.position().x > arena::TUNNEL_END_X + 1.0,
            max_ticks: 600,
        },
        Phase {
            name: "stand",
            input: forward,
            done: |sim| sim.player.locomotion.stance.stance == Stance::Standing,
            max_ticks: 120,
        },
        Phase {
            name: "approach",
            input: forward,
            done: |sim| sim.player.position().x > TARGET_CRATE.x - 1.6,
            max_ticks: 300,
        },
        Phase {
            name: "kick",
            input: kick,
            done: never,
            max_ticks: 60,
        },
    ]
}

fn load_config(path: &str) -> anyhow::Result<SimulationConfig> {
    match SimulationConfig::load(path) {
        Ok(config) => Ok(config),
        Err(LoadError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            tracing::warn!("{path} not found, using built-in defaults");
            Ok(SimulationConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("loading {path}")),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = load_config(&path)?;

    let mut level = Level::test_arena();
    let target = level.add_crate(TARGET_CRATE, Vec3::splat(0.5), 10.0);

    let mut sim =
        Simulation::new(config, level).context("simulation rejected the configuration")?;
    tracing::info!(
        "starting at {:?}, {} Hz",
        sim.player.position(),
        sim.config.tick_rate
    );

    for phase in script() {
        let mut ticks = 0;
        while ticks < phase.max_ticks && !(ticks > 0 && (phase.done)(&sim)) {
            let output = sim.tick(&(phase.input)(ticks));
            for event in &output.events {
                match event {
                    LocomotionEvent::KickHit { .. } => tracing::info!("{}: {event:?}", phase.name),
                    _ => tracing::debug!("{}: {event:?}", phase.name),
                }
            }
            ticks += 1;
        }

        let snapshot = sim.player.snapshot();
        tracing::info!(
            phase = phase.name,
            ticks,
            x = sim.player.position().x,
            speed = snapshot.horizontal_speed,
            height = snapshot.collider_height,
            grounded = snapshot.grounded,
            "phase finished"
        );
    }

    if let Some(body) = sim.level.collision.body(target) {
        tracing::info!("target crate rests at {:?}", body.position);
    }

    let cues = &sim.cues;
    tracing::info!(
        jumps = cues.count(|c| matches!(c, AudioCue::Jump)),
        landings = cues.count(|c| matches!(c, AudioCue::Land { .. })),
        slides = cues.count(|c| matches!(c, AudioCue::SlideStart)),
        kicks = cues.count(|c| matches!(c, AudioCue::KickWhoosh)),
        impacts = cues.count(|c| matches!(c, AudioCue::KickImpact { .. })),
        "session finished after {} frames",
        sim.frame
    );

    Ok(())
}
