//! End-to-end scenarios in the test arena.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use kickstep_game::level::arena;
use kickstep_game::{
    AbilityConfig, AudioCue, FeedbackSink, Level, LocomotionEvent, PlayerInput, Simulation,
    SimulationConfig, SpawnPoint, Stance,
};

fn run(sim: &mut Simulation, input: &PlayerInput, ticks: usize) -> Vec<LocomotionEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(sim.tick(input).events);
    }
    events
}

fn count(events: &[LocomotionEvent], predicate: impl Fn(&LocomotionEvent) -> bool) -> usize {
    events.iter().filter(|e| predicate(e)).count()
}

fn forward() -> PlayerInput {
    let mut input = PlayerInput::default();
    input.movement.forward = true;
    input
}

fn walker_sim() -> Simulation {
    let config = SimulationConfig {
        abilities: AbilityConfig::walker(),
        ..Default::default()
    };
    Simulation::new(config, Level::test_arena()).unwrap()
}

/// Flat floor with one tall crate two meters ahead of the spawn.
fn crate_range() -> (Level, kickstep_physics::ColliderHandle) {
    let mut level = Level::new("crate_range", "Crate Range");
    level.add_floor(20.0);
    let handle = level.add_crate(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.5, 1.0, 0.5), 5.0);
    level.spawn_points.push(SpawnPoint {
        position: Vec3::ZERO,
        facing: 0.0,
    });
    (level, handle)
}

#[test]
fn shipped_config_parses_and_validates() {
    let text = include_str!("../../../config/default.ron");
    let config = SimulationConfig::from_ron_str(text).expect("shipped config should load");

    assert_eq!(config.tick_rate, 60);
    assert_eq!(config.abilities.move_speed, 7.0);
    assert_eq!(config.abilities.crouch_height, 1.0);
    assert!(config.abilities.abilities.kick);
    assert!(Simulation::new(config, Level::test_arena()).is_ok());
}

#[test]
fn jump_fires_once_and_lands() {
    let mut sim = Simulation::test();
    run(&mut sim, &PlayerInput::default(), 5);

    let idle = PlayerInput::default();
    let mut jump = PlayerInput::default();
    jump.actions.jump = true;

    let mut events = Vec::new();
    let mut apex = 0.0_f32;
    for i in 0..120 {
        // Held for the first 20 ticks
        let input = if i < 20 { &jump } else { &idle };
        events.extend(sim.tick(input).events);
        apex = apex.max(sim.player.position().y);
    }

    assert_eq!(count(&events, |e| matches!(e, LocomotionEvent::Jumped { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, LocomotionEvent::Landed { .. })), 1);
    assert!(apex > 1.25 && apex < 1.45, "apex {apex}");
    assert!(sim.player.on_ground());
    assert_eq!(sim.cues.count(|c| matches!(c, AudioCue::Jump)), 1);
    assert_eq!(sim.cues.count(|c| matches!(c, AudioCue::Land { .. })), 1);
}

#[test]
fn slide_from_a_run_decays_into_crouch_walk() {
    let mut sim = Simulation::test();
    run(&mut sim, &forward(), 30);

    let mut slide = forward();
    slide.actions.crouch = true;
    let output = sim.tick(&slide);

    let speed = output
        .events
        .iter()
        .find_map(|e| match e {
            LocomotionEvent::SlideStarted { speed } => Some(*speed),
            _ => None,
        })
        .expect("crouch while running should slide");
    assert!((speed - 12.0).abs() < 0.05, "slide speed {speed}");
    assert!(output.snapshot.sliding);

    let events = run(&mut sim, &slide, 170);

    assert_eq!(count(&events, |e| matches!(e, LocomotionEvent::SlideEnded)), 1);
    assert_eq!(sim.player.locomotion.stance.stance, Stance::Crouching);
    assert!((sim.player.locomotion.horizontal_speed() - 3.5).abs() < 0.01);
    assert!((sim.player.body.height - 1.0).abs() < 0.01);
}

#[test]
fn crawl_tunnel_blocks_standing_until_exit() {
    let mut sim = walker_sim();

    let mut crawl = forward();
    crawl.actions.crouch = true;
    for _ in 0..600 {
        sim.tick(&crawl);
        if sim.player.position().x > arena::TUNNEL_START_X + 2.5 {
            break;
        }
    }
    assert!(sim.player.position().x > arena::TUNNEL_START_X + 2.5);
    assert!(sim.player.is_crouching());

    // Release under the ceiling
    let events = run(&mut sim, &forward(), 20);
    assert!(sim.player.position().x < arena::TUNNEL_END_X - 0.5);
    assert_eq!(sim.player.locomotion.stance.stance, Stance::Crouching);
    assert_eq!(count(&events, |e| matches!(e, LocomotionEvent::StoodUp)), 0);
    assert!(sim.player.body.height <= arena::TUNNEL_CEILING_Y);

    let mut events = Vec::new();
    for _ in 0..600 {
        events.extend(sim.tick(&forward()).events);
        if sim.player.position().x > arena::TUNNEL_END_X + 1.5 {
            break;
        }
    }
    events.extend(run(&mut sim, &PlayerInput::default(), 30));

    assert_eq!(count(&events, |e| matches!(e, LocomotionEvent::StoodUp)), 1);
    assert_eq!(sim.player.locomotion.stance.stance, Stance::Standing);
    assert!((sim.player.body.height - 2.0).abs() < 0.05);
}

#[test]
fn kick_pushes_crate_and_shakes_camera() {
    let (level, handle) = crate_range();
    let mut sim = Simulation::new(SimulationConfig::default(), level).unwrap();
    run(&mut sim, &PlayerInput::default(), 2);

    let mut kick = PlayerInput::default();
    kick.actions.kick = true;
    let output = sim.tick(&kick);

    assert!(output.events.contains(&LocomotionEvent::KickPerformed));
    let hit = output.events.iter().find_map(|e| match e {
        LocomotionEvent::KickHit {
            collider,
            impulse_applied,
            ..
        } => Some((*collider, *impulse_applied)),
        _ => None,
    });
    assert_eq!(hit, Some((handle, true)));
    assert!(sim.player.effects.shake().is_some());
    assert!(sim.player.locomotion.vertical_velocity > 0.0);

    run(&mut sim, &PlayerInput::default(), 60);

    let body = sim.level.collision.body(handle).unwrap();
    assert!(body.position.x > 2.5, "crate at {:?}", body.position);
    assert!(sim.player.effects.shake().is_none());
    assert_eq!(
        sim.cues
            .count(|c| matches!(c, AudioCue::KickImpact { dynamic: true, .. })),
        1
    );
}

#[test]
fn kick_spam_respects_cooldown() {
    let (level, _) = crate_range();
    let mut sim = Simulation::new(SimulationConfig::default(), level).unwrap();

    let mut events = Vec::new();
    for i in 0..20 {
        let mut input = PlayerInput::default();
        input.actions.kick = i % 2 == 0;
        events.extend(sim.tick(&input).events);
    }

    assert_eq!(count(&events, |e| matches!(e, LocomotionEvent::KickPerformed)), 1);
}

#[test]
fn extra_sinks_receive_every_event() {
    struct Collect(Rc<RefCell<Vec<LocomotionEvent>>>);

    impl FeedbackSink for Collect {
        fn on_event(&mut self, event: &LocomotionEvent, _now: f32) {
            self.0.borrow_mut().push(*event);
        }
    }

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut sim = Simulation::test();
    sim.add_sink(Box::new(Collect(Rc::clone(&seen))));

    let mut jump = PlayerInput::default();
    jump.actions.jump = true;
    let mut events = run(&mut sim, &PlayerInput::default(), 3);
    events.extend(run(&mut sim, &jump, 90));

    assert!(!events.is_empty());
    assert_eq!(*seen.borrow(), events);
}
