//! Locomotion controller.
//!
//! This is the main entry point for character locomotion. It drains queued
//! commands and advances the [`LocomotionState`] through a [`LocomotionHost`].

use glam::{Vec2, Vec3};

use super::command::{CommandQueue, LocomotionCommand};
use super::config::AbilityConfig;
use super::events::LocomotionEvent;
use super::host::LocomotionHost;
use super::kick::{self, ViewRay};
use super::state::{LocomotionState, MotionSnapshot};

/// Largest time step a single tick will integrate.
pub const MAX_DELTA_TIME: f32 = 0.1;

/// Per-tick inputs besides the command queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Simulation time in seconds.
    pub now: f32,
    /// Time step in seconds. Clamped to `0..=MAX_DELTA_TIME`.
    pub delta_time: f32,
    /// Eye position and look direction, needed by the kick.
    pub view: Option<ViewRay>,
}

impl TickContext {
    pub fn new(now: f32, delta_time: f32) -> Self {
        Self {
            now,
            delta_time,
            view: None,
        }
    }

    pub fn with_view(mut self, view: ViewRay) -> Self {
        self.view = Some(view);
        self
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    pub events: Vec<LocomotionEvent>,
    pub snapshot: MotionSnapshot,
}

/// Locomotion controller.
///
/// Handles:
/// - Ground probing with a stick velocity
/// - Coyote time and buffered jumps
/// - Crouch, slide and headroom-checked standing
/// - Kick with recoil
/// - Velocity integration and host movement
///
/// # Example
///
/// ```ignore
/// let controller = LocomotionController::new(AbilityConfig::default())?;
/// let mut state = LocomotionState::new(&controller.config);
///
/// // Each tick:
/// let output = controller.update(&mut state, &mut host, &mut commands, ctx);
/// ```
#[derive(Debug, Clone)]
pub struct LocomotionController {
    pub config: AbilityConfig,
}

impl LocomotionController {
    /// Create a controller, rejecting invalid tunables.
    pub fn new(config: AbilityConfig) -> Result<Self, super::config::ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self {
            config: AbilityConfig::default(),
        }
    }

    /// Advance one tick.
    ///
    /// Order: commands, ground probe, jump, stance, integration.
    pub fn update<H: LocomotionHost + ?Sized>(
        &self,
        state: &mut LocomotionState,
        host: &mut H,
        commands: &mut CommandQueue,
        ctx: TickContext,
    ) -> TickOutput {
        let dt = ctx.delta_time.clamp(0.0, MAX_DELTA_TIME);
        let mut events = Vec::new();

        for command in commands.drain() {
            self.apply_command(state, host, command, &ctx, &mut events);
        }

        self.probe_ground(state, host, ctx.now, &mut events);
        self.update_jump(state, ctx.now, &mut events);
        self.update_stance(state, host, dt, &mut events);
        self.integrate(state, host, dt);

        TickOutput {
            events,
            snapshot: state.snapshot(),
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn apply_command<H: LocomotionHost + ?Sized>(
        &self,
        state: &mut LocomotionState,
        host: &mut H,
        command: LocomotionCommand,
        ctx: &TickContext,
        events: &mut Vec<LocomotionEvent>,
    ) {
        match command {
            LocomotionCommand::SetIntent(intent) => {
                state.horizontal_intent = if intent.is_finite() {
                    intent.clamp_length_max(1.0)
                } else {
                    Vec2::ZERO
                };
            }
            LocomotionCommand::Look(yaw) => {
                if yaw.is_finite() {
                    state.yaw = normalize_angle(yaw);
                }
            }
            LocomotionCommand::JumpPressed => {
                if self.config.abilities.jump {
                    state.jump.request(ctx.now);
                } else {
                    log::trace!("jump ignored: ability disabled");
                }
            }
            LocomotionCommand::CrouchPressed => {
                let facing = state.facing();
                if let Some(speed) =
                    state
                        .stance
                        .press_crouch(facing, state.horizontal_velocity, &self.config)
                {
                    log::debug!("slide started at {speed:.2} m/s");
                    events.push(LocomotionEvent::SlideStarted { speed });
                }
            }
            LocomotionCommand::CrouchReleased => state.stance.release_crouch(),
            LocomotionCommand::KickPressed => self.kick(state, host, ctx, events),
        }
    }

    // ========================================================================
    // Ground and Jump
    // ========================================================================

    fn probe_ground<H: LocomotionHost + ?Sized>(
        &self,
        state: &mut LocomotionState,
        host: &H,
        now: f32,
        events: &mut Vec<LocomotionEvent>,
    ) {
        let grounded = host.is_grounded().unwrap_or_else(|err| {
            log::warn!("ground probe failed: {err}");
            false
        });

        if grounded {
            if !state.grounded && state.vertical_velocity < 0.0 {
                events.push(LocomotionEvent::Landed {
                    impact_speed: -state.vertical_velocity,
                });
            }
            if state.vertical_velocity < 0.0 {
                state.vertical_velocity = self.config.grounded_stick_velocity;
            }
            state.jump.mark_grounded(now);
        }

        state.grounded = grounded;
    }

    fn update_jump(&self, state: &mut LocomotionState, now: f32, events: &mut Vec<LocomotionEvent>) {
        if !self.config.abilities.jump {
            return;
        }

        let Some(launch_velocity) = state.jump.try_admit(now, &self.config) else {
            return;
        };

        state.vertical_velocity = launch_velocity;
        state.grounded = false;
        if state.stance.cancel_slide() {
            events.push(LocomotionEvent::SlideEnded);
        }
        log::debug!("jump admitted at t={now:.3}");
        events.push(LocomotionEvent::Jumped { launch_velocity });
    }

    // ========================================================================
    // Stance
    // ========================================================================

    fn update_stance<H: LocomotionHost + ?Sized>(
        &self,
        state: &mut LocomotionState,
        host: &mut H,
        dt: f32,
        events: &mut Vec<LocomotionEvent>,
    ) {
        if state.stance.decay_slide(dt, &self.config) {
            log::debug!("slide decayed into crouch");
            events.push(LocomotionEvent::SlideEnded);
        }

        if state.stance.wants_to_stand() {
            let clear = host
                .headroom_available(
                    self.config.crouch_height,
                    self.config.standing_height,
                    self.config.collider_radius,
                )
                .unwrap_or_else(|err| {
                    log::warn!("headroom probe failed: {err}");
                    false
                });

            if state.stance.try_stand(clear) {
                events.push(LocomotionEvent::StoodUp);
            } else {
                log::trace!("stand blocked by ceiling");
            }
        }

        let height = state.stance.blend_height(dt, &self.config);
        host.set_collider_height(height);
    }

    // ========================================================================
    // Kick
    // ========================================================================

    fn kick<H: LocomotionHost + ?Sized>(
        &self,
        state: &mut LocomotionState,
        host: &mut H,
        ctx: &TickContext,
        events: &mut Vec<LocomotionEvent>,
    ) {
        if !self.config.abilities.kick {
            log::trace!("kick ignored: ability disabled");
            return;
        }
        if !state.kick.ready(ctx.now, &self.config) {
            log::trace!("kick ignored: cooling down");
            return;
        }
        let Some(view) = ctx.view else {
            log::warn!("kick ignored: no view ray");
            return;
        };
        let direction = view.direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            log::warn!("kick ignored: degenerate view direction");
            return;
        }

        state.kick.last_kick_time = ctx.now;
        events.push(LocomotionEvent::KickPerformed);

        let target = kick::resolve_target(&*host, &view, direction, &self.config);

        // Self-propulsion happens whether or not anything was hit
        state.vertical_velocity = self.config.kick_up_force;
        let flat = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
        state.kick.kick_velocity = -flat * self.config.kick_recoil;
        if state.stance.cancel_slide() {
            events.push(LocomotionEvent::SlideEnded);
        }

        if let Some(target) = target {
            let contact = target.contact;
            let impulse_applied = contact.collider.is_dynamic()
                && host.apply_impulse(
                    contact.collider,
                    direction * self.config.kick_force,
                    contact.point,
                );
            log::debug!(
                "kick hit {:?} via {:?} (impulse: {impulse_applied})",
                contact.collider,
                target.path
            );
            events.push(LocomotionEvent::KickHit {
                collider: contact.collider,
                point: contact.point,
                path: target.path,
                impulse_applied,
            });
        }
    }

    // ========================================================================
    // Integration
    // ========================================================================

    fn integrate<H: LocomotionHost + ?Sized>(
        &self,
        state: &mut LocomotionState,
        host: &mut H,
        dt: f32,
    ) {
        state.kick.decay_recoil(dt, &self.config);

        let locomotion = if state.is_sliding() {
            state.stance.slide_velocity
        } else {
            let intent = state.horizontal_intent;
            let wish = state.right() * intent.x + state.facing() * intent.y;
            wish * self.config.walk_speed(state.is_crouching())
        };
        let wish_velocity = locomotion + state.kick.kick_velocity;

        let gravity_scale = if state.is_sliding() {
            self.config.slide_gravity_multiplier
        } else {
            1.0
        };
        state.vertical_velocity += self.config.gravity * gravity_scale * dt;

        let delta = (wish_velocity + Vec3::Y * state.vertical_velocity) * dt;
        let applied = host.move_by(delta);

        // Measured from the displacement the host applied
        state.horizontal_velocity = if dt > 0.0 {
            Vec3::new(applied.x, 0.0, applied.z) / dt
        } else {
            wish_velocity
        };
    }
}

/// Wrap an angle to `-PI..PI`.
fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

// ============================================================================
// Tests
// ============================================================================
