//! Feedback collaborators (audio, leg animation) that react to locomotion events.

use glam::Vec3;
use kickstep_physics::LocomotionEvent;
use serde::{Deserialize, Serialize};

/// Receives every locomotion event the simulation produces.
pub trait FeedbackSink {
    fn on_event(&mut self, event: &LocomotionEvent, now: f32);
}

/// Sound cues a mixer would play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AudioCue {
    Jump,
    /// Landing thud, `intensity` in `0..=1`.
    Land { intensity: f32 },
    SlideStart,
    SlideStop,
    KickWhoosh,
    /// Kick contact. `dynamic` is true when a movable body was struck.
    KickImpact { point: Vec3, dynamic: bool },
}

/// Downward speed that plays a full-intensity landing.
const HARD_LANDING_SPEED: f32 = 10.0;

impl AudioCue {
    /// Map an event to its cue. Not every event makes a sound.
    pub fn from_event(event: &LocomotionEvent) -> Option<Self> {
        match *event {
            LocomotionEvent::Jumped { .. } => Some(Self::Jump),
            LocomotionEvent::Landed { impact_speed } => Some(Self::Land {
                intensity: (impact_speed / HARD_LANDING_SPEED).clamp(0.0, 1.0),
            }),
            LocomotionEvent::SlideStarted { .. } => Some(Self::SlideStart),
            LocomotionEvent::SlideEnded => Some(Self::SlideStop),
            LocomotionEvent::KickPerformed => Some(Self::KickWhoosh),
            LocomotionEvent::KickHit {
                point, collider, ..
            } => Some(Self::KickImpact {
                point,
                dynamic: collider.is_dynamic(),
            }),
            LocomotionEvent::StoodUp => None,
        }
    }
}

/// A cue stamped with the simulation time it fired at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedCue {
    pub time: f32,
    pub cue: AudioCue,
}

/// Records cues in order. Stands in for an audio backend.
#[derive(Debug, Clone, Default)]
pub struct CueRecorder {
    cues: Vec<TimedCue>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> &[TimedCue] {
        &self.cues
    }

    /// Number of recorded cues matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&AudioCue) -> bool) -> usize {
        self.cues.iter().filter(|c| predicate(&c.cue)).count()
    }
}

impl FeedbackSink for CueRecorder {
    fn on_event(&mut self, event: &LocomotionEvent, now: f32) {
        if let Some(cue) = AudioCue::from_event(event) {
            log::trace!("cue {cue:?} at t={now:.3}");
            self.cues.push(TimedCue { time: now, cue });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickstep_physics::{ColliderHandle, KickPath};

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            AudioCue::from_event(&LocomotionEvent::Jumped {
                launch_velocity: 5.0
            }),
            Some(AudioCue::Jump)
        );
        assert_eq!(AudioCue::from_event(&LocomotionEvent::StoodUp), None);

        let hit = LocomotionEvent::KickHit {
            collider: ColliderHandle::Static(2),
            point: Vec3::ONE,
            path: KickPath::Overlap,
            impulse_applied: false,
        };
        assert_eq!(
            AudioCue::from_event(&hit),
            Some(AudioCue::KickImpact {
                point: Vec3::ONE,
                dynamic: false
            })
        );
    }

    #[test]
    fn test_landing_intensity_is_clamped() {
        let soft = AudioCue::from_event(&LocomotionEvent::Landed { impact_speed: 2.5 });
        assert_eq!(soft, Some(AudioCue::Land { intensity: 0.25 }));

        let hard = AudioCue::from_event(&LocomotionEvent::Landed { impact_speed: 40.0 });
        assert_eq!(hard, Some(AudioCue::Land { intensity: 1.0 }));
    }

    #[test]
    fn test_recorder_keeps_order() {
        let mut recorder = CueRecorder::new();
        recorder.on_event(&LocomotionEvent::KickPerformed, 1.0);
        recorder.on_event(&LocomotionEvent::StoodUp, 1.1);
        recorder.on_event(&LocomotionEvent::SlideEnded, 1.2);

        let cues: Vec<_> = recorder.cues().iter().map(|c| c.cue).collect();
        assert_eq!(cues, vec![AudioCue::KickWhoosh, AudioCue::SlideStop]);
        assert_eq!(recorder.count(|c| matches!(c, AudioCue::SlideStop)), 1);
    }
}
