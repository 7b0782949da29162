//! Game mode and the scripted crash sequence.
//!
//! Modes only move forward within a life: Flying → ShotDown → Crashed, or
//! Flying → Crashed. [`GameState::reset`] is the only way back.

use glam::Vec3;
use procgen::TreeKind;

/// Seconds of secondary explosions after a crash.
pub const CRASH_BURST_DURATION: f32 = 3.0;
/// Seconds between secondary explosions.
pub const CRASH_BURST_INTERVAL: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Flying,
    /// Hit by a missile and gliding in, uncontrollable.
    ShotDown,
    /// Wreck on the ground; terminal until restart.
    Crashed,
}

/// What the aircraft flew into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    Terrain,
    Tree(TreeKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashPhase {
    /// Secondary explosions going off.
    Burning,
    /// Only the ground fire is left.
    Smoldering,
}

/// Post-crash fireworks, advanced by the simulation delta.
#[derive(Debug, Clone, PartialEq)]
pub struct CrashSequence {
    pub position: Vec3,
    pub elapsed: f32,
    /// Bursts already emitted.
    pub bursts: u32,
    pub phase: CrashPhase,
}

/// Output of one crash sequence step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrashStep {
    /// Secondary explosions due this step.
    pub bursts: u32,
    /// True on the single step where the fire settles.
    pub settled: bool,
}

impl CrashSequence {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            elapsed: 0.0,
            bursts: 0,
            phase: CrashPhase::Burning,
        }
    }

    pub fn advance(&mut self, dt: f32) -> CrashStep {
        if self.phase == CrashPhase::Smoldering {
            return CrashStep::default();
        }
        self.elapsed += dt.max(0.0);

        let total = (CRASH_BURST_DURATION / CRASH_BURST_INTERVAL).round() as u32;
        let due = ((self.elapsed / CRASH_BURST_INTERVAL + 1e-4).floor() as u32).min(total);
        let step = CrashStep {
            bursts: due.saturating_sub(self.bursts),
            settled: self.elapsed >= CRASH_BURST_DURATION,
        };
        self.bursts = due;
        if step.settled {
            self.phase = CrashPhase::Smoldering;
        }
        step
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub mode: GameMode,
    pub hit_by_missile: bool,
    /// Seconds spent gliding after the hit.
    pub shot_down_elapsed: f32,
    pub crash_cause: Option<CrashCause>,
    pub crash_sequence: Option<CrashSequence>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pilot input reaches the flight model only while flying.
    pub fn is_controllable(&self) -> bool {
        self.mode == GameMode::Flying
    }

    pub fn is_crashed(&self) -> bool {
        self.mode == GameMode::Crashed
    }

    /// Flying → ShotDown. Returns false (and changes nothing) from any other mode.
    pub fn shoot_down(&mut self) -> bool {
        if self.mode != GameMode::Flying {
            return false;
        }
        self.mode = GameMode::ShotDown;
        self.hit_by_missile = true;
        self.shot_down_elapsed = 0.0;
        true
    }

    /// Flying / ShotDown → Crashed, starting the crash sequence at `position`.
    pub fn crash(&mut self, position: Vec3, cause: CrashCause) -> bool {
        if self.mode == GameMode::Crashed {
            return false;
        }
        self.mode = GameMode::Crashed;
        self.crash_cause = Some(cause);
        self.crash_sequence = Some(CrashSequence::new(position));
        true
    }

    /// Back to a fresh life. Drops any running crash sequence.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_are_monotonic() {
        let mut s = GameState::new();
        assert!(s.is_controllable());
        assert!(s.shoot_down());
        assert!(!s.shoot_down());
        assert_eq!(s.mode, GameMode::ShotDown);
        assert!(s.crash(Vec3::ZERO, CrashCause::Terrain));
        assert!(!s.shoot_down());
        assert!(!s.crash(Vec3::ONE, CrashCause::Terrain));
        assert_eq!(s.crash_sequence.as_ref().map(|c| c.position), Some(Vec3::ZERO));
    }

    #[test]
    fn direct_crash_is_not_a_missile_kill() {
        let mut s = GameState::new();
        assert!(s.crash(Vec3::ZERO, CrashCause::Tree(TreeKind::Oak)));
        assert!(!s.hit_by_missile);
        assert_eq!(s.crash_cause, Some(CrashCause::Tree(TreeKind::Oak)));
    }

    #[test]
    fn crash_sequence_bursts_every_150ms_for_three_seconds() {
        let mut seq = CrashSequence::new(Vec3::ZERO);
        let mut bursts = 0;
        let mut settled = 0;
        for _ in 0..(5 * 60) {
            let step = seq.advance(1.0 / 60.0);
            bursts += step.bursts;
            settled += step.settled as u32;
        }
        assert_eq!(bursts, 20);
        assert_eq!(settled, 1);
        assert_eq!(seq.phase, CrashPhase::Smoldering);
    }

    #[test]
    fn large_steps_catch_up() {
        let mut seq = CrashSequence::new(Vec3::ZERO);
        assert_eq!(seq.advance(0.1).bursts, 0);
        assert_eq!(seq.advance(0.1).bursts, 1);
        assert_eq!(seq.advance(0.1).bursts, 1);
    }

    #[test]
    fn reset_cancels_sequence() {
        let mut s = GameState::new();
        s.crash(Vec3::ZERO, CrashCause::Terrain);
        if let Some(seq) = s.crash_sequence.as_mut() {
            seq.advance(1.0);
        }
        s.reset();
        assert_eq!(s, GameState::default());
        assert!(s.crash_sequence.is_none());
    }
}
