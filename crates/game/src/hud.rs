//! HUD read-outs: plain numbers and strings, no drawing.

use std::fmt;

use crate::state::{CrashCause, GameMode, GameState};

/// Lock-on indicator state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LockStatus {
    None,
    /// Locked onto a cannon at this distance.
    Locked { distance: f32 },
}

/// Banner shown once the aircraft is down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverText {
    pub title: String,
    pub subtitle: String,
}

impl GameOverText {
    pub fn for_state(state: &GameState) -> Option<Self> {
        let title = match state.mode {
            GameMode::Flying => return None,
            GameMode::ShotDown => "SHOT DOWN",
            GameMode::Crashed if state.hit_by_missile => "SHOT DOWN",
            GameMode::Crashed => "CRASHED",
        };
        let subtitle = match (state.mode, state.crash_cause) {
            (GameMode::ShotDown, _) => "Going down...".to_string(),
            (_, Some(CrashCause::Tree(kind))) => format!("Flew into a {kind:?} tree"),
            _ => "Flew into the ground".to_string(),
        };
        Some(Self { title: title.to_string(), subtitle })
    }
}

/// Everything the HUD shows for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HudReadout {
    /// Height above sea level.
    pub altitude: f32,
    /// Height of the belly above the ground directly below.
    pub height_above_ground: f32,
    pub speed: f32,
    pub vertical_speed: f32,
    pub kills: u32,
    pub threats_remaining: usize,
    pub lock: LockStatus,
    pub mode: GameMode,
    pub stalling: bool,
    /// Seconds until each hardpoint is ready (left, right).
    pub reload: (f32, f32),
    pub game_over: Option<GameOverText>,
}

impl fmt::Display for HudReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ALT {:>6.1}  AGL {:>6.1}  SPD {:>5.1}  VS {:>+5.1}  KILLS {}  THREATS {}",
            self.altitude, self.height_above_ground, self.speed, self.vertical_speed, self.kills, self.threats_remaining
        )?;
        if let LockStatus::Locked { distance } = self.lock {
            write!(f, "  LOCK {distance:.0}m")?;
        }
        if self.stalling {
            write!(f, "  STALL")?;
        }
        if let Some(text) = &self.game_over {
            write!(f, "  [{}]", text.title)?;
        }
        Ok(())
    }
}
