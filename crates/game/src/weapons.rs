//! Wing hardpoints for the player's missiles.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which wing a missile leaves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wing {
    Left,
    Right,
}

impl Wing {
    pub fn other(self) -> Self {
        match self {
            Wing::Left => Wing::Right,
            Wing::Right => Wing::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    /// Seconds before a hardpoint can fire again.
    pub reload_time: f32,
    /// Wing that fires first after spawn or restart.
    pub first_wing: Wing,
    /// Lateral distance of each hardpoint from the fuselage center.
    pub hardpoint_span: f32,
    /// How far below the fuselage center the hardpoints hang.
    pub hardpoint_drop: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            reload_time: 3.0,
            first_wing: Wing::Left,
            hardpoint_span: 3.2,
            hardpoint_drop: 0.4,
        }
    }
}

impl WeaponTuning {
    /// Mount point in aircraft-local space.
    pub fn hardpoint_offset(&self, wing: Wing) -> Vec3 {
        let side = match wing {
            Wing::Left => -1.0,
            Wing::Right => 1.0,
        };
        Vec3::new(side * self.hardpoint_span, -self.hardpoint_drop, 0.0)
    }
}

/// Two independently reloading launch rails that take turns.
#[derive(Debug, Clone)]
pub struct Hardpoints {
    left_reload: f32,
    right_reload: f32,
    next: Wing,
    reload_time: f32,
}

impl Hardpoints {
    pub fn new(tuning: &WeaponTuning) -> Self {
        Self {
            left_reload: 0.0,
            right_reload: 0.0,
            next: tuning.first_wing,
            reload_time: tuning.reload_time.max(0.0),
        }
    }

    /// Count reload timers down.
    pub fn update(&mut self, dt: f32) {
        self.left_reload = (self.left_reload - dt).max(0.0);
        self.right_reload = (self.right_reload - dt).max(0.0);
    }

    pub fn reload_remaining(&self, wing: Wing) -> f32 {
        match wing {
            Wing::Left => self.left_reload,
            Wing::Right => self.right_reload,
        }
    }

    pub fn is_ready(&self, wing: Wing) -> bool {
        self.reload_remaining(wing) <= 0.0
    }

    /// Claim a ready hardpoint, preferring the one whose turn it is.
    /// Returns `None` when both are reloading.
    pub fn try_fire(&mut self) -> Option<Wing> {
        let wing = [self.next, self.next.other()]
            .into_iter()
            .find(|w| self.is_ready(*w))?;

        match wing {
            Wing::Left => self.left_reload = self.reload_time,
            Wing::Right => self.right_reload = self.reload_time,
        }
        self.next = wing.other();
        Some(wing)
    }
}
