//! Named control flags sampled once per simulation tick.
//!
//! The simulation only ever sees this type. Translating physical keys and mouse
//! motion into it is the host's business (see [`crate::Bindings`]).

use glam::Vec2;

/// Every action the pilot can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    ThrottleUp,
    ThrottleDown,
    RollLeft,
    RollRight,
    FineRollLeft,
    FineRollRight,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    Fire,
    LookBehind,
}

/// Snapshot of the pilot's controls for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    pub throttle_up: bool,
    pub throttle_down: bool,
    /// Bank: rolls the airframe and feeds the turn.
    pub roll_left: bool,
    pub roll_right: bool,
    /// Roll trim only; does not turn the aircraft.
    pub fine_roll_left: bool,
    pub fine_roll_right: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub fire: bool,
    pub look_behind: bool,
    /// Camera orbit delta in radians (x = yaw, y = pitch).
    pub look_delta: Vec2,
    /// Camera zoom delta in world units, positive = further away.
    pub zoom_delta: f32,
}

impl Controls {
    pub fn set(&mut self, control: Control, held: bool) {
        let flag = match control {
            Control::ThrottleUp => &mut self.throttle_up,
            Control::ThrottleDown => &mut self.throttle_down,
            Control::RollLeft => &mut self.roll_left,
            Control::RollRight => &mut self.roll_right,
            Control::FineRollLeft => &mut self.fine_roll_left,
            Control::FineRollRight => &mut self.fine_roll_right,
            Control::PitchUp => &mut self.pitch_up,
            Control::PitchDown => &mut self.pitch_down,
            Control::YawLeft => &mut self.yaw_left,
            Control::YawRight => &mut self.yaw_right,
            Control::Fire => &mut self.fire,
            Control::LookBehind => &mut self.look_behind,
        };
        *flag |= held;
    }

    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::ThrottleUp => self.throttle_up,
            Control::ThrottleDown => self.throttle_down,
            Control::RollLeft => self.roll_left,
            Control::RollRight => self.roll_right,
            Control::FineRollLeft => self.fine_roll_left,
            Control::FineRollRight => self.fine_roll_right,
            Control::PitchUp => self.pitch_up,
            Control::PitchDown => self.pitch_down,
            Control::YawLeft => self.yaw_left,
            Control::YawRight => self.yaw_right,
            Control::Fire => self.fire,
            Control::LookBehind => self.look_behind,
        }
    }

    /// +1 / -1 / 0 from a pair of opposing flags.
    pub fn axis(positive: bool, negative: bool) -> f32 {
        (positive as i8 - negative as i8) as f32
    }

    pub fn throttle_axis(&self) -> f32 {
        Self::axis(self.throttle_up, self.throttle_down)
    }

    /// Positive banks left.
    pub fn roll_axis(&self) -> f32 {
        Self::axis(self.roll_left, self.roll_right)
    }

    /// Positive trims left.
    pub fn fine_roll_axis(&self) -> f32 {
        Self::axis(self.fine_roll_left, self.fine_roll_right)
    }

    /// Positive raises the nose.
    pub fn pitch_axis(&self) -> f32 {
        Self::axis(self.pitch_up, self.pitch_down)
    }

    /// Positive turns left.
    pub fn yaw_axis(&self) -> f32 {
        Self::axis(self.yaw_left, self.yaw_right)
    }

    pub fn has_look_input(&self) -> bool {
        self.look_delta != Vec2::ZERO || self.zoom_delta != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_flags_cancel() {
        let c = Controls { roll_left: true, roll_right: true, pitch_up: true, ..Default::default() };
        assert_eq!(c.roll_axis(), 0.0);
        assert_eq!(c.pitch_axis(), 1.0);
        assert_eq!(c.yaw_axis(), 0.0);
    }

    #[test]
    fn set_is_sticky_within_a_frame() {
        let mut c = Controls::default();
        c.set(Control::Fire, true);
        c.set(Control::Fire, false);
        assert!(c.is_held(Control::Fire));
    }
}
