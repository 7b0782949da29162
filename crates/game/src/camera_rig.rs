//! Orbit-follow camera behind the aircraft.
//!
//! The pose is a pure function of the aircraft transform and three numbers:
//! `theta` (orbit around the aircraft's up axis, 0 = directly behind), `phi`
//! (elevation above the wing plane) and `radius`.

use engine_core::Transform;
use glam::Vec3;
use input::Controls;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub default_radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Resting elevation in radians.
    pub base_phi: f32,
    pub min_phi: f32,
    pub max_phi: f32,
    /// Seconds without look input before the offset starts returning.
    pub idle_delay: f32,
    /// Return rate toward the resting offset (1/s).
    pub return_rate: f32,
    /// Elevation while looking behind.
    pub look_behind_phi: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            default_radius: 30.0,
            min_radius: 12.0,
            max_radius: 90.0,
            base_phi: 0.2,
            min_phi: -0.35,
            max_phi: 1.35,
            idle_delay: 1.5,
            return_rate: 2.5,
            look_behind_phi: 0.25,
        }
    }
}

/// World-space camera placement handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

/// Camera placement around `aircraft` for the given orbit parameters.
pub fn camera_pose(aircraft: &Transform, theta: f32, phi: f32, radius: f32) -> CameraPose {
    let back = -aircraft.forward();
    let right = aircraft.right();
    let up = aircraft.up();

    let offset = back * (radius * phi.cos() * theta.cos())
        + right * (radius * phi.cos() * theta.sin())
        + up * (radius * phi.sin());

    CameraPose {
        position: aircraft.position + offset,
        target: aircraft.position,
        up,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub theta: f32,
    pub phi: f32,
    pub radius: f32,
    /// Seconds since the last look input.
    pub idle_time: f32,
    pub look_behind: bool,
}

impl CameraRig {
    pub fn new(tuning: &CameraTuning) -> Self {
        Self {
            theta: 0.0,
            phi: tuning.base_phi,
            radius: tuning.default_radius,
            idle_time: 0.0,
            look_behind: false,
        }
    }

    pub fn update(&mut self, controls: &Controls, tuning: &CameraTuning, dt: f32) {
        self.radius = (self.radius + controls.zoom_delta).clamp(tuning.min_radius, tuning.max_radius);
        self.look_behind = controls.look_behind;

        if controls.has_look_input() {
            self.theta += controls.look_delta.x;
            self.phi = (self.phi + controls.look_delta.y).clamp(tuning.min_phi, tuning.max_phi);
            self.idle_time = 0.0;
            return;
        }

        self.idle_time += dt;
        if self.look_behind || self.idle_time < tuning.idle_delay {
            return;
        }

        let t = (tuning.return_rate * dt).clamp(0.0, 1.0);
        self.theta = wrap_angle(self.theta) * (1.0 - t);
        self.phi += (tuning.base_phi - self.phi) * t;
    }

    /// Effective orbit angles, with look-behind overriding the user offset.
    pub fn angles(&self, tuning: &CameraTuning) -> (f32, f32) {
        if self.look_behind {
            (PI, tuning.look_behind_phi)
        } else {
            (self.theta, self.phi)
        }
    }

    pub fn pose(&self, aircraft: &Transform, tuning: &CameraTuning) -> CameraPose {
        let (theta, phi) = self.angles(tuning);
        camera_pose(aircraft, theta, phi, self.radius)
    }

    pub fn reset(&mut self, tuning: &CameraTuning) {
        *self = Self::new(tuning);
    }
}

/// Map an angle into (-PI, PI] so decay takes the short way round.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}
