//! Common ECS components shared by simulated bodies.

use glam::Vec3;

/// Linear velocity for moving entities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3) -> Self {
        Self { linear }
    }

    pub fn speed(&self) -> f32 {
        self.linear.length()
    }

    /// Rescale so the magnitude lies in `[min, max]`. Zero vectors stay zero.
    pub fn clamp_speed(&mut self, min: f32, max: f32) {
        let speed = self.linear.length();
        if speed <= f32::EPSILON {
            return;
        }
        let clamped = speed.clamp(min, max);
        if clamped != speed {
            self.linear *= clamped / speed;
        }
    }
}

/// Lifetime component for temporary entities (explosions, debris).
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Count down; returns true once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}
