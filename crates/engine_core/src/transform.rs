//! Transform component and utilities for spatial positioning.

use glam::{Quat, Vec3};

/// Position plus orientation of a simulated body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Transform a point from local space into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Turn so the forward axis points along `direction`. Zero-length input is ignored.
    pub fn face_direction(&mut self, direction: Vec3) {
        if let Some(dir) = direction.try_normalize() {
            self.rotation = Quat::from_rotation_arc(-Vec3::Z, dir);
        }
    }
}

/// Distance between two points ignoring height.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_direction_points_forward_axis() {
        let mut t = Transform::default();
        t.face_direction(Vec3::new(1.0, 0.0, 0.0));
        assert!((t.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn face_direction_ignores_zero() {
        let mut t = Transform::default();
        t.face_direction(Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn planar_distance_ignores_y() {
        let d = planar_distance(Vec3::new(3.0, 100.0, 0.0), Vec3::new(0.0, -5.0, 4.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn transform_point_applies_rotation() {
        let t = Transform::from_position_rotation(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        // Local +X rotated a quarter turn about Y ends up on -Z.
        let p = t.transform_point(Vec3::X);
        assert!((p - Vec3::new(10.0, 0.0, -1.0)).length() < 1e-5);
    }
}
