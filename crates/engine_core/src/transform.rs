//! 2D transform component for spatial positioning.

use glam::Vec2;

/// A 2D transform: world position plus a rotation angle in radians.
///
/// The simulation is strictly planar; there is no third axis to pin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2 {
    pub position: Vec2,
    /// Rotation in radians, counter-clockwise from +X.
    pub rotation: f32,
}

impl Default for Transform2 {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

impl Transform2 {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }

    /// Get the facing direction (unit vector at the rotation angle).
    pub fn facing(&self) -> Vec2 {
        Vec2::new(self.rotation.cos(), self.rotation.sin())
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Spin by an angle delta (cosmetic rotation for projectiles).
    pub fn rotate(&mut self, angle: f32) {
        self.rotation += angle;
    }

    /// Point the rotation at a world-space target.
    pub fn look_at(&mut self, target: Vec2) {
        let to_target = target - self.position;
        if to_target.length_squared() > 0.0001 {
            self.rotation = to_target.y.atan2(to_target.x);
        }
    }
}
