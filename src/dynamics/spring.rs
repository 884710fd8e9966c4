use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::RigidBody;

/// Damped Hookean spring between a fixed, massless anchor point and a body.
///
/// The anchor never moves, so only the body receives the force. Both
/// attachment points are given in local coordinates of their side; the
/// anchor side has no rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub local_anchor_a: Vec3,
    pub local_anchor_b: Vec3,
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Spring {
    pub fn new(local_anchor_a: Vec3, rest_length: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            local_anchor_a,
            local_anchor_b: Vec3::ZERO,
            rest_length,
            stiffness,
            damping,
        }
    }

    /// Accumulates the spring force on `body` for an anchor at `anchor`.
    pub fn apply(&self, anchor: Vec3, body: &mut RigidBody) {
        let world_a = anchor + self.local_anchor_a;
        let offset_b = body.transform.rotation * self.local_anchor_b;
        let world_b = body.transform.position + offset_b;

        let stretch = world_b - world_a;
        let length = stretch.length();
        if length < 1e-6 {
            return;
        }

        let direction = stretch / length;
        let relative_velocity = body.velocity.at_offset(offset_b);
        let magnitude = -self.stiffness * (length - self.rest_length)
            - self.damping * relative_velocity.dot(direction);

        body.apply_force_at(direction * magnitude, offset_b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BodyOptions;
    use crate::core::ColliderShape;
    use glam::Quat;

    fn letter(position: Vec3) -> RigidBody {
        RigidBody::new(ColliderShape::cuboid(Vec3::splat(0.5)), BodyOptions::floating())
            .with_transform(position, Quat::IDENTITY)
    }

    #[test]
    fn stretched_spring_pulls_towards_anchor() {
        let spring = Spring::new(Vec3::ZERO, 0.0, 50.0, 40.0);
        let mut body = letter(Vec3::new(2.0, 0.0, 0.0));

        spring.apply(Vec3::ZERO, &mut body);
        assert!((body.force.x + 100.0).abs() < 1e-4);
    }

    #[test]
    fn spring_at_rest_length_only_damps() {
        let spring = Spring::new(Vec3::ZERO, 2.0, 50.0, 40.0);
        let mut body = letter(Vec3::new(2.0, 0.0, 0.0));
        body.velocity.linear = Vec3::new(1.0, 0.0, 0.0);

        spring.apply(Vec3::ZERO, &mut body);
        assert!((body.force.x + 40.0).abs() < 1e-4);
    }
}
