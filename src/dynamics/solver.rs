use crate::collision::Contact;
use crate::core::RigidBody;

/// Sequential impulse resolver for single-point contacts.
///
/// Only the normal direction is solved: no friction, no contact torque.
#[derive(Debug, Clone, Copy)]
pub struct ContactSolver {
    pub restitution: f32,
    /// Fraction of the penetration removed per sub-step.
    pub correction: f32,
    /// Penetration tolerated without correction.
    pub slop: f32,
}

impl ContactSolver {
    pub fn new(restitution: f32) -> Self {
        Self {
            restitution,
            correction: 0.8,
            slop: 0.005,
        }
    }

    pub fn resolve(&self, a: &mut RigidBody, b: &mut RigidBody, contact: &Contact) {
        let inverse_mass_sum = a.inverse_mass + b.inverse_mass;
        if inverse_mass_sum <= 0.0 {
            return;
        }

        let normal = contact.normal;
        let closing = (b.velocity.linear - a.velocity.linear).dot(normal);
        if closing < 0.0 {
            let magnitude = -(1.0 + self.restitution) * closing / inverse_mass_sum;
            let impulse = normal * magnitude;
            a.velocity.linear -= impulse * a.inverse_mass;
            b.velocity.linear += impulse * b.inverse_mass;
        }

        let push = (contact.depth - self.slop).max(0.0) * self.correction / inverse_mass_sum;
        a.transform.position -= normal * push * a.inverse_mass;
        b.transform.position += normal * push * b.inverse_mass;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BodyOptions;
    use crate::core::{BodyHandle, ColliderShape};
    use glam::Vec3;

    #[test]
    fn static_side_absorbs_nothing() {
        let mut wall = RigidBody::fixed(ColliderShape::Plane);
        let options = BodyOptions {
            mass: 1.0,
            ..BodyOptions::default()
        };
        let mut ball = RigidBody::new(ColliderShape::sphere(0.5), options);
        ball.velocity.linear = Vec3::new(0.0, 0.0, -2.0);

        let contact = Contact {
            body_a: BodyHandle(0),
            body_b: BodyHandle(1),
            point: Vec3::ZERO,
            normal: Vec3::Z,
            depth: 0.1,
        };
        ContactSolver::new(0.5).resolve(&mut wall, &mut ball, &contact);

        assert!((ball.velocity.linear.z - 1.0).abs() < 1e-6);
        assert!(ball.transform.position.z > 0.0);
        assert_eq!(wall.transform.position, Vec3::ZERO);
    }
}
