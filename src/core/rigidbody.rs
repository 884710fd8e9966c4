use glam::{Mat3, Quat, Vec3};

use super::body_set::BodyHandle;
use super::collider::ColliderShape;
use super::types::{Transform, Velocity};
use crate::config::BodyOptions;

/// Whether the body takes part in integration and contact generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepState {
    #[default]
    Awake,
    Asleep,
}

/// Rigid body with a single collision shape.
///
/// A body with zero mass is static: forces and impulses leave it untouched
/// and only its owner moves it by writing the transform directly.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub handle: BodyHandle,
    pub transform: Transform,
    pub velocity: Velocity,
    pub force: Vec3,
    pub torque: Vec3,
    pub shape: ColliderShape,
    pub mass: f32,
    pub inverse_mass: f32,
    pub inverse_inertia: Mat3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub sleep_state: SleepState,
}

impl RigidBody {
    pub fn new(shape: ColliderShape, options: BodyOptions) -> Self {
        let mass = options.mass.max(0.0);
        let (inverse_mass, inverse_inertia) = if mass < f32::EPSILON {
            (0.0, Mat3::ZERO)
        } else {
            let inertia = shape.inertia(mass);
            let inverse = if inertia.determinant().abs() < f32::EPSILON {
                Mat3::ZERO
            } else {
                inertia.inverse()
            };
            (1.0 / mass, inverse)
        };

        Self {
            handle: BodyHandle(u32::MAX),
            transform: Transform::default(),
            velocity: Velocity::default(),
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            shape,
            mass,
            inverse_mass,
            inverse_inertia,
            linear_damping: options.linear_damping.clamp(0.0, 1.0),
            angular_damping: options.angular_damping.clamp(0.0, 1.0),
            sleep_state: SleepState::Awake,
        }
    }

    /// Massless body that never moves on its own.
    pub fn fixed(shape: ColliderShape) -> Self {
        Self::new(shape, BodyOptions::default())
    }

    pub fn with_transform(mut self, position: Vec3, rotation: Quat) -> Self {
        self.transform = Transform::from_position_rotation(position, rotation);
        self
    }

    pub fn is_dynamic(&self) -> bool {
        self.inverse_mass > 0.0
    }

    pub fn is_asleep(&self) -> bool {
        self.sleep_state == SleepState::Asleep
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn support(&self, direction: Vec3) -> Vec3 {
        self.shape.support(&self.transform, direction)
    }

    /// Inverse inertia tensor expressed in world axes.
    pub fn world_inverse_inertia(&self) -> Mat3 {
        let rotation = Mat3::from_quat(self.transform.rotation);
        rotation * self.inverse_inertia * rotation.transpose()
    }

    /// Accumulates a force through the center of mass.
    pub fn apply_force(&mut self, force: Vec3) {
        if !self.is_dynamic() {
            return;
        }
        self.force += force;
    }

    /// Accumulates a force applied at `offset` from the center of mass.
    pub fn apply_force_at(&mut self, force: Vec3, offset: Vec3) {
        if !self.is_dynamic() {
            return;
        }
        self.force += force;
        self.torque += offset.cross(force);
    }

    /// Instantly changes momentum by `impulse` applied at a world point.
    pub fn apply_impulse(&mut self, impulse: Vec3, world_point: Vec3) {
        if !self.is_dynamic() {
            return;
        }
        let offset = world_point - self.transform.position;
        self.velocity.linear += impulse * self.inverse_mass;
        self.velocity.angular += self.world_inverse_inertia() * offset.cross(impulse);
    }

    /// Impulse and point given in body-local axes, rotated into the world
    /// before being applied.
    pub fn apply_local_impulse(&mut self, local_impulse: Vec3, local_point: Vec3) {
        let rotation = self.transform.rotation;
        self.apply_impulse(rotation * local_impulse, rotation * local_point);
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Stops the body and removes it from integration and contacts.
    pub fn sleep(&mut self) {
        self.sleep_state = SleepState::Asleep;
        self.velocity = Velocity::default();
        self.clear_forces();
    }

    pub fn wake_up(&mut self) {
        self.sleep_state = SleepState::Awake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn massless_body_ignores_impulses() {
        let mut body = RigidBody::fixed(ColliderShape::sphere(1.0));
        body.apply_impulse(Vec3::X, Vec3::ZERO);
        body.apply_force(Vec3::X);
        assert_eq!(body.velocity.linear, Vec3::ZERO);
        assert_eq!(body.force, Vec3::ZERO);
    }

    #[test]
    fn off_center_impulse_spins_the_body() {
        let options = BodyOptions {
            mass: 2.0,
            ..BodyOptions::default()
        };
        let mut body = RigidBody::new(ColliderShape::cuboid(Vec3::splat(0.5)), options);
        body.apply_impulse(Vec3::X, Vec3::new(0.0, 0.5, 0.0));

        assert!((body.velocity.linear.x - 0.5).abs() < 1e-6);
        assert!(body.velocity.angular.z < 0.0);
    }

    #[test]
    fn sleeping_clears_motion() {
        let options = BodyOptions {
            mass: 1.0,
            ..BodyOptions::default()
        };
        let mut body = RigidBody::new(ColliderShape::sphere(0.5), options);
        body.velocity.linear = Vec3::ONE;
        body.sleep();
        assert!(body.is_asleep());
        assert_eq!(body.velocity.linear, Vec3::ZERO);
    }
}
