use glam::{Quat, Vec3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::RigidBody;

/// Semi-implicit Euler integrator stepping awake dynamic bodies.
#[derive(Debug, Clone)]
pub struct Integrator {
    pub gravity: Vec3,
    parallel: bool,
}

impl Integrator {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            parallel: false,
        }
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Advances every body by `dt` and clears the accumulated forces.
    pub fn step(&self, bodies: &mut [RigidBody], dt: f32) {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                let gravity = self.gravity;
                bodies
                    .par_iter_mut()
                    .for_each(|body| Self::integrate(body, gravity, dt));
                return;
            }
        }

        for body in bodies.iter_mut() {
            Self::integrate(body, self.gravity, dt);
        }
    }

    fn integrate(body: &mut RigidBody, gravity: Vec3, dt: f32) {
        if !body.is_dynamic() || body.is_asleep() {
            body.clear_forces();
            return;
        }

        let angular_acceleration = body.world_inverse_inertia() * body.torque;
        body.velocity.linear += (gravity + body.force * body.inverse_mass) * dt;
        body.velocity.angular += angular_acceleration * dt;

        body.velocity.linear *= (1.0 - body.linear_damping).powf(dt);
        body.velocity.angular *= (1.0 - body.angular_damping).powf(dt);

        body.transform.position += body.velocity.linear * dt;
        let delta = angular_velocity_to_quat(body.velocity.angular, dt);
        body.transform.rotation = (delta * body.transform.rotation).normalize();

        body.clear_forces();
    }
}

/// Converts angular velocity vector (radians/sec) into a quaternion delta.
pub fn angular_velocity_to_quat(angular: Vec3, dt: f32) -> Quat {
    let angle = angular.length() * dt;
    if angle.abs() < 1e-6 {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(angular.normalize(), angle)
}
