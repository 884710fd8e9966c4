use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};
use log::debug;

use crate::{
    collision::{BroadPhase, Contact, NarrowPhase},
    config::ExperienceConfig,
    core::{BodyHandle, BodySet, ColliderShape, RigidBody},
    dynamics::{ContactSolver, Integrator},
    utils::logging::ScopedTimer,
};

/// Notification that two bodies touched during a sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
}

impl CollisionEvent {
    /// The handle on the other side of `handle`, if `handle` takes part.
    pub fn other(&self, handle: BodyHandle) -> Option<BodyHandle> {
        if self.body_a == handle {
            Some(self.body_b)
        } else if self.body_b == handle {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// Rigid-body simulation driven by the experience.
///
/// Collision notifications are queued while stepping and handed out by
/// [`PhysicsWorld::drain_collision_events`] once the step is over, so the
/// consumer can mutate the world while reacting to them.
pub struct PhysicsWorld {
    bodies: BodySet<RigidBody>,
    pub integrator: Integrator,
    pub solver: ContactSolver,
    broadphase: BroadPhase,
    time_accumulated: f32,
    collision_events: Vec<CollisionEvent>,
    parallel_enabled: bool,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3, restitution: f32, cell_size: f32) -> Self {
        Self {
            bodies: BodySet::new(),
            integrator: Integrator::new(gravity),
            solver: ContactSolver::new(restitution),
            broadphase: BroadPhase::new(cell_size),
            time_accumulated: 0.0,
            collision_events: Vec::new(),
            parallel_enabled: false,
        }
    }

    pub fn from_config(config: &ExperienceConfig) -> Self {
        Self::new(
            config.gravity,
            config.restitution,
            config.broadphase_cell_size,
        )
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.parallel_enabled = enabled;
        self.integrator.set_parallel(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel_enabled
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = self.bodies.insert(body);
        if let Some(stored) = self.bodies.get_mut(handle) {
            stored.handle = handle;
        }
        handle
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> + '_ {
        self.bodies.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Leftover time not yet consumed by a fixed sub-step.
    pub fn time_accumulated(&self) -> f32 {
        self.time_accumulated
    }

    /// Stops a body and removes it from integration and contacts.
    pub fn sleep(&mut self, handle: BodyHandle) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.sleep();
        }
    }

    pub fn wake_up(&mut self, handle: BodyHandle) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.wake_up();
        }
    }

    /// Infinite static plane through the origin facing up.
    pub fn add_ground_plane(&mut self) -> BodyHandle {
        self.add_body(RigidBody::fixed(ColliderShape::Plane))
    }

    /// Encloses the play area with four inward-facing walls and a ceiling.
    ///
    /// `width_x` spans the x axis, `height` the vertical axis and `width_z`
    /// the horizontal depth axis (simulation y).
    pub fn set_closed_area(&mut self, width_x: f32, height: f32, width_z: f32) -> Vec<BodyHandle> {
        let mid = height / 2.0;
        let walls = [
            (Vec3::new(-width_x / 2.0, 0.0, mid), Quat::from_rotation_y(FRAC_PI_2)),
            (Vec3::new(width_x / 2.0, 0.0, mid), Quat::from_rotation_y(-FRAC_PI_2)),
            (Vec3::new(0.0, -width_z / 2.0, mid), Quat::from_rotation_x(-FRAC_PI_2)),
            (Vec3::new(0.0, width_z / 2.0, mid), Quat::from_rotation_x(FRAC_PI_2)),
            (Vec3::new(0.0, 0.0, height), Quat::from_rotation_y(PI)),
        ];

        walls
            .into_iter()
            .map(|(position, rotation)| {
                let wall =
                    RigidBody::fixed(ColliderShape::Plane).with_transform(position, rotation);
                self.add_body(wall)
            })
            .collect()
    }

    /// Advances the simulation by `dt` seconds in fixed sub-steps of
    /// `time_step`, taking at most `max_sub_steps` of them. Time that does
    /// not fit is dropped. Returns the number of sub-steps taken.
    pub fn step(&mut self, time_step: f32, dt: f32, max_sub_steps: u32) -> u32 {
        let _timer = ScopedTimer::new("world::step");
        if time_step <= 0.0 || dt < 0.0 {
            return 0;
        }

        self.time_accumulated += dt;
        let mut substeps = 0;
        while self.time_accumulated >= time_step && substeps < max_sub_steps {
            self.internal_step(time_step);
            self.time_accumulated -= time_step;
            substeps += 1;
        }

        if self.time_accumulated >= time_step {
            debug!(
                "Dropping {:.4}s of simulation time after {substeps} sub-steps",
                self.time_accumulated - self.time_accumulated % time_step
            );
        }
        self.time_accumulated %= time_step;
        substeps
    }

    /// Collision notifications raised since the last drain, in detection order.
    pub fn drain_collision_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.collision_events)
    }

    /// Contacts of the current state without advancing the simulation.
    pub fn collect_contacts(&mut self) -> Vec<Contact> {
        self.generate_contacts()
    }

    fn internal_step(&mut self, time_step: f32) {
        let contacts = {
            let _timer = ScopedTimer::new("contacts::generate");
            self.generate_contacts()
        };

        for contact in &contacts {
            self.collision_events.push(CollisionEvent {
                body_a: contact.body_a,
                body_b: contact.body_b,
            });
            if let Some((a, b)) = self.bodies.get_pair_mut(contact.body_a, contact.body_b) {
                self.solver.resolve(a, b, contact);
            }
        }

        let _timer = ScopedTimer::new("integrator");
        self.integrator.step(self.bodies.as_mut_slice(), time_step);
    }

    fn generate_contacts(&mut self) -> Vec<Contact> {
        if self.bodies.len() < 2 {
            return Vec::new();
        }

        let mut contacts = Vec::new();
        for (a, b) in self.broadphase.potential_pairs(&self.bodies) {
            let (Some(body_a), Some(body_b)) = (self.bodies.get(a), self.bodies.get(b)) else {
                continue;
            };
            if let Some(contact) = NarrowPhase::collide(body_a, body_b) {
                contacts.push(contact);
            }
        }

        let planes = self
            .bodies
            .iter()
            .filter(|(_, body)| body.shape.is_plane() && !body.is_asleep());
        for (_, plane) in planes {
            let others = self.bodies.iter().filter(|(_, body)| {
                !body.shape.is_plane() && body.is_dynamic() && !body.is_asleep()
            });
            for (_, other) in others {
                if let Some(contact) = NarrowPhase::collide(plane, other) {
                    contacts.push(contact);
                }
            }
        }

        contacts
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::from_config(&ExperienceConfig::default())
    }
}
