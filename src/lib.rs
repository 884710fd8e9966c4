//! Spring Message – physics core of a letter-popping experience.
//!
//! Floating letters are simulated as rigid bodies. Player-driven actuators
//! strike them, springs pull every struck letter to its place in a message,
//! and the resulting transforms are mirrored onto the host's scene objects.
//! [`PhysicsManager`] owns the simulation and exposes the whole flow; the
//! host only feeds poses and timestamps and consumes [`ExperienceEvent`]s.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod experience;
pub mod utils;
pub mod world;

pub use glam::{Quat, Vec3};

pub use collision::{BroadPhase, Contact, NarrowPhase};
pub use config::{BodyOptions, ExperienceConfig};
pub use core::{Aabb, BodyHandle, ColliderShape, RigidBody, Transform, Velocity};
pub use dynamics::{ContactSolver, Integrator, Spring};
pub use error::{ExperienceError, Result};
pub use experience::{
    ActuatorId, BodyKind, BodyRole, CursorSignal, EventKind, ExperienceEvent, FrameReport,
    MessageSpec, PhysicsManager, PlayerAction, ShapeKind, SharedPhysicsManager, ViewMode,
    VisualDescriptor, VisualId, VisualObject,
};
pub use world::{CollisionEvent, PhysicsWorld};
