//! Core types describing simulated bodies, their shapes, and shared data.

pub mod body_set;
pub mod collider;
pub mod rigidbody;
pub mod types;

pub use body_set::{BodyHandle, BodySet};
pub use collider::ColliderShape;
pub use rigidbody::{RigidBody, SleepState};
pub use types::{Aabb, Transform, Velocity};
