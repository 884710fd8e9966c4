//! Collision detection: broad-phase grid and narrow-phase contact tests.

pub mod broadphase;
pub mod narrowphase;

pub use broadphase::{BroadPhase, SpatialGrid};
pub use narrowphase::{Contact, GjkAlgorithm, NarrowPhase};
