//! The letter experience: registry, coordinate bridge, collision rules,
//! spring choreography, stepping and events, orchestrated by
//! [`PhysicsManager`].

pub mod attraction;
pub mod bridge;
pub mod choreographer;
pub mod clock;
pub mod events;
pub mod input;
pub mod manager;
pub mod message;
pub mod reactor;
pub mod registry;
pub mod scheduler;
pub mod shared;

pub use attraction::{attraction_impulse, AttractionImpulse};
pub use choreographer::{ActiveSpring, SpringChoreographer, SpringId, StarterSpring};
pub use clock::{SimulationClock, Stepper};
pub use events::{EventGateway, EventKind, ExperienceEvent, SubscriptionId};
pub use input::{CursorLatch, CursorSignal, PlayerAction};
pub use manager::{FrameReport, PhysicsManager, ViewMode};
pub use message::{layout_message, LetterFinish, MessageAnchor, MessageSpec};
pub use reactor::{CollisionReactor, Reaction};
pub use registry::{
    ActuatorId, BodyEntry, BodyKind, BodyRegistry, BodyRole, ShapeKind, Tether, VisualDescriptor,
    VisualId, VisualObject,
};
pub use scheduler::{Animation, Scheduler, TaskKey};
pub use shared::SharedPhysicsManager;
