//! Body Registry: pairs simulated bodies with visual objects and tracks the
//! role every body plays in the experience.

use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::bridge;
use crate::{
    core::{Aabb, BodyHandle, ColliderShape},
    error::{ExperienceError, Result},
};

/// Identifier of a renderable object owned by the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualId(pub u64);

impl fmt::Display for VisualId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "visual#{}", self.0)
    }
}

/// Identity of the hand, controller or pointer driving an actuator body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ActuatorId(pub u32);

impl fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "actuator#{}", self.0)
    }
}

/// Render-side state of a registered object, in the visual axis convention.
///
/// The manager writes position, rotation and fade state of simulated bodies;
/// the host writes the pose of actuators before each `update`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualObject {
    pub id: VisualId,
    pub position: Vec3,
    pub rotation: Quat,
    pub opacity: f32,
    pub visible: bool,
    pub transparent: bool,
}

impl VisualObject {
    pub fn new(id: VisualId, position: Vec3, rotation: Quat) -> Self {
        Self {
            id,
            position,
            rotation,
            opacity: 1.0,
            visible: true,
            transparent: false,
        }
    }
}

/// Everything needed to build a body for a visual object.
///
/// Bounds and vertices are in the visual convention; vertices are local to
/// the object.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualDescriptor {
    pub id: VisualId,
    pub position: Vec3,
    pub rotation: Quat,
    pub bounds: Aabb,
    pub vertices: Vec<Vec3>,
    /// Index of the message anchor this object assembles into.
    pub spring_target: Option<usize>,
}

impl VisualDescriptor {
    pub fn new(id: VisualId, position: Vec3, bounds: Aabb) -> Self {
        Self {
            id,
            position,
            rotation: Quat::IDENTITY,
            bounds,
            vertices: Vec::new(),
            spring_target: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_vertices(mut self, vertices: Vec<Vec3>) -> Self {
        self.vertices = vertices;
        self
    }

    pub fn with_spring_target(mut self, index: usize) -> Self {
        self.spring_target = Some(index);
        self
    }
}

/// Collision shape requested for a visual object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Box,
    Sphere,
    ConvexMesh,
}

/// What a caller registers a body as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Driven by the player; strikes other bodies.
    Actuator(ActuatorId),
    /// Letter that can be pulled into the message once struck.
    Springable,
    /// Floating shape that never joins the message.
    Decoration,
}

/// Whether a letter is free or held by a message spring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tether {
    #[default]
    Free,
    Springing {
        /// The orientation-righting animation has not been started yet.
        awaiting_righting: bool,
    },
}

/// Role and role-specific state of a registered body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRole {
    Actuator {
        actuator: ActuatorId,
        /// Box and convex actuators trigger the collision reactor.
        reacts_to_contact: bool,
    },
    Decoration,
    Letter {
        spring_target: Option<usize>,
        tether: Tether,
    },
    Starter,
}

impl BodyRole {
    pub fn is_actuator(&self) -> bool {
        matches!(self, BodyRole::Actuator { .. })
    }

    pub fn is_starter(&self) -> bool {
        matches!(self, BodyRole::Starter)
    }

    /// Letters and the starter get the strong attraction nudge.
    pub fn is_springable(&self) -> bool {
        matches!(self, BodyRole::Letter { .. } | BodyRole::Starter)
    }

    pub fn is_springing(&self) -> bool {
        matches!(
            self,
            BodyRole::Letter {
                tether: Tether::Springing { .. },
                ..
            }
        )
    }

    pub fn spring_target(&self) -> Option<usize> {
        match self {
            BodyRole::Letter { spring_target, .. } => *spring_target,
            _ => None,
        }
    }

    /// Free letter to springing letter awaiting righting. Any other role or
    /// state is left untouched and `false` is returned.
    pub fn begin_springing(&mut self) -> bool {
        match self {
            BodyRole::Letter { tether, .. } if *tether == Tether::Free => {
                *tether = Tether::Springing {
                    awaiting_righting: true,
                };
                true
            }
            _ => false,
        }
    }

    /// Clears the righting request, returning whether it was pending.
    pub fn take_righting_request(&mut self) -> bool {
        match self {
            BodyRole::Letter {
                tether: Tether::Springing { awaiting_righting },
                ..
            } => std::mem::replace(awaiting_righting, false),
            _ => false,
        }
    }

    /// Springing letter back to free.
    pub fn release(&mut self) -> bool {
        match self {
            BodyRole::Letter { tether, .. } if *tether != Tether::Free => {
                *tether = Tether::Free;
                true
            }
            _ => false,
        }
    }
}

/// One simulated body paired with its visual object.
#[derive(Debug, Clone)]
pub struct BodyEntry {
    pub body: BodyHandle,
    pub visual: VisualObject,
    pub role: BodyRole,
}

/// Ordered list of registered bodies.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    entries: Vec<BodyEntry>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: BodyEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BodyEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, BodyEntry> {
        self.entries.iter_mut()
    }

    pub fn has_starter(&self) -> bool {
        self.entries.iter().any(|entry| entry.role.is_starter())
    }

    /// Linear scan by body identity.
    pub fn entry_for_body(&self, body: BodyHandle) -> Option<&BodyEntry> {
        self.entries.iter().find(|entry| entry.body == body)
    }

    pub fn entry_for_body_mut(&mut self, body: BodyHandle) -> Option<&mut BodyEntry> {
        self.entries.iter_mut().find(|entry| entry.body == body)
    }

    /// The visual object paired with `body`; `None` when the body is unknown.
    pub fn visual_for_body(&self, body: BodyHandle) -> Option<&VisualObject> {
        self.entry_for_body(body).map(|entry| &entry.visual)
    }

    pub fn entry_for_visual(&self, id: VisualId) -> Option<&BodyEntry> {
        self.entries.iter().find(|entry| entry.visual.id == id)
    }

    pub fn entry_for_visual_mut(&mut self, id: VisualId) -> Option<&mut BodyEntry> {
        self.entries.iter_mut().find(|entry| entry.visual.id == id)
    }
}

/// Builds the simulation shape of a visual object.
///
/// Boxes take the half extents of the bounding box, spheres half of its
/// width, convex meshes a hull through every vertex. All of them are
/// converted to the simulation convention.
pub fn derive_shape(kind: ShapeKind, descriptor: &VisualDescriptor) -> Result<ColliderShape> {
    let bounds = &descriptor.bounds;
    if !bounds.is_valid() {
        return Err(ExperienceError::DegenerateBounds(descriptor.id));
    }

    let shape = match kind {
        ShapeKind::Box => ColliderShape::cuboid(bridge::to_simulation(bounds.half_extents())),
        ShapeKind::Sphere => ColliderShape::sphere(bounds.size().x / 2.0),
        ShapeKind::ConvexMesh => {
            if descriptor.vertices.is_empty() {
                return Err(ExperienceError::EmptyGeometry(descriptor.id));
            }
            if !descriptor.vertices.iter().all(|vertex| vertex.is_finite()) {
                return Err(ExperienceError::DegenerateBounds(descriptor.id));
            }
            let vertices = descriptor
                .vertices
                .iter()
                .copied()
                .map(bridge::to_simulation)
                .collect();
            ColliderShape::convex_hull(vertices)
        }
    };
    Ok(shape)
}
