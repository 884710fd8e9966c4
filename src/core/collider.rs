use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use super::types::{Aabb, InertiaTensorExt, Transform};

/// Enumeration of supported collision geometries, in body-local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Sphere {
        radius: f32,
    },
    Box {
        half_extents: Vec3,
    },
    ConvexHull {
        vertices: Vec<Vec3>,
    },
    /// Infinite half-space whose solid side lies below the local +Z axis.
    Plane,
}

impl ColliderShape {
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box { half_extents }
    }

    pub fn convex_hull(vertices: Vec<Vec3>) -> Self {
        Self::ConvexHull { vertices }
    }

    pub fn is_plane(&self) -> bool {
        matches!(self, Self::Plane)
    }

    /// Farthest world-space point of the shape along `direction`.
    pub fn support(&self, transform: &Transform, direction: Vec3) -> Vec3 {
        match self {
            Self::Sphere { radius } => {
                transform.position + direction.normalize_or_zero() * *radius
            }
            Self::Box { half_extents } => {
                let local_dir = transform.rotation.conjugate() * direction;
                let local = Vec3::new(
                    half_extents.x.copysign(local_dir.x),
                    half_extents.y.copysign(local_dir.y),
                    half_extents.z.copysign(local_dir.z),
                );
                transform.transform_point(local)
            }
            Self::ConvexHull { vertices } => {
                let local_dir = transform.rotation.conjugate() * direction;
                let best = vertices
                    .iter()
                    .copied()
                    .fold(None::<(Vec3, f32)>, |best, v| {
                        let score = v.dot(local_dir);
                        match best {
                            Some((_, best_score)) if best_score >= score => best,
                            _ => Some((v, score)),
                        }
                    })
                    .map(|(v, _)| v)
                    .unwrap_or(Vec3::ZERO);
                transform.transform_point(best)
            }
            // A plane has no finite support; its surface point stands in.
            Self::Plane => transform.position,
        }
    }

    /// Radius of a sphere centered on the body enclosing the shape.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Sphere { radius } => *radius,
            Self::Box { half_extents } => half_extents.length(),
            Self::ConvexHull { vertices } => {
                vertices.iter().map(|v| v.length()).fold(0.0, f32::max)
            }
            Self::Plane => f32::INFINITY,
        }
    }

    /// Body-local inertia tensor for the given mass.
    pub fn inertia(&self, mass: f32) -> Mat3 {
        match self {
            Self::Sphere { radius } => Mat3::for_solid_sphere(*radius, mass),
            Self::Box { half_extents } => Mat3::for_solid_box(*half_extents, mass),
            Self::ConvexHull { vertices } => Aabb::from_points(vertices)
                .map(|aabb| Mat3::for_solid_box(aabb.half_extents(), mass))
                .unwrap_or(Mat3::ZERO),
            Self::Plane => Mat3::ZERO,
        }
    }
}
