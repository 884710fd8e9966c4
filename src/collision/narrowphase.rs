use glam::Vec3;

use crate::core::{BodyHandle, ColliderShape, RigidBody};

/// Contact between two bodies; `normal` points from `body_a` toward `body_b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub point: Vec3,
    pub normal: Vec3,
    pub depth: f32,
}

/// Narrow-phase dispatcher.
pub struct NarrowPhase;

impl NarrowPhase {
    const MIN_DEPTH: f32 = 1e-4;

    pub fn collide(a: &RigidBody, b: &RigidBody) -> Option<Contact> {
        match (&a.shape, &b.shape) {
            (ColliderShape::Plane, ColliderShape::Plane) => None,
            (ColliderShape::Plane, _) => Self::plane_contact(a, b),
            (_, ColliderShape::Plane) => Self::plane_contact(b, a),
            (ColliderShape::Sphere { radius: ra }, ColliderShape::Sphere { radius: rb }) => {
                Self::sphere_sphere(a, *ra, b, *rb)
            }
            _ => Self::convex_contact(a, b),
        }
    }

    fn sphere_sphere(a: &RigidBody, ra: f32, b: &RigidBody, rb: f32) -> Option<Contact> {
        let delta = b.position() - a.position();
        let distance = delta.length();
        let depth = ra + rb - distance;
        if depth <= 0.0 {
            return None;
        }

        let normal = if distance > GjkAlgorithm::EPSILON {
            delta / distance
        } else {
            Vec3::Z
        };
        Some(Contact {
            body_a: a.handle,
            body_b: b.handle,
            point: a.position() + normal * (ra - depth * 0.5),
            normal,
            depth,
        })
    }

    fn plane_contact(plane: &RigidBody, other: &RigidBody) -> Option<Contact> {
        let normal = plane.transform.rotation * Vec3::Z;
        let deepest = other.support(-normal);
        let distance = (deepest - plane.position()).dot(normal);
        if distance >= 0.0 {
            return None;
        }

        Some(Contact {
            body_a: plane.handle,
            body_b: other.handle,
            point: deepest,
            normal,
            depth: -distance,
        })
    }

    /// Overlap along the center axis once GJK confirms intersection.
    fn convex_contact(a: &RigidBody, b: &RigidBody) -> Option<Contact> {
        if !GjkAlgorithm::intersect(a, b) {
            return None;
        }

        let normal = (b.position() - a.position())
            .try_normalize()
            .unwrap_or(Vec3::Z);
        let reach_a = a.support(normal);
        let reach_b = b.support(-normal);
        let depth = (reach_a - reach_b).dot(normal).max(Self::MIN_DEPTH);

        Some(Contact {
            body_a: a.handle,
            body_b: b.handle,
            point: (reach_a + reach_b) * 0.5,
            normal,
            depth,
        })
    }
}

/// Boolean Gilbert-Johnson-Keerthi test on the Minkowski difference.
pub struct GjkAlgorithm;

impl GjkAlgorithm {
    const MAX_ITERATIONS: usize = 32;
    const EPSILON: f32 = 1e-6;

    pub fn intersect(a: &RigidBody, b: &RigidBody) -> bool {
        let support = |direction: Vec3| a.support(direction) - b.support(-direction);

        let mut direction = b.position() - a.position();
        if direction.length_squared() < Self::EPSILON {
            direction = Vec3::X;
        }

        let first = support(direction);
        let mut simplex = vec![first];
        direction = -first;

        for _ in 0..Self::MAX_ITERATIONS {
            if direction.length_squared() < Self::EPSILON {
                return true;
            }

            let point = support(direction);
            if point.dot(direction) < 0.0 {
                return false;
            }

            simplex.push(point);
            if Self::evolve(&mut simplex, &mut direction) {
                return true;
            }
        }

        false
    }

    /// Reduces the simplex to the feature closest to the origin. The newest
    /// point is always last.
    fn evolve(simplex: &mut Vec<Vec3>, direction: &mut Vec3) -> bool {
        match simplex.len() {
            2 => Self::line(simplex, direction),
            3 => Self::triangle(simplex, direction),
            4 => Self::tetrahedron(simplex, direction),
            _ => false,
        }
    }

    fn line(simplex: &mut Vec<Vec3>, direction: &mut Vec3) -> bool {
        let a = simplex[1];
        let b = simplex[0];
        let ab = b - a;
        let ao = -a;

        if ab.dot(ao) > 0.0 {
            let towards = ab.cross(ao).cross(ab);
            if towards.length_squared() < Self::EPSILON {
                // Origin lies on the segment.
                return true;
            }
            *direction = towards;
        } else {
            *simplex = vec![a];
            *direction = ao;
        }
        false
    }

    fn triangle(simplex: &mut Vec<Vec3>, direction: &mut Vec3) -> bool {
        let a = simplex[2];
        let b = simplex[1];
        let c = simplex[0];
        let ab = b - a;
        let ac = c - a;
        let ao = -a;
        let abc = ab.cross(ac);

        if abc.cross(ac).dot(ao) > 0.0 {
            if ac.dot(ao) > 0.0 {
                *simplex = vec![c, a];
                *direction = ac.cross(ao).cross(ac);
                false
            } else {
                *simplex = vec![b, a];
                Self::line(simplex, direction)
            }
        } else if ab.cross(abc).dot(ao) > 0.0 {
            *simplex = vec![b, a];
            Self::line(simplex, direction)
        } else {
            let side = abc.dot(ao);
            if side.abs() < Self::EPSILON {
                // Origin lies inside the triangle.
                return true;
            }
            if side > 0.0 {
                *direction = abc;
            } else {
                *simplex = vec![b, c, a];
                *direction = -abc;
            }
            false
        }
    }

    fn tetrahedron(simplex: &mut Vec<Vec3>, direction: &mut Vec3) -> bool {
        let a = simplex[3];
        let b = simplex[2];
        let c = simplex[1];
        let d = simplex[0];
        let ao = -a;

        // Each face through `a`, with the vertex it does not contain.
        let faces = [(b, c, d), (c, d, b), (d, b, c)];
        for (x, y, opposite) in faces {
            let mut normal = (x - a).cross(y - a);
            if normal.dot(opposite - a) > 0.0 {
                normal = -normal;
            }
            if normal.dot(ao) > 0.0 {
                *simplex = vec![y, x, a];
                *direction = normal;
                return false;
            }
        }

        true
    }
}
