use std::collections::{HashMap, HashSet};

use glam::Vec3;

use crate::core::{BodyHandle, BodySet, RigidBody};

/// Widest body, in cells per axis, still stored in the grid. Larger bodies
/// are paired against every other body instead.
pub const MAX_CELLS_PER_AXIS: u32 = 8;

/// Uniform grid spatial partitioning used by the broad-phase.
pub struct SpatialGrid {
    cell_size: f32,
    grid: HashMap<(i32, i32, i32), Vec<BodyHandle>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            grid: HashMap::new(),
        }
    }

    fn world_to_grid(&self, pos: Vec3) -> (i32, i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
            (pos.z / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Registers `handle` in every cell its bounding sphere overlaps.
    ///
    /// Returns `false` without touching the grid when the sphere spans more
    /// than [`MAX_CELLS_PER_AXIS`] cells along an axis or is not finite.
    pub fn insert(&mut self, handle: BodyHandle, position: Vec3, radius: f32) -> bool {
        let span = 2.0 * radius / self.cell_size;
        if !position.is_finite() || !(span <= MAX_CELLS_PER_AXIS as f32) {
            return false;
        }

        let min_cell = self.world_to_grid(position - Vec3::splat(radius));
        let max_cell = self.world_to_grid(position + Vec3::splat(radius));

        for x in min_cell.0..=max_cell.0 {
            for y in min_cell.1..=max_cell.1 {
                for z in min_cell.2..=max_cell.2 {
                    self.grid.entry((x, y, z)).or_default().push(handle);
                }
            }
        }
        true
    }

    /// Every pair of handles sharing at least one cell, smallest handle first.
    pub fn pairs(&self) -> HashSet<(BodyHandle, BodyHandle)> {
        let mut pairs = HashSet::new();
        for members in self.grid.values() {
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    if a != b {
                        pairs.insert(((*a).min(*b), (*a).max(*b)));
                    }
                }
            }
        }
        pairs
    }
}

/// Broad phase driver returning candidate body pairs.
///
/// Planes are unbounded and never enter the grid; the world tests them
/// against every body directly. Bodies too large for the grid are kept
/// aside and paired with every other body.
pub struct BroadPhase {
    grid: SpatialGrid,
    oversized: Vec<BodyHandle>,
}

impl BroadPhase {
    pub fn new(cell_size: f32) -> Self {
        Self {
            grid: SpatialGrid::new(cell_size),
            oversized: Vec::new(),
        }
    }

    /// Bodies left out of the grid by the last [`Self::potential_pairs`].
    pub fn oversized(&self) -> &[BodyHandle] {
        &self.oversized
    }

    /// Candidate pairs of awake, bounded bodies where at least one is dynamic.
    pub fn potential_pairs(
        &mut self,
        bodies: &BodySet<RigidBody>,
    ) -> Vec<(BodyHandle, BodyHandle)> {
        self.grid.clear();
        self.oversized.clear();
        let mut gridded = Vec::new();
        for (handle, body) in bodies.iter() {
            if body.is_asleep() || body.shape.is_plane() {
                continue;
            }
            if self
                .grid
                .insert(handle, body.position(), body.shape.bounding_radius())
            {
                gridded.push(handle);
            } else {
                self.oversized.push(handle);
            }
        }

        let mut candidates = self.grid.pairs();
        for (i, &large) in self.oversized.iter().enumerate() {
            for &other in gridded.iter().chain(&self.oversized[i + 1..]) {
                candidates.insert((large.min(other), large.max(other)));
            }
        }

        let mut pairs: Vec<_> = candidates
            .into_iter()
            .filter(|(a, b)| {
                let dynamic = |h: &BodyHandle| bodies.get(*h).is_some_and(RigidBody::is_dynamic);
                dynamic(a) || dynamic(b)
            })
            .filter(|(a, b)| match (bodies.get(*a), bodies.get(*b)) {
                (Some(body_a), Some(body_b)) => {
                    let reach = body_a.shape.bounding_radius() + body_b.shape.bounding_radius();
                    body_a.position().distance_squared(body_b.position()) <= reach * reach
                }
                _ => false,
            })
            .collect();
        pairs.sort();
        pairs
    }
}
