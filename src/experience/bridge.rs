//! Coordinate Bridge.
//!
//! The simulation is Z-up while the scene is Y-up: simulation `y` is visual
//! `z` and simulation `z` is visual `y`. Quaternions swap the same vector
//! components and keep `w`. Both directions are the same swap, so a round
//! trip returns the input bit for bit.

use glam::{Quat, Vec3};

use super::registry::{BodyEntry, BodyRole};
use crate::core::RigidBody;

/// Visual position to simulation position.
pub fn to_simulation(visual: Vec3) -> Vec3 {
    Vec3::new(visual.x, visual.z, visual.y)
}

/// Simulation position to visual position.
pub fn to_visual(simulation: Vec3) -> Vec3 {
    Vec3::new(simulation.x, simulation.z, simulation.y)
}

pub fn rotation_to_simulation(visual: Quat) -> Quat {
    Quat::from_xyzw(visual.x, visual.z, visual.y, visual.w)
}

pub fn rotation_to_visual(simulation: Quat) -> Quat {
    Quat::from_xyzw(simulation.x, simulation.z, simulation.y, simulation.w)
}

/// Moves a body to follow a viewpoint given in visual coordinates.
pub fn follow_viewpoint(body: &mut RigidBody, viewpoint: Vec3) {
    body.transform.position = to_simulation(viewpoint);
}

/// Synchronizes one entry with its body.
///
/// * actuators: the whole visual transform is copied into the simulation;
/// * free bodies: the simulated transform is copied onto the visual;
/// * springing letters: the position goes to the visual, while the
///   orientation comes back from it.
///
/// Returns `true` when a springing letter was waiting for its righting
/// animation; the request is consumed.
pub fn sync_entry(entry: &mut BodyEntry, body: &mut RigidBody) -> bool {
    if let BodyRole::Actuator { .. } = entry.role {
        body.transform.position = to_simulation(entry.visual.position);
        body.transform.rotation = rotation_to_simulation(entry.visual.rotation);
        return false;
    }

    entry.visual.position = to_visual(body.transform.position);
    if !entry.role.is_springing() {
        entry.visual.rotation = rotation_to_visual(body.transform.rotation);
        return false;
    }

    let start_righting = entry.role.take_righting_request();
    body.transform.rotation = rotation_to_simulation(entry.visual.rotation);
    start_righting
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_and_depth_are_swapped() {
        assert_eq!(to_simulation(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 3.0, 2.0));
        assert_eq!(to_visual(Vec3::new(1.0, 3.0, 2.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn quaternion_components_follow_the_axes() {
        let q = Quat::from_xyzw(0.1, 0.2, 0.3, 0.9);
        let swapped = rotation_to_simulation(q);
        assert_eq!(swapped.to_array(), [0.1, 0.3, 0.2, 0.9]);
        assert_eq!(rotation_to_visual(swapped), q);
    }
}
