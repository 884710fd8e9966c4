//! Player-Attraction Impulse Model.

use glam::Vec3;

use super::bridge;

/// Divisor of the spin-inducing local impulse.
const LOCAL_IMPULSE_DIVISOR: f32 = 30.0;
/// Divisor of the center impulse for letters.
const SPRINGABLE_DIVISOR: f32 = 2.0;
/// Divisor of the center impulse for decorations.
const DECORATION_DIVISOR: f32 = 500.0;

/// Impulses nudging one body toward the viewpoint, in simulation axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractionImpulse {
    /// Body-local impulse applied at the body's position expressed locally,
    /// so it tilts the body as well.
    pub local: Vec3,
    /// Impulse applied at the center of mass.
    pub center: Vec3,
}

/// Impulses for a body at `body_visual` attracted to `viewpoint_visual`,
/// both in visual coordinates. `None` when the two coincide.
pub fn attraction_impulse(
    body_visual: Vec3,
    viewpoint_visual: Vec3,
    force: f32,
    springable: bool,
) -> Option<AttractionImpulse> {
    let direction = bridge::to_simulation(viewpoint_visual - body_visual).try_normalize()?;
    let divisor = if springable {
        SPRINGABLE_DIVISOR
    } else {
        DECORATION_DIVISOR
    };

    Some(AttractionImpulse {
        local: direction * (force / LOCAL_IMPULSE_DIVISOR),
        center: direction * (force / divisor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn points_toward_the_viewpoint_in_simulation_axes() {
        let impulse = attraction_impulse(Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0), 10.0, true)
            .expect("distinct points");
        assert!(impulse.center.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-6));
        assert_abs_diff_eq!(impulse.local.length(), 10.0 / 30.0, epsilon = 1e-6);
    }

    #[test]
    fn letters_are_pulled_harder_than_decorations() {
        let target = Vec3::new(1.0, 2.0, 3.0);
        let letter = attraction_impulse(Vec3::ZERO, target, 10.0, true).expect("distinct points");
        let shape = attraction_impulse(Vec3::ZERO, target, 10.0, false).expect("distinct points");

        assert!(letter.center.length() > shape.center.length());
        assert_eq!(letter.local, shape.local);
    }

    #[test]
    fn coincident_points_yield_nothing() {
        assert!(attraction_impulse(Vec3::ONE, Vec3::ONE, 10.0, true).is_none());
    }
}
