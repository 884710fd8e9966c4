//! Easing curves and time-bounded progress for scheduled animations.

use serde::{Deserialize, Serialize};

/// Easing curve mapping linear progress in `[0, 1]` onto eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    ExponentialInOut,
}

impl Easing {
    pub fn apply(self, k: f32) -> f32 {
        let k = k.clamp(0.0, 1.0);
        match self {
            Easing::Linear => k,
            Easing::ExponentialInOut => {
                if k == 0.0 || k == 1.0 {
                    return k;
                }
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * 1024f32.powf(k - 1.0)
                } else {
                    0.5 * (2.0 - 2f32.powf(-10.0 * (k - 1.0)))
                }
            }
        }
    }
}

/// Linear progress of an animation started at `start_ms` lasting `duration_ms`.
///
/// A zero duration completes immediately.
pub fn progress(start_ms: f64, duration_ms: f64, now_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    ((now_ms - start_ms) / duration_ms).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn exponential_in_out_hits_endpoints_and_midpoint() {
        let easing = Easing::ExponentialInOut;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(1.0), 1.0);
        assert_abs_diff_eq!(easing.apply(0.5), 0.5, epsilon = 1e-6);
        assert!(easing.apply(0.1) < 0.01);
        assert!(easing.apply(0.9) > 0.99);
    }

    #[test]
    fn exponential_in_out_is_monotonic() {
        let easing = Easing::ExponentialInOut;
        let mut previous = 0.0;
        for step in 1..=100 {
            let value = easing.apply(step as f32 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress(1000.0, 2000.0, 500.0), 0.0);
        assert_abs_diff_eq!(progress(1000.0, 2000.0, 2000.0), 0.5);
        assert_eq!(progress(1000.0, 2000.0, 9000.0), 1.0);
        assert_eq!(progress(1000.0, 0.0, 1000.0), 1.0);
    }
}
