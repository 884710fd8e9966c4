//! Simulation Clock & Stepper.

use log::debug;

use crate::world::PhysicsWorld;

/// Host timestamps seen so far, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationClock {
    first_ms: Option<f64>,
    last_ms: Option<f64>,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous recorded timestamp; `None` before the
    /// first one.
    pub fn delta_seconds(&self, now_ms: f64) -> Option<f32> {
        self.last_ms.map(|last| ((now_ms - last) / 1000.0) as f32)
    }

    /// Stores `now_ms` as the previous timestamp for the next call.
    pub fn record(&mut self, now_ms: f64) {
        if self.first_ms.is_none() {
            self.first_ms = Some(now_ms);
        }
        self.last_ms = Some(now_ms);
    }

    pub fn last_ms(&self) -> Option<f64> {
        self.last_ms
    }

    /// Time between the first and the latest recorded timestamps.
    pub fn elapsed_ms(&self) -> f64 {
        match (self.first_ms, self.last_ms) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

/// Fixed sub-step policy applied to every frame delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stepper {
    pub time_step: f32,
    pub max_sub_steps: u32,
}

impl Stepper {
    pub fn new(time_step: f32, max_sub_steps: u32) -> Self {
        Self {
            time_step,
            max_sub_steps,
        }
    }

    /// Advances `world` by `dt` seconds; returns the sub-steps taken.
    /// A negative delta (timestamps going backwards) is skipped.
    pub fn advance(&self, world: &mut PhysicsWorld, dt: f32) -> u32 {
        if dt < 0.0 {
            debug!("Skipping step for negative delta {dt}s");
            return 0;
        }
        world.step(self.time_step, dt, self.max_sub_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_timestamp_has_no_delta() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.delta_seconds(500.0), None);

        clock.record(500.0);
        assert_eq!(clock.delta_seconds(750.0), Some(0.25));
        clock.record(750.0);
        assert_eq!(clock.elapsed_ms(), 250.0);
    }

    #[test]
    fn negative_delta_is_skipped() {
        let mut world = PhysicsWorld::default();
        assert_eq!(Stepper::new(1.0 / 60.0, 3).advance(&mut world, -1.0), 0);
        assert_eq!(world.time_accumulated(), 0.0);
    }
}
