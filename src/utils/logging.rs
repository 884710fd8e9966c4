use log::{log_enabled, trace, warn, Level};
use std::time::{Duration, Instant};

/// Trace-level timer around a hot section, reported when dropped.
pub struct ScopedTimer {
    label: &'static str,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            trace!("{} took {} µs", self.label, self.start.elapsed().as_micros());
        }
    }
}

/// Logs a warning when a frame took longer than `budget_ms`.
/// Returns whether the budget was exceeded.
pub fn warn_if_frame_budget_exceeded(duration: Duration, budget_ms: f32) -> bool {
    let elapsed_ms = duration.as_secs_f32() * 1000.0;
    if elapsed_ms <= budget_ms {
        return false;
    }
    warn!("Frame exceeded budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms");
    true
}

/// Per-session frame budget keeping count of overruns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBudget {
    budget_ms: f32,
    overruns: u64,
}

impl FrameBudget {
    pub fn new(budget_ms: f32) -> Self {
        Self {
            budget_ms,
            overruns: 0,
        }
    }

    pub fn record(&mut self, frame: Duration) -> bool {
        let exceeded = warn_if_frame_budget_exceeded(frame, self.budget_ms);
        if exceeded {
            self.overruns += 1;
        }
        exceeded
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_check_reports_overruns() {
        assert!(warn_if_frame_budget_exceeded(Duration::from_millis(20), 16.0));
        assert!(!warn_if_frame_budget_exceeded(Duration::from_millis(5), 16.0));
    }

    #[test]
    fn frame_budget_counts_overruns() {
        let mut budget = FrameBudget::new(16.0);
        budget.record(Duration::from_millis(4));
        budget.record(Duration::from_millis(40));
        budget.record(Duration::from_millis(17));
        assert_eq!(budget.overruns(), 2);
    }
}
