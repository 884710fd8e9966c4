//! Keyed, cancellable time-bounded animations.
//!
//! Every task is keyed by the spring or body it animates. Scheduling a task
//! replaces any task with the same key, and a role change cancels the key
//! explicitly. Consumers still check the current state before applying a
//! frame, since the entity may have changed since scheduling.

use glam::Quat;

use super::choreographer::SpringId;
use crate::{
    core::BodyHandle,
    utils::tween::{self, Easing},
};

/// Identity a task is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKey {
    Spring(SpringId),
    Body(BodyHandle),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    /// Rest length of an active spring going from `from` to zero.
    ShrinkRestLength { spring: SpringId, from: f32 },
    /// Visual orientation of a tethered letter going from `from` to upright.
    Righting { body: BodyHandle, from: Quat },
    /// Opacity of the starter going from `from_opacity` to zero, after which
    /// the starter is hidden and put to sleep.
    StarterFade { body: BodyHandle, from_opacity: f32 },
}

impl Animation {
    pub fn key(&self) -> TaskKey {
        match self {
            Animation::ShrinkRestLength { spring, .. } => TaskKey::Spring(*spring),
            Animation::Righting { body, .. } | Animation::StarterFade { body, .. } => {
                TaskKey::Body(*body)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Task {
    animation: Animation,
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
}

/// One step of an animation: the eased progress to apply now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub animation: Animation,
    pub eased: f32,
    pub finished: bool,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(
        &mut self,
        animation: Animation,
        start_ms: f64,
        duration_ms: f64,
        easing: Easing,
    ) {
        self.cancel(animation.key());
        self.tasks.push(Task {
            animation,
            start_ms,
            duration_ms,
            easing,
        });
    }

    /// Drops the task attached to `key`; returns whether one was pending.
    pub fn cancel(&mut self, key: TaskKey) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.animation.key() != key);
        self.tasks.len() != before
    }

    pub fn is_scheduled(&self, key: TaskKey) -> bool {
        self.tasks.iter().any(|task| task.animation.key() == key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Frames of every pending task at `now_ms`, in scheduling order.
    /// Finished tasks are removed.
    pub fn advance(&mut self, now_ms: f64) -> Vec<AnimationFrame> {
        let frames: Vec<AnimationFrame> = self
            .tasks
            .iter()
            .map(|task| {
                let linear = tween::progress(task.start_ms, task.duration_ms, now_ms);
                AnimationFrame {
                    animation: task.animation,
                    eased: task.easing.apply(linear),
                    finished: linear >= 1.0,
                }
            })
            .collect();

        self.tasks.retain(|task| now_ms - task.start_ms < task.duration_ms);
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shrink(id: u64) -> Animation {
        Animation::ShrinkRestLength {
            spring: SpringId(id),
            from: 4.0,
        }
    }

    #[test]
    fn tasks_finish_after_their_duration() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(shrink(1), 0.0, 2000.0, Easing::Linear);

        let frames = scheduler.advance(1000.0);
        assert_eq!(frames.len(), 1);
        assert!((frames[0].eased - 0.5).abs() < 1e-6);
        assert!(!frames[0].finished);

        let frames = scheduler.advance(2500.0);
        assert!(frames[0].finished);
        assert_eq!(frames[0].eased, 1.0);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn rescheduling_replaces_and_cancel_removes() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(shrink(1), 0.0, 2000.0, Easing::Linear);
        scheduler.schedule(shrink(1), 500.0, 2000.0, Easing::Linear);
        scheduler.schedule(shrink(2), 0.0, 2000.0, Easing::Linear);
        assert_eq!(scheduler.len(), 2);

        assert!(scheduler.cancel(TaskKey::Spring(SpringId(1))));
        assert!(!scheduler.cancel(TaskKey::Spring(SpringId(1))));
        assert!(scheduler.is_scheduled(TaskKey::Spring(SpringId(2))));
    }
}
