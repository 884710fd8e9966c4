//! Utility helpers: profiling/logging guards and animation easing.

pub mod logging;
pub mod tween;

pub use logging::{warn_if_frame_budget_exceeded, FrameBudget, ScopedTimer};
pub use tween::Easing;
