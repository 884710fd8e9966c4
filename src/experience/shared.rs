use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::{
    input::PlayerAction,
    manager::{FrameReport, PhysicsManager},
};

/// Handle sharing one [`PhysicsManager`] between threads.
///
/// Every call holds the lock for its whole duration, so a frame update and
/// an input callback never interleave.
#[derive(Clone)]
pub struct SharedPhysicsManager {
    inner: Arc<Mutex<PhysicsManager>>,
}

impl SharedPhysicsManager {
    pub fn new(manager: PhysicsManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, PhysicsManager> {
        self.inner.lock()
    }

    /// Runs `f` with exclusive access to the manager.
    pub fn with<R>(&self, f: impl FnOnce(&mut PhysicsManager) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn update(&self, timestamp_ms: f64) -> FrameReport {
        self.inner.lock().update(timestamp_ms)
    }

    pub fn handle_action(&self, action: PlayerAction) {
        self.inner.lock().handle_action(action);
    }

    pub fn handle_key(&self, key_code: u32) -> bool {
        self.inner.lock().handle_key(key_code)
    }
}
