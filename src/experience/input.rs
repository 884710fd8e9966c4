//! Player actions and their mapping from raw input.

use serde::{Deserialize, Serialize};

use crate::config::KeyBindings;

/// Cursor or trigger signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorSignal {
    Pressed,
    Released,
    /// Release right away, without waiting for a press/release pair.
    ReleaseNow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Attract every free body toward the player.
    Primary,
    Cursor(CursorSignal),
    /// Pull every remaining letter into the message.
    Assemble,
}

/// Turns pressed/released signals into release edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorLatch {
    pressed: bool,
}

impl CursorLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Whether `signal` asks for the springs to be released.
    pub fn signal(&mut self, signal: CursorSignal) -> bool {
        match signal {
            CursorSignal::Pressed => {
                self.pressed = true;
                false
            }
            CursorSignal::Released => std::mem::replace(&mut self.pressed, false),
            CursorSignal::ReleaseNow => {
                self.pressed = false;
                true
            }
        }
    }
}

/// Action bound to a desktop key code.
pub fn action_for_key(bindings: &KeyBindings, key_code: u32) -> Option<PlayerAction> {
    if key_code == bindings.assemble {
        Some(PlayerAction::Assemble)
    } else if key_code == bindings.release {
        Some(PlayerAction::Cursor(CursorSignal::ReleaseNow))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_fires_on_the_falling_edge_only() {
        let mut latch = CursorLatch::new();
        assert!(!latch.signal(CursorSignal::Released));
        assert!(!latch.signal(CursorSignal::Pressed));
        assert!(latch.is_pressed());
        assert!(latch.signal(CursorSignal::Released));
        assert!(!latch.signal(CursorSignal::Released));
        assert!(latch.signal(CursorSignal::ReleaseNow));
    }

    #[test]
    fn default_keys() {
        let keys = KeyBindings::default();
        assert_eq!(action_for_key(&keys, 81), Some(PlayerAction::Assemble));
        assert_eq!(
            action_for_key(&keys, 32),
            Some(PlayerAction::Cursor(CursorSignal::ReleaseNow))
        );
        assert_eq!(action_for_key(&keys, 13), None);
    }
}
