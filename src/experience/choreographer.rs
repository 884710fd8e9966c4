//! Spring Choreographer: letter springs, the starter tether and the
//! assembled-message latch.

use std::fmt;

use glam::Vec3;
use log::debug;

use super::message::MessageAnchor;
use crate::{
    config::SpringSettings,
    core::{BodyHandle, RigidBody},
    dynamics::Spring,
    error::{ExperienceError, Result},
    world::PhysicsWorld,
};

/// Identity of an active spring, unique for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpringId(pub u64);

impl fmt::Display for SpringId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "spring#{}", self.0)
    }
}

/// Spring pulling a struck letter to its message anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveSpring {
    pub id: SpringId,
    pub anchor_index: usize,
    pub body: BodyHandle,
    pub spring: Spring,
    /// Linear damping of the body before it was tethered.
    pub free_linear_damping: f32,
}

/// Tether holding the starter in front of the player until the session starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarterSpring {
    pub body: BodyHandle,
    pub anchor: Vec3,
    pub spring: Spring,
}

/// Result of a release action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Release {
    /// The message was complete when it was released.
    pub unlocked: bool,
    pub springs: Vec<ActiveSpring>,
}

#[derive(Debug)]
pub struct SpringChoreographer {
    settings: SpringSettings,
    anchors: Option<Vec<MessageAnchor>>,
    springs: Vec<ActiveSpring>,
    starter: Option<StarterSpring>,
    letters_total: usize,
    next_id: u64,
}

impl SpringChoreographer {
    pub fn new(settings: SpringSettings) -> Self {
        Self {
            settings,
            anchors: None,
            springs: Vec::new(),
            starter: None,
            letters_total: 0,
            next_id: 0,
        }
    }

    /// Installs the message anchors. They can only be set once; the letter
    /// total follows the anchor count until overridden.
    pub fn set_anchors(&mut self, anchors: Vec<MessageAnchor>) -> Result<()> {
        if self.anchors.is_some() {
            return Err(ExperienceError::MessageAlreadySet);
        }
        self.letters_total = anchors.len();
        self.anchors = Some(anchors);
        Ok(())
    }

    pub fn anchors(&self) -> &[MessageAnchor] {
        self.anchors.as_deref().unwrap_or_default()
    }

    pub fn anchor(&self, index: usize) -> Option<&MessageAnchor> {
        self.anchors().get(index)
    }

    pub fn set_letters_total(&mut self, total: usize) {
        self.letters_total = total;
    }

    pub fn letters_total(&self) -> usize {
        self.letters_total
    }

    pub fn active_springs(&self) -> &[ActiveSpring] {
        &self.springs
    }

    pub fn springed_count(&self) -> usize {
        self.springs.len()
    }

    /// At least as many springs as letters. Extra springs can exist because
    /// a letter may be pulled in by "show all" without being struck.
    pub fn is_message_complete(&self) -> bool {
        self.springs.len() >= self.letters_total
    }

    pub fn spring_for_body(&self, body: BodyHandle) -> Option<&ActiveSpring> {
        self.springs.iter().find(|active| active.body == body)
    }

    /// Creates the spring between anchor `anchor_index` and `body`, with a
    /// rest length equal to their current separation. Returns `None` for an
    /// unknown anchor.
    pub fn attach(&mut self, anchor_index: usize, body: &RigidBody) -> Option<ActiveSpring> {
        let anchor = self.anchor(anchor_index)?.position;
        let rest_length = anchor.distance(body.position());

        let active = ActiveSpring {
            id: SpringId(self.next_id),
            anchor_index,
            body: body.handle,
            spring: Spring::new(
                self.settings.local_anchor,
                rest_length,
                self.settings.stiffness,
                self.settings.damping,
            ),
            free_linear_damping: body.linear_damping,
        };
        self.next_id += 1;
        self.springs.push(active);

        debug!(
            "Attached {} to anchor {anchor_index} with {} (rest length {rest_length:.3})",
            body.handle, active.id
        );
        Some(active)
    }

    /// Updates the rest length of a live spring; `false` if it is gone.
    pub fn set_rest_length(&mut self, id: SpringId, rest_length: f32) -> bool {
        match self.springs.iter_mut().find(|active| active.id == id) {
            Some(active) => {
                active.spring.rest_length = rest_length;
                true
            }
            None => false,
        }
    }

    /// Drops every active spring. The message counts as unlocked when it was
    /// complete at that moment.
    pub fn release_all(&mut self) -> Release {
        let unlocked = self.is_message_complete();
        let springs = std::mem::take(&mut self.springs);
        debug!("Released {} springs (unlocked: {unlocked})", springs.len());
        Release { unlocked, springs }
    }

    /// Tethers the starter to the fixed starter anchor with rest length zero.
    pub fn tether_starter(&mut self, body: BodyHandle) {
        self.starter = Some(StarterSpring {
            body,
            anchor: self.settings.starter_anchor,
            spring: Spring::new(
                self.settings.local_anchor,
                0.0,
                self.settings.stiffness,
                self.settings.damping,
            ),
        });
    }

    pub fn starter(&self) -> Option<&StarterSpring> {
        self.starter.as_ref()
    }

    pub fn detach_starter(&mut self) -> Option<StarterSpring> {
        self.starter.take()
    }

    /// Accumulates spring forces for the next step. Letter springs only pull
    /// once the session has started.
    pub fn apply_forces(&self, world: &mut PhysicsWorld, started: bool) {
        if started {
            for active in &self.springs {
                let Some(anchor) = self.anchor(active.anchor_index) else {
                    continue;
                };
                if let Some(body) = world.body_mut(active.body) {
                    active.spring.apply(anchor.position, body);
                }
            }
        }

        if let Some(starter) = &self.starter {
            if let Some(body) = world.body_mut(starter.body) {
                starter.spring.apply(starter.anchor, body);
            }
        }
    }
}
