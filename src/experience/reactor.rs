//! Collision Reactor: game rules applied to actuator contacts.

use log::debug;

use super::registry::BodyRole;

/// What an actuator contact should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Begin the experience: detach and fade the starter.
    Start,
    /// Pull the struck letter toward the anchor at this index.
    Strike { spring_target: usize },
    Ignore,
}

/// Holds the one-way "started" latch and the start guard.
#[derive(Debug, Clone)]
pub struct CollisionReactor {
    has_started: bool,
    start_guard_ms: f64,
}

impl CollisionReactor {
    pub fn new(start_guard_ms: f64) -> Self {
        Self {
            has_started: false,
            start_guard_ms,
        }
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    /// Flips the latch; returns `false` if it was already set.
    pub fn mark_started(&mut self) -> bool {
        !std::mem::replace(&mut self.has_started, true)
    }

    /// Decides what a contact between an actuator and `other` means.
    ///
    /// `elapsed_ms` is the simulation time since the first update. Only
    /// actuators that react to contacts are considered.
    pub fn react(&self, actuator: &BodyRole, other: &BodyRole, elapsed_ms: f64) -> Reaction {
        if !matches!(
            actuator,
            BodyRole::Actuator {
                reacts_to_contact: true,
                ..
            }
        ) {
            return Reaction::Ignore;
        }

        match other {
            BodyRole::Starter if !self.has_started => {
                if elapsed_ms >= self.start_guard_ms {
                    Reaction::Start
                } else {
                    debug!("Starter touched after {elapsed_ms:.0} ms, before the start guard");
                    Reaction::Ignore
                }
            }
            BodyRole::Letter {
                spring_target: Some(index),
                ..
            } if self.has_started && !other.is_springing() => Reaction::Strike {
                spring_target: *index,
            },
            _ => Reaction::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experience::registry::{ActuatorId, Tether};

    const HAND: BodyRole = BodyRole::Actuator {
        actuator: ActuatorId(0),
        reacts_to_contact: true,
    };

    fn letter(tether: Tether) -> BodyRole {
        BodyRole::Letter {
            spring_target: Some(3),
            tether,
        }
    }

    #[test]
    fn starter_respects_the_guard() {
        let reactor = CollisionReactor::new(1000.0);
        assert_eq!(reactor.react(&HAND, &BodyRole::Starter, 500.0), Reaction::Ignore);
        assert_eq!(reactor.react(&HAND, &BodyRole::Starter, 1000.0), Reaction::Start);
    }

    #[test]
    fn letters_need_a_started_session() {
        let mut reactor = CollisionReactor::new(1000.0);
        assert_eq!(reactor.react(&HAND, &letter(Tether::Free), 2000.0), Reaction::Ignore);

        assert!(reactor.mark_started());
        assert!(!reactor.mark_started());
        assert_eq!(
            reactor.react(&HAND, &letter(Tether::Free), 2000.0),
            Reaction::Strike { spring_target: 3 }
        );
        assert_eq!(reactor.react(&HAND, &BodyRole::Starter, 2000.0), Reaction::Ignore);
    }

    #[test]
    fn springing_letters_and_passive_actuators_are_ignored() {
        let mut reactor = CollisionReactor::new(0.0);
        reactor.mark_started();

        let springing = letter(Tether::Springing {
            awaiting_righting: false,
        });
        assert_eq!(reactor.react(&HAND, &springing, 0.0), Reaction::Ignore);

        let sphere_hand = BodyRole::Actuator {
            actuator: ActuatorId(1),
            reacts_to_contact: false,
        };
        assert_eq!(reactor.react(&sphere_hand, &letter(Tether::Free), 0.0), Reaction::Ignore);
        assert_eq!(reactor.react(&HAND, &BodyRole::Decoration, 0.0), Reaction::Ignore);
    }
}
