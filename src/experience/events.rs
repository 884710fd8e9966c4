//! Event Gateway: typed notifications for the presentation layer.
//!
//! Events are queued while a frame runs and delivered by [`EventGateway::flush`]
//! once the frame's state is consistent.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::registry::{ActuatorId, VisualId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceEvent {
    /// The starter was hit: the session begins.
    Starts { actuator: ActuatorId },
    /// A letter was struck and is now pulled into the message.
    LetterHit { visual: VisualId, actuator: ActuatorId },
    /// At least as many springs as letters exist.
    MessageDone,
    /// The player released a complete message.
    MessageUnlocked,
}

impl ExperienceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ExperienceEvent::Starts { .. } => EventKind::Starts,
            ExperienceEvent::LetterHit { .. } => EventKind::LetterHit,
            ExperienceEvent::MessageDone => EventKind::MessageDone,
            ExperienceEvent::MessageUnlocked => EventKind::MessageUnlocked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Starts,
    LetterHit,
    MessageDone,
    MessageUnlocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&ExperienceEvent) + Send>;

struct Subscriber {
    id: SubscriptionId,
    kind: Option<EventKind>,
    callback: Callback,
}

#[derive(Default)]
pub struct EventGateway {
    pending: Vec<ExperienceEvent>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl fmt::Debug for EventGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventGateway")
            .field("pending", &self.pending)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls `callback` for every event of `kind`.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&ExperienceEvent) + Send + 'static,
    {
        self.add(Some(kind), Box::new(callback))
    }

    /// Calls `callback` for every event.
    pub fn subscribe_all<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ExperienceEvent) + Send + 'static,
    {
        self.add(None, Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|subscriber| subscriber.id != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: ExperienceEvent) {
        self.pending.push(event);
    }

    pub fn pending(&self) -> &[ExperienceEvent] {
        &self.pending
    }

    /// Delivers queued events in publication order and returns them.
    pub fn flush(&mut self) -> Vec<ExperienceEvent> {
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            let kind = event.kind();
            for subscriber in &mut self.subscribers {
                if subscriber.kind.is_none_or(|wanted| wanted == kind) {
                    (subscriber.callback)(event);
                }
            }
        }
        events
    }

    fn add(&mut self, kind: Option<EventKind>, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, kind, callback });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn subscribers_only_see_their_kind() {
        let done = Arc::new(AtomicUsize::new(0));
        let all = Arc::new(AtomicUsize::new(0));

        let mut gateway = EventGateway::new();
        let counter = Arc::clone(&done);
        gateway.subscribe(EventKind::MessageDone, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&all);
        gateway.subscribe_all(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        gateway.publish(ExperienceEvent::Starts {
            actuator: ActuatorId(0),
        });
        gateway.publish(ExperienceEvent::MessageDone);
        assert_eq!(done.load(Ordering::SeqCst), 0);

        let events = gateway.flush();
        assert_eq!(events.len(), 2);
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(all.load(Ordering::SeqCst), 2);
        assert!(gateway.flush().is_empty());
    }

    #[test]
    fn unsubscribed_callbacks_stay_silent() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut gateway = EventGateway::new();
        let counter = Arc::clone(&hits);
        let id = gateway.subscribe(EventKind::MessageUnlocked, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(gateway.unsubscribe(id));
        gateway.publish(ExperienceEvent::MessageUnlocked);
        gateway.flush();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
