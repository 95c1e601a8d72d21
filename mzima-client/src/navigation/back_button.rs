//! Priority-ordered back-button subscriptions with press de-duplication.

use std::fmt;
use tracing::{debug, trace};

/// A hardware back-button press reported by the host platform.
///
/// `sequence` increases with every physical press; re-delivering the same
/// press carries the same sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackButtonEvent {
    /// Press counter assigned by the host.
    pub sequence: u64,
}

/// Handle returned by [`BackButtonDispatcher::subscribe_with_priority`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// What became of a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Exactly one handler ran.
    Handled(HandlerId),
    /// The event was already dispatched once.
    Duplicate,
    /// No handler is subscribed.
    Unhandled,
}

type Handler = Box<dyn FnMut(&BackButtonEvent)>;

struct Registration {
    id: HandlerId,
    priority: i32,
    handler: Handler,
}

/// Priority-ordered back-button subscriptions.
///
/// Each event goes to a single handler: the one with the highest priority,
/// the most recent registration among equals. Events whose sequence number
/// is not newer than the last dispatched one are dropped, so one physical
/// press is never handled twice.
#[derive(Default)]
pub struct BackButtonDispatcher {
    registrations: Vec<Registration>,
    next_id: u64,
    last_sequence: Option<u64>,
}

impl fmt::Debug for BackButtonDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackButtonDispatcher")
            .field("handlers", &self.registrations.len())
            .field("last_sequence", &self.last_sequence)
            .finish()
    }
}

impl BackButtonDispatcher {
    /// Creates a dispatcher with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler`; higher `priority` runs first.
    pub fn subscribe_with_priority(
        &mut self,
        priority: i32,
        handler: impl FnMut(&BackButtonEvent) + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            priority,
            handler: Box::new(handler),
        });
        debug!(priority, handler = id.0, "back button handler registered");
        id
    }

    /// Removes a handler. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|registration| registration.id != id);
        before != self.registrations.len()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.registrations.len()
    }

    /// Delivers `event` to the winning handler.
    pub fn dispatch(&mut self, event: BackButtonEvent) -> Dispatch {
        if self
            .last_sequence
            .is_some_and(|last| event.sequence <= last)
        {
            trace!(sequence = event.sequence, "dropping repeated back button event");
            return Dispatch::Duplicate;
        }
        self.last_sequence = Some(event.sequence);

        // max_by_key returns the last maximum, i.e. the newest registration
        let Some(registration) = self
            .registrations
            .iter_mut()
            .max_by_key(|registration| registration.priority)
        else {
            return Dispatch::Unhandled;
        };
        (registration.handler)(&event);
        Dispatch::Handled(registration.id)
    }
}
