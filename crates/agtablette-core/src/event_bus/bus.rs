//! The bus itself: a list of filtered handlers, called in subscription
//! order on the publishing thread.

use parking_lot::RwLock;

use super::events::{AppEvent, EventCategory};

/// Selects which events a handler receives.
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Box<dyn Fn(AppEvent) + Send + Sync>;

#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<Vec<(EventFilter, EventHandler)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every handler whose filter matches and returns
    /// how many received it. Publishing with nobody listening is not an
    /// error.
    pub fn publish(&self, event: AppEvent) -> usize {
        let handlers = self.handlers.read();
        let mut delivered = 0;
        for (filter, handler) in handlers.iter() {
            if filter.matches(&event) {
                handler(event.clone());
                delivered += 1;
            }
        }
        tracing::trace!("Published {} to {} handler(s)", event.description(), delivered);
        delivered
    }

    /// Registers a handler for the lifetime of the bus.
    ///
    /// Handlers run while the handler list is locked for reading, so they
    /// must not subscribe themselves.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F)
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        self.handlers.write().push((filter, Box::new(handler)));
        tracing::debug!("Event handler added");
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}
