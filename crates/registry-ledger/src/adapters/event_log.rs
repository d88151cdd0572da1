//! # In-Memory Event Log

use crate::events::RegistryEvent;
use crate::ports::outbound::EventSink;
use parking_lot::Mutex;
use tracing::trace;

/// Records every published event in order.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<RegistryEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of events published so far.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.lock().clone()
    }

    /// Most recent event.
    pub fn last(&self) -> Option<RegistryEvent> {
        self.events.lock().last().cloned()
    }

    /// Number of events published.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True when nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, event: RegistryEvent) {
        trace!(event = event.name(), "event published");
        self.events.lock().push(event);
    }
}
