//! Type-keyed event dispatcher.
//!
//! Routes one event to zero or more handlers registered for its kind
//! and concatenates the events they emit. The dispatcher holds no
//! business logic and no ordering responsibility beyond registration
//! order — all causal ordering is the scheduler's job.

use std::collections::BTreeMap;

use tape_events::{Event, EventKind};

/// Fatal failure surfaced by a handler.
///
/// Subsystem error enums (ledger, risk) stay typed and downcastable;
/// the kernel itself only needs to carry them to the run loop.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What a handler returns: follow-up events, or a fatal error that
/// terminates the run.
pub type HandlerResult = Result<Vec<Event>, HandlerError>;

/// A consumer of one event kind. Handlers that produce nothing return
/// an empty vec; rejections and other expected business outcomes are
/// data, not errors.
pub trait EventHandler {
    fn on_event(&mut self, event: &Event) -> HandlerResult;
}

impl<F> EventHandler for F
where
    F: FnMut(&Event) -> HandlerResult,
{
    fn on_event(&mut self, event: &Event) -> HandlerResult {
        self(event)
    }
}

/// Kind-keyed fan-out registry.
pub struct Dispatcher {
    handlers: BTreeMap<EventKind, Vec<Box<dyn EventHandler>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Append a handler to `kind`'s list. Multiple handlers per kind are
    /// allowed and all are invoked, in registration order.
    pub fn register(&mut self, kind: EventKind, handler: Box<dyn EventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map(|v| v.len()).unwrap_or(0)
    }

    /// Invoke every handler registered for the event's kind and return
    /// the concatenation of their emitted events.
    ///
    /// An unregistered kind dispatches to zero handlers and returns an
    /// empty vec — that is not an error.
    pub fn dispatch(&mut self, event: &Event) -> HandlerResult {
        let Some(handlers) = self.handlers.get_mut(&event.kind()) else {
            return Ok(Vec::new());
        };

        let mut emitted = Vec::new();
        for handler in handlers.iter_mut() {
            emitted.extend(handler.on_event(event)?);
        }
        Ok(emitted)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
