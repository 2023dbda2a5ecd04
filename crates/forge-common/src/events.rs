//! Events emitted by the factory and the dispatcher.
//!
//! Core components never print. They emit [`ForgeEvent`]s to the handlers
//! subscribed on their [`EventHub`]; [`TracingHandler`] turns them into log
//! records and [`EventBus`] queues them for tests and tooling.

use std::fmt;
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ForgeError;
use crate::ids::PrefabTag;

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForgeEvent {
    /// A constructor was stored under a prefab tag
    PrefabRegistered {
        /// Prefab tag
        tag: PrefabTag,
    },
    /// A built-in constructor was registered on first use
    PrefabAutoRegistered {
        /// Prefab tag
        tag: PrefabTag,
    },
    /// A new entity was built from a registered constructor
    EntityInstantiated {
        /// Prefab tag
        tag: PrefabTag,
    },
    /// The front controller accepted a request
    RequestReceived {
        /// JSON rendering of the request
        payload: String,
    },
    /// A recovered failure
    Diagnostic {
        /// The condition that was recovered from
        error: ForgeError,
    },
}

impl ForgeEvent {
    /// Returns the error carried by a diagnostic event.
    #[must_use]
    pub const fn error(&self) -> Option<&ForgeError> {
        match self {
            Self::Diagnostic { error } => Some(error),
            _ => None,
        }
    }

    /// Returns true for diagnostic events.
    #[must_use]
    pub const fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Diagnostic { .. })
    }
}

/// Typed event handler trait.
pub trait EventHandler: Send + Sync {
    /// Handles an event.
    fn handle(&self, event: &ForgeEvent);
}

/// Event bus for collecting events.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<ForgeEvent>,
    /// Receiver for collecting events
    receiver: Receiver<ForgeEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: ForgeEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<ForgeEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Drains pending events and keeps only the diagnostics.
    pub fn drain_diagnostics(&self) -> Vec<ForgeError> {
        self.drain()
            .into_iter()
            .filter_map(|event| match event {
                ForgeEvent::Diagnostic { error } => Some(error),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl EventHandler for EventBus {
    fn handle(&self, event: &ForgeEvent) {
        self.publish(event.clone());
    }
}

/// Writes events as `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHandler;

impl EventHandler for TracingHandler {
    fn handle(&self, event: &ForgeEvent) {
        match event {
            ForgeEvent::PrefabRegistered { tag } => info!("New entity registered: {tag}"),
            ForgeEvent::PrefabAutoRegistered { tag } => {
                info!("Auto-registered built-in entity: {tag}");
            },
            ForgeEvent::EntityInstantiated { tag } => info!("Instantiating new entity: {tag}"),
            ForgeEvent::RequestReceived { payload } => info!("Received request: {payload}"),
            ForgeEvent::Diagnostic { error } => warn!(kind = error.kind(), "{error}"),
        }
    }
}

/// Fan-out of events to every subscribed handler.
#[derive(Clone, Default)]
pub struct EventHub {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventHub {
    /// Creates a hub with no subscribers. Events are discarded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Creates a hub that logs through [`TracingHandler`].
    #[must_use]
    pub fn with_tracing() -> Self {
        let mut hub = Self::new();
        hub.subscribe(Arc::new(TracingHandler));
        hub
    }

    /// Adds a handler. Handlers are invoked in subscription order.
    pub fn subscribe(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Builder form of [`EventHub::subscribe`].
    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.subscribe(handler);
        self
    }

    /// Sends an event to every handler.
    pub fn emit(&self, event: &ForgeEvent) {
        for handler in &self.handlers {
            handler.handle(event);
        }
    }

    /// Emits a diagnostic for a recovered error.
    pub fn report(&self, error: ForgeError) {
        self.emit(&ForgeEvent::Diagnostic { error });
    }

    /// Returns the number of subscribed handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
