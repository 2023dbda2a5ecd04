//! Command table and request dispatch.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use forge_common::{EventHub, ForgeError, ForgeResult};
use parking_lot::RwLock;
use tracing::debug;

use crate::command::Command;
use crate::handler::Handler;
use crate::request::{Request, Response};

/// Routes requests to the handler bound to their command.
pub struct Dispatcher {
    /// Command -> handler
    handlers: RwLock<AHashMap<Command, Arc<dyn Handler>>>,
    /// Event sink
    events: EventHub,
}

impl Dispatcher {
    /// Creates a dispatcher with no handlers bound.
    #[must_use]
    pub fn new(events: EventHub) -> Self {
        Self {
            handlers: RwLock::new(AHashMap::new()),
            events,
        }
    }

    /// Binds `handler` to `command`, replacing any previous binding.
    pub fn register_handler(&self, command: Command, handler: impl Handler + 'static) {
        if self
            .handlers
            .write()
            .insert(command, Arc::new(handler))
            .is_some()
        {
            debug!("Replaced handler for {command}");
        }
    }

    /// Returns true if `command` has a handler.
    #[must_use]
    pub fn has_handler(&self, command: Command) -> bool {
        self.handlers.read().contains_key(&command)
    }

    /// Returns every bound command, in table order.
    #[must_use]
    pub fn commands(&self) -> Vec<Command> {
        let handlers = self.handlers.read();
        Command::ALL
            .into_iter()
            .filter(|command| handlers.contains_key(command))
            .collect()
    }

    /// Runs the request, returning the failure instead of reporting it.
    pub fn try_dispatch(&self, request: &Request) -> ForgeResult<Response> {
        let command: Command = request.command.parse()?;
        let handler = self
            .handlers
            .read()
            .get(&command)
            .cloned()
            .ok_or_else(|| ForgeError::UnknownCommand(request.command.clone()))?;

        debug!(%command, params = request.params.len(), "Dispatching");
        handler.execute(&request.params)
    }

    /// Runs the request.
    ///
    /// Never fails: any error is reported once as a diagnostic and the
    /// result is `None`.
    pub fn dispatch(&self, request: &Request) -> Option<Response> {
        match self.try_dispatch(request) {
            Ok(response) => Some(response),
            Err(error) => {
                self.events.report(error);
                None
            },
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("commands", &self.commands())
            .field("events", &self.events)
            .finish()
    }
}
