//! Front controller: the single entry point for requests.
//!
//! Owns the entity factory and the dispatcher, wires the catalogue prefabs
//! and built-in handlers at construction, and runs interceptors in front of
//! every dispatch.

use std::fmt;
use std::sync::Arc;

use forge_common::{EventHub, ForgeEvent, ForgeResult};
use forge_gameplay::{EntityFactory, RegistrationPolicy};

use crate::dispatcher::Dispatcher;
use crate::handler::register_builtin_handlers;
use crate::request::{Request, Response};

/// Pre-dispatch hook. Returning an error rejects the request.
pub trait Interceptor: Send + Sync {
    /// Inspects a request before it reaches the dispatcher.
    fn before_dispatch(&self, request: &Request) -> ForgeResult<()>;
}

impl<F> Interceptor for F
where
    F: Fn(&Request) -> ForgeResult<()> + Send + Sync,
{
    fn before_dispatch(&self, request: &Request) -> ForgeResult<()> {
        self(request)
    }
}

/// Entry point that receives requests and hands them to the dispatcher.
pub struct FrontController {
    factory: Arc<EntityFactory>,
    dispatcher: Dispatcher,
    interceptors: Vec<Arc<dyn Interceptor>>,
    events: EventHub,
}

impl FrontController {
    /// Creates a controller with the catalogue prefabs and every built-in
    /// command registered.
    #[must_use]
    pub fn new(policy: RegistrationPolicy, events: EventHub) -> Self {
        let factory = Arc::new(EntityFactory::with_builtin_prefabs(policy, events.clone()));
        let dispatcher = Dispatcher::new(events.clone());
        register_builtin_handlers(&dispatcher, &factory);

        Self {
            factory,
            dispatcher,
            interceptors: Vec::new(),
            events,
        }
    }

    /// Strict policy, logging through `tracing`.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(RegistrationPolicy::Strict, EventHub::with_tracing())
    }

    /// Returns the shared factory.
    #[must_use]
    pub fn factory(&self) -> &Arc<EntityFactory> {
        &self.factory
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Adds an interceptor. Interceptors run in insertion order.
    pub fn add_interceptor(&mut self, interceptor: impl Interceptor + 'static) {
        self.interceptors.push(Arc::new(interceptor));
    }

    /// Logs the request, runs the interceptors, then dispatches.
    ///
    /// A rejected request is reported once and yields `None`.
    pub fn dispatch_request(&self, request: &Request) -> Option<Response> {
        self.events.emit(&ForgeEvent::RequestReceived {
            payload: request.to_json(),
        });

        for interceptor in &self.interceptors {
            if let Err(error) = interceptor.before_dispatch(request) {
                self.events.report(error);
                return None;
            }
        }

        self.dispatcher.dispatch(request)
    }
}

impl Default for FrontController {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for FrontController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrontController")
            .field("factory", &self.factory)
            .field("dispatcher", &self.dispatcher)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_common::{EventBus, ForgeError, PrefabTag};
    use forge_gameplay::Entity;

    fn controller_with_bus(policy: RegistrationPolicy) -> (FrontController, Arc<EventBus>) {
        let bus = Arc::new(EventBus::default());
        let controller = FrontController::new(policy, EventHub::new().with_handler(bus.clone()));
        (controller, bus)
    }

    #[test]
    fn test_construction_registers_catalogue() {
        let (controller, bus) = controller_with_bus(RegistrationPolicy::Strict);

        let registered: Vec<ForgeEvent> = bus.drain();
        assert_eq!(
            registered,
            vec![
                ForgeEvent::PrefabRegistered {
                    tag: PrefabTag::new("spider")
                },
                ForgeEvent::PrefabRegistered {
                    tag: PrefabTag::new("spider_warrior")
                },
                ForgeEvent::PrefabRegistered {
                    tag: PrefabTag::new("npc_villager")
                },
            ]
        );
        assert_eq!(controller.factory().len(), 3);
    }

    #[test]
    fn test_request_is_logged_before_dispatch() {
        let (controller, bus) = controller_with_bus(RegistrationPolicy::Strict);
        bus.drain();

        let request = Request::new("createEntity").with_param("spider");
        let spider = controller
            .dispatch_request(&request)
            .and_then(Response::into_entity)
            .expect("spider is registered");
        assert_eq!(spider.name(), "Spider");

        assert_eq!(
            bus.drain(),
            vec![
                ForgeEvent::RequestReceived {
                    payload: r#"{"command":"createEntity","params":["spider"]}"#.to_string()
                },
                ForgeEvent::EntityInstantiated {
                    tag: PrefabTag::new("spider")
                },
            ]
        );
    }

    #[test]
    fn test_unknown_command_logs_one_diagnostic() {
        let (controller, bus) = controller_with_bus(RegistrationPolicy::Strict);
        bus.drain();

        assert!(controller.dispatch_request(&Request::new("bogus")).is_none());
        assert_eq!(
            bus.drain_diagnostics(),
            vec![ForgeError::UnknownCommand("bogus".to_string())]
        );
    }

    #[test]
    fn test_interceptor_rejects() {
        let (mut controller, bus) = controller_with_bus(RegistrationPolicy::Strict);
        controller.add_interceptor(|request: &Request| -> ForgeResult<()> {
            if request.command == "bulkCreate" {
                Err(ForgeError::Rejected("bulk creation disabled".to_string()))
            } else {
                Ok(())
            }
        });
        bus.drain();

        let bulk = Request::new("bulkCreate").with_param("spider").with_param(2);
        assert!(controller.dispatch_request(&bulk).is_none());
        assert_eq!(
            bus.drain_diagnostics(),
            vec![ForgeError::Rejected("bulk creation disabled".to_string())]
        );

        let single = Request::new("createEntity").with_param("spider");
        assert!(controller.dispatch_request(&single).is_some());
    }

    #[test]
    fn test_runtime_registration_is_visible() {
        let (controller, _bus) = controller_with_bus(RegistrationPolicy::Strict);
        controller
            .factory()
            .register("goblin", || Entity::monster("goblin", "Goblin", 30, 5));

        let request = Request::new("createMonster").with_param("goblin");
        let goblin = controller
            .dispatch_request(&request)
            .and_then(Response::into_entity)
            .expect("goblin registered at runtime");
        assert_eq!(goblin.damage(), 5);
    }

    #[test]
    fn test_auto_register_policy_passes_through() {
        let (controller, _bus) = controller_with_bus(RegistrationPolicy::AutoRegister);
        assert_eq!(
            controller.factory().policy(),
            RegistrationPolicy::AutoRegister
        );
    }
}
