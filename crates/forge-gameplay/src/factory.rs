//! Entity factory keyed by prefab tag.
//!
//! The registration table sits behind a single lock so constructors can be
//! re-registered while other threads are creating entities. Constructors are
//! cloned out of the table before they run; the lock is never held across a
//! constructor call.

use std::fmt;

use ahash::AHashMap;
use forge_common::{EventHub, ForgeError, ForgeEvent, ForgeResult, PrefabTag};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{Entity, EntityInstance};
use crate::prefab::{Constructor, Prefab};

/// Largest count [`EntityFactory::bulk_create`] accepts.
pub const MAX_BULK_COUNT: usize = 10_000;

/// What to do when a tag without a registration is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationPolicy {
    /// Fail with `NotRegistered`
    #[default]
    Strict,
    /// Register the built-in constructor on demand when the tag names a
    /// catalogue prefab, otherwise fail with `NotRegistered`
    AutoRegister,
}

/// Builds entities from registered constructors.
pub struct EntityFactory {
    /// Prefab tag -> constructor
    constructors: RwLock<AHashMap<PrefabTag, Constructor>>,
    /// Unregistered-tag behaviour
    policy: RegistrationPolicy,
    /// Event sink
    events: EventHub,
}

impl EntityFactory {
    /// Creates an empty factory.
    #[must_use]
    pub fn new(policy: RegistrationPolicy, events: EventHub) -> Self {
        Self {
            constructors: RwLock::new(AHashMap::new()),
            policy,
            events,
        }
    }

    /// Creates a factory with every catalogue prefab registered.
    #[must_use]
    pub fn with_builtin_prefabs(policy: RegistrationPolicy, events: EventHub) -> Self {
        let factory = Self::new(policy, events);
        for prefab in Prefab::ALL {
            factory.register_prefab(prefab);
        }
        factory
    }

    /// Returns the registration policy.
    #[must_use]
    pub const fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    /// Stores a constructor under `tag`, replacing any previous one.
    pub fn register<F>(&self, tag: impl Into<PrefabTag>, constructor: F)
    where
        F: Fn() -> Entity + Send + Sync + 'static,
    {
        self.register_constructor(tag.into(), std::sync::Arc::new(constructor));
    }

    /// Registers a catalogue prefab's default constructor under its tag.
    pub fn register_prefab(&self, prefab: Prefab) {
        self.register_constructor(PrefabTag::new(prefab.tag()), prefab.constructor());
    }

    fn register_constructor(&self, tag: PrefabTag, constructor: Constructor) {
        let replaced = self
            .constructors
            .write()
            .insert(tag.clone(), constructor)
            .is_some();
        if replaced {
            debug!("Replaced constructor for {tag}");
        }
        self.events.emit(&ForgeEvent::PrefabRegistered { tag });
    }

    /// Builds a new entity, returning the failure instead of reporting it.
    pub fn try_create(&self, tag: &str) -> ForgeResult<Entity> {
        let constructor = self.constructor_for(tag)?;
        self.events.emit(&ForgeEvent::EntityInstantiated {
            tag: PrefabTag::new(tag),
        });
        Ok(constructor())
    }

    /// Builds a new entity.
    ///
    /// Unknown tags are reported as a diagnostic and yield `None`.
    pub fn create(&self, tag: &str) -> Option<Entity> {
        match self.try_create(tag) {
            Ok(entity) => Some(entity),
            Err(error) => {
                self.events.report(error);
                None
            },
        }
    }

    /// Builds a new entity wrapped in an [`EntityInstance`], returning the
    /// failure instead of reporting it.
    pub fn try_spawn(&self, tag: &str) -> ForgeResult<EntityInstance> {
        self.try_create(tag).map(EntityInstance::new)
    }

    /// Builds a new entity and wraps it in an [`EntityInstance`].
    ///
    /// Unknown tags are reported as a diagnostic and yield `None`.
    pub fn spawn(&self, tag: &str) -> Option<EntityInstance> {
        match self.try_spawn(tag) {
            Ok(instance) => Some(instance),
            Err(error) => {
                self.events.report(error);
                None
            },
        }
    }

    /// Calls [`EntityFactory::create`] exactly `count` times, in order.
    ///
    /// A count that is negative or above [`MAX_BULK_COUNT`] fails with
    /// `InvalidArgument` before anything is built.
    pub fn bulk_create(&self, tag: &str, count: i64) -> ForgeResult<Vec<Option<Entity>>> {
        let count = usize::try_from(count)
            .ok()
            .filter(|count| *count <= MAX_BULK_COUNT)
            .ok_or_else(|| {
                ForgeError::invalid(format!(
                    "bulk count must be between 0 and {MAX_BULK_COUNT}, got {count}"
                ))
            })?;
        Ok((0..count).map(|_| self.create(tag)).collect())
    }

    /// Returns true if a constructor is registered under `tag`.
    #[must_use]
    pub fn is_registered(&self, tag: &str) -> bool {
        self.constructors.read().contains_key(tag)
    }

    /// Returns every registered tag, sorted.
    #[must_use]
    pub fn registered_tags(&self) -> Vec<PrefabTag> {
        let mut tags: Vec<PrefabTag> = self.constructors.read().keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Returns the number of registered prefabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.read().len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.read().is_empty()
    }

    fn constructor_for(&self, tag: &str) -> ForgeResult<Constructor> {
        if let Some(constructor) = self.constructors.read().get(tag) {
            return Ok(constructor.clone());
        }

        let prefab = match (self.policy, Prefab::from_tag(tag)) {
            (RegistrationPolicy::AutoRegister, Some(prefab)) => prefab,
            _ => return Err(ForgeError::NotRegistered(PrefabTag::new(tag))),
        };

        // Another thread may have registered the tag since the read lock was released.
        let mut constructors = self.constructors.write();
        let mut inserted = false;
        let constructor = constructors
            .entry(PrefabTag::new(tag))
            .or_insert_with(|| {
                inserted = true;
                prefab.constructor()
            })
            .clone();
        drop(constructors);

        if inserted {
            self.events.emit(&ForgeEvent::PrefabAutoRegistered {
                tag: PrefabTag::new(tag),
            });
        }
        Ok(constructor)
    }
}

impl Default for EntityFactory {
    fn default() -> Self {
        Self::new(RegistrationPolicy::default(), EventHub::with_tracing())
    }
}

impl fmt::Debug for EntityFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityFactory")
            .field("prefabs", &self.registered_tags())
            .field("policy", &self.policy)
            .field("events", &self.events)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use forge_common::EventBus;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn factory_with_bus(policy: RegistrationPolicy) -> (EntityFactory, Arc<EventBus>) {
        let bus = Arc::new(EventBus::default());
        let events = EventHub::new().with_handler(bus.clone());
        (EntityFactory::with_builtin_prefabs(policy, events), bus)
    }

    #[test]
    fn test_create_registered_prefab() {
        let (factory, _bus) = factory_with_bus(RegistrationPolicy::Strict);

        let spider = factory.create("spider").expect("spider is registered");
        assert_eq!(spider.name(), "Spider");
        assert_eq!(spider.max_health(), 100);
        assert_eq!(spider.damage(), 20);

        let villager = factory.create("npc_villager").expect("villager is registered");
        assert_eq!(villager.kind(), EntityKind::Npc);
        assert_eq!(villager.max_health(), 100);
        assert_eq!(villager.damage(), 0);
    }

    #[test]
    fn test_create_returns_equal_values() {
        let (factory, _bus) = factory_with_bus(RegistrationPolicy::Strict);

        let first = factory.create("spider_warrior").expect("registered");
        let second = factory.create("spider_warrior").expect("registered");

        assert_eq!(first, second);
    }

    #[test]
    fn test_spawn_gives_distinct_instances() {
        let (factory, _bus) = factory_with_bus(RegistrationPolicy::Strict);

        let first = factory.spawn("spider").expect("registered");
        let second = factory.spawn("spider").expect("registered");

        assert_ne!(first.id(), second.id());
        assert_eq!(first.source(), second.source());
        assert_eq!(first.health().current(), 100);
    }

    #[test]
    fn test_create_unknown_tag_is_soft() {
        let (factory, bus) = factory_with_bus(RegistrationPolicy::Strict);
        bus.drain();

        assert!(factory.create("unknown_tag").is_none());
        assert_eq!(
            bus.drain_diagnostics(),
            vec![ForgeError::NotRegistered(PrefabTag::new("unknown_tag"))]
        );
    }

    #[test]
    fn test_try_create_does_not_report() {
        let (factory, bus) = factory_with_bus(RegistrationPolicy::Strict);
        bus.drain();

        let result = factory.try_create("unknown_tag");
        assert_eq!(
            result,
            Err(ForgeError::NotRegistered(PrefabTag::new("unknown_tag")))
        );
        assert!(bus.drain_diagnostics().is_empty());
    }

    #[test]
    fn test_register_emits_event() {
        let bus = Arc::new(EventBus::default());
        let factory = EntityFactory::new(
            RegistrationPolicy::Strict,
            EventHub::new().with_handler(bus.clone()),
        );

        factory.register("goblin", || Entity::monster("goblin", "Goblin", 30, 5));

        assert_eq!(
            bus.drain(),
            vec![ForgeEvent::PrefabRegistered {
                tag: PrefabTag::new("goblin")
            }]
        );
        assert!(factory.is_registered("goblin"));
        assert_eq!(factory.len(), 1);
    }

    #[test]
    fn test_reregister_replaces_constructor() {
        let (factory, _bus) = factory_with_bus(RegistrationPolicy::Strict);

        factory.register("spider", || Entity::monster("spider", "Giant Spider", 500, 90));

        let spider = factory.create("spider").expect("registered");
        assert_eq!(spider.name(), "Giant Spider");
        assert_eq!(spider.max_health(), 500);
        assert_eq!(factory.len(), 3);
    }

    #[test]
    fn test_strict_policy_does_not_auto_register() {
        let bus = Arc::new(EventBus::default());
        let factory = EntityFactory::new(
            RegistrationPolicy::Strict,
            EventHub::new().with_handler(bus.clone()),
        );

        assert!(factory.create("spider").is_none());
        assert!(factory.is_empty());
    }

    #[test]
    fn test_auto_register_on_demand() {
        let bus = Arc::new(EventBus::default());
        let factory = EntityFactory::new(
            RegistrationPolicy::AutoRegister,
            EventHub::new().with_handler(bus.clone()),
        );

        let spider = factory.create("spider").expect("auto-registered");
        assert_eq!(spider.name(), "Spider");
        assert!(factory.is_registered("spider"));

        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                ForgeEvent::PrefabAutoRegistered {
                    tag: PrefabTag::new("spider")
                },
                ForgeEvent::EntityInstantiated {
                    tag: PrefabTag::new("spider")
                },
            ]
        );

        // Second call uses the stored constructor.
        factory.create("spider").expect("registered");
        assert!(!bus
            .drain()
            .iter()
            .any(|e| matches!(e, ForgeEvent::PrefabAutoRegistered { .. })));
    }

    #[test]
    fn test_auto_register_unknown_tag_still_fails() {
        let (factory, bus) = factory_with_bus(RegistrationPolicy::AutoRegister);
        bus.drain();

        assert!(factory.create("dragon").is_none());
        assert_eq!(
            bus.drain_diagnostics(),
            vec![ForgeError::NotRegistered(PrefabTag::new("dragon"))]
        );
    }

    #[test]
    fn test_bulk_create_zero() {
        let (factory, _bus) = factory_with_bus(RegistrationPolicy::Strict);
        assert_eq!(factory.bulk_create("spider", 0), Ok(Vec::new()));
    }

    #[test]
    fn test_bulk_create_negative_count() {
        let (factory, _bus) = factory_with_bus(RegistrationPolicy::Strict);
        let result = factory.bulk_create("spider", -1);
        assert!(matches!(result, Err(ForgeError::InvalidArgument(_))));
    }

    #[test]
    fn test_bulk_create_count_above_limit() {
        let (factory, bus) = factory_with_bus(RegistrationPolicy::Strict);
        bus.drain();

        for count in [MAX_BULK_COUNT as i64 + 1, i64::MAX] {
            let result = factory.bulk_create("spider", count);
            assert!(matches!(result, Err(ForgeError::InvalidArgument(_))));
        }
        assert!(!bus
            .drain()
            .iter()
            .any(|e| matches!(e, ForgeEvent::EntityInstantiated { .. })));

        let results = factory
            .bulk_create("spider", MAX_BULK_COUNT as i64)
            .expect("limit is inclusive");
        assert_eq!(results.len(), MAX_BULK_COUNT);
    }

    #[test]
    fn test_try_spawn_unknown_tag() {
        let (factory, bus) = factory_with_bus(RegistrationPolicy::Strict);
        bus.drain();

        let err = factory.try_spawn("dragon").expect_err("unregistered");
        assert_eq!(err, ForgeError::NotRegistered(PrefabTag::new("dragon")));
        assert!(bus.drain_diagnostics().is_empty());

        assert!(factory.spawn("dragon").is_none());
        assert_eq!(
            bus.drain_diagnostics(),
            vec![ForgeError::NotRegistered(PrefabTag::new("dragon"))]
        );
    }

    #[test]
    fn test_bulk_create_unregistered_keeps_slots() {
        let (factory, bus) = factory_with_bus(RegistrationPolicy::Strict);
        bus.drain();

        let results = factory.bulk_create("dragon", 3).expect("count is valid");
        assert_eq!(results, vec![None, None, None]);
        assert_eq!(bus.drain_diagnostics().len(), 3);
    }

    #[test]
    fn test_registered_tags_sorted() {
        let (factory, _bus) = factory_with_bus(RegistrationPolicy::Strict);
        let tags: Vec<String> = factory
            .registered_tags()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(tags, vec!["npc_villager", "spider", "spider_warrior"]);
    }

    #[test]
    fn test_concurrent_register_and_create() {
        let (factory, _bus) = factory_with_bus(RegistrationPolicy::Strict);
        let factory = Arc::new(factory);

        let writer = {
            let factory = Arc::clone(&factory);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    factory.register("spider", || Entity::monster("spider", "Spider", 100, 20));
                }
            })
        };

        for _ in 0..100 {
            let spider = factory.create("spider").expect("always registered");
            assert_eq!(spider.damage(), 20);
        }
        writer.join().expect("writer thread");
    }

    proptest! {
        #[test]
        fn prop_bulk_create_length_matches_count(count in 0i64..64) {
            let factory = EntityFactory::with_builtin_prefabs(
                RegistrationPolicy::Strict,
                EventHub::new(),
            );
            let results = factory.bulk_create("spider", count).expect("non-negative");
            prop_assert_eq!(results.len() as i64, count);
            for entity in results {
                let entity = entity.expect("spider is registered");
                prop_assert_eq!(entity.max_health(), 100);
                prop_assert_eq!(entity.damage(), 20);
            }
        }

        #[test]
        fn prop_bulk_create_rejects_negative(count in i64::MIN..0) {
            let factory = EntityFactory::with_builtin_prefabs(
                RegistrationPolicy::Strict,
                EventHub::new(),
            );
            prop_assert!(factory.bulk_create("spider", count).is_err());
        }

        #[test]
        fn prop_bulk_create_rejects_oversized(count in (MAX_BULK_COUNT as i64 + 1)..=i64::MAX) {
            let factory = EntityFactory::with_builtin_prefabs(
                RegistrationPolicy::Strict,
                EventHub::new(),
            );
            prop_assert!(factory.bulk_create("spider", count).is_err());
        }
    }
}
