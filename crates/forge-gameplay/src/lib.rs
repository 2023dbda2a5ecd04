//! # Forge Gameplay
//!
//! Gameplay layer for Project Forge.
//!
//! This crate provides the entity side of the system:
//! - Entity records (monsters, NPCs) and the instance wrapper
//! - The built-in prefab catalogue
//! - The entity factory with its registration policy

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod entity;
pub mod factory;
pub mod prefab;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::entity::*;
    pub use crate::factory::*;
    pub use crate::prefab::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use forge_common::EventHub;

    #[test]
    fn test_factory_builds_every_catalogue_prefab() {
        let factory =
            EntityFactory::with_builtin_prefabs(RegistrationPolicy::Strict, EventHub::new());

        for prefab in Prefab::ALL {
            let entity = factory.create(prefab.tag()).expect("catalogue prefab");
            assert_eq!(entity, prefab.build());
        }
    }

    #[test]
    fn test_entity_json_shape() {
        let json = serde_json::to_value(Prefab::Spider.build()).expect("serialize");
        assert_eq!(json["prefab"], "spider");
        assert_eq!(json["name"], "Spider");
        assert_eq!(json["max_health"], 100);
        assert_eq!(json["damage"], 20);
        assert_eq!(json["kind"], "Monster");
    }
}
