//! Built-in prefab catalogue.
//!
//! The catalogue is closed: every built-in prefab is a [`Prefab`] variant and
//! tag lookup goes through a static table instead of a hashed map.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Zero-argument constructor stored in the factory.
pub type Constructor = Arc<dyn Fn() -> Entity + Send + Sync>;

/// Built-in prefabs shipped with the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prefab {
    /// Basic spider monster
    Spider,
    /// Tougher spider monster
    SpiderWarrior,
    /// Village NPC
    NpcVillager,
}

/// Tag to prefab table.
const CATALOGUE: [(&str, Prefab); 3] = [
    ("spider", Prefab::Spider),
    ("spider_warrior", Prefab::SpiderWarrior),
    ("npc_villager", Prefab::NpcVillager),
];

impl Prefab {
    /// Every built-in prefab, in catalogue order.
    pub const ALL: [Self; 3] = [Self::Spider, Self::SpiderWarrior, Self::NpcVillager];

    /// Looks up a built-in prefab by exact tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        CATALOGUE
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, prefab)| *prefab)
    }

    /// Returns the prefab's tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Spider => "spider",
            Self::SpiderWarrior => "spider_warrior",
            Self::NpcVillager => "npc_villager",
        }
    }

    /// Builds a fresh entity from this prefab.
    #[must_use]
    pub fn build(self) -> Entity {
        match self {
            Self::Spider => Entity::monster(self.tag(), "Spider", 100, 20),
            Self::SpiderWarrior => Entity::monster(self.tag(), "Spider Warrior", 200, 40),
            Self::NpcVillager => Entity::npc(self.tag(), "Villager"),
        }
    }

    /// Returns the default constructor for this prefab.
    #[must_use]
    pub fn constructor(self) -> Constructor {
        Arc::new(move || self.build())
    }
}
