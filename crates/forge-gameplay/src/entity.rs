//! Entity records and the runtime instance wrapper.

use std::fmt;

use forge_common::{ForgeError, InstanceId, PrefabTag};
use serde::{Deserialize, Serialize};

/// Maximum health every NPC is built with.
pub const NPC_MAX_HEALTH: u32 = 100;

/// Damage every NPC is built with.
pub const NPC_DAMAGE: u32 = 0;

/// Kind of entity a prefab produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Hostile creature with arbitrary stats
    Monster,
    /// Non-player character with fixed stats
    Npc,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monster => f.write_str("monster"),
            Self::Npc => f.write_str("npc"),
        }
    }
}

/// An entity template built by a prefab constructor.
///
/// Immutable once built. Mutable state lives in [`EntityInstance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntityRecord")]
pub struct Entity {
    /// Prefab tag the entity was built from
    prefab: PrefabTag,
    /// Monster or NPC
    kind: EntityKind,
    /// Display name
    name: String,
    /// Maximum health
    max_health: u32,
    /// Damage dealt per hit
    damage: u32,
}

impl Entity {
    /// Creates a monster with the given stats.
    #[must_use]
    pub fn monster(
        prefab: impl Into<PrefabTag>,
        name: impl Into<String>,
        max_health: u32,
        damage: u32,
    ) -> Self {
        Self {
            prefab: prefab.into(),
            kind: EntityKind::Monster,
            name: name.into(),
            max_health,
            damage,
        }
    }

    /// Creates an NPC. Health and damage are fixed.
    #[must_use]
    pub fn npc(prefab: impl Into<PrefabTag>, name: impl Into<String>) -> Self {
        Self {
            prefab: prefab.into(),
            kind: EntityKind::Npc,
            name: name.into(),
            max_health: NPC_MAX_HEALTH,
            damage: NPC_DAMAGE,
        }
    }

    /// Returns the prefab tag.
    #[must_use]
    pub fn prefab(&self) -> &PrefabTag {
        &self.prefab
    }

    /// Returns the entity kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns maximum health.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Returns damage.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Renders the information block shown by the demo driver.
    #[must_use]
    pub fn details(&self) -> String {
        self.to_string()
    }
}

/// Wire form of [`Entity`], checked before it becomes one.
#[derive(Deserialize)]
struct EntityRecord {
    prefab: PrefabTag,
    kind: EntityKind,
    name: String,
    max_health: u32,
    damage: u32,
}

impl TryFrom<EntityRecord> for Entity {
    type Error = ForgeError;

    fn try_from(record: EntityRecord) -> Result<Self, Self::Error> {
        match record.kind {
            EntityKind::Monster => Ok(Self::monster(
                record.prefab,
                record.name,
                record.max_health,
                record.damage,
            )),
            EntityKind::Npc
                if record.max_health == NPC_MAX_HEALTH && record.damage == NPC_DAMAGE =>
            {
                Ok(Self::npc(record.prefab, record.name))
            },
            EntityKind::Npc => Err(ForgeError::invalid(format!(
                "npc {} must have {NPC_MAX_HEALTH} health and {NPC_DAMAGE} damage, got {}/{}",
                record.prefab, record.max_health, record.damage
            ))),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} information:\n  name: {}\n  maxhealth: {}\n  damage: {}",
            self.prefab, self.name, self.max_health, self.damage
        )
    }
}

/// Health component for instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Current health
    current: u32,
    /// Maximum health
    max: u32,
}

impl Health {
    /// Creates a new health component at full health.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Returns current health.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Returns maximum health.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Applies damage.
    pub fn damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Applies healing.
    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// Checks if dead.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current == 0
    }
}

/// A live copy of an entity with its own health pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityInstance {
    /// Unique identifier
    id: InstanceId,
    /// Template the instance was built from
    source: Entity,
    /// Current health, starts at the template's maximum
    health: Health,
}

impl EntityInstance {
    /// Wraps a freshly built entity.
    #[must_use]
    pub fn new(source: Entity) -> Self {
        let health = Health::new(source.max_health());
        Self {
            id: InstanceId::new(),
            source,
            health,
        }
    }

    /// Returns the instance ID.
    #[must_use]
    pub const fn id(&self) -> InstanceId {
        self.id
    }

    /// Returns the template entity.
    #[must_use]
    pub const fn source(&self) -> &Entity {
        &self.source
    }

    /// Returns the health component.
    #[must_use]
    pub const fn health(&self) -> &Health {
        &self.health
    }

    /// Returns the mutable health component.
    pub fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

impl fmt::Display for EntityInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n  instance: {}\n  health: {}/{}",
            self.source,
            self.id,
            self.health.current(),
            self.health.max()
        )
    }
}
