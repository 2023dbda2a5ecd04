//! Command identifiers accepted by the dispatcher.

use std::fmt;
use std::str::FromStr;

use forge_common::ForgeError;
use serde::{Deserialize, Serialize};

/// Every command a request may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    /// Build any registered prefab
    CreateEntity,
    /// Build a prefab that must be a monster
    CreateMonster,
    /// Build a prefab that must be an NPC
    CreateNpc,
    /// Build a prefab several times
    BulkCreate,
    /// Build a prefab and wrap it in a live instance
    SpawnInstance,
    /// List registered prefab tags
    ListPrefabs,
}

/// Wire name to command table. Matching is exact and case-sensitive.
const COMMANDS: [(&str, Command); 6] = [
    ("createEntity", Command::CreateEntity),
    ("createMonster", Command::CreateMonster),
    ("createNpc", Command::CreateNpc),
    ("bulkCreate", Command::BulkCreate),
    ("spawnInstance", Command::SpawnInstance),
    ("listPrefabs", Command::ListPrefabs),
];

impl Command {
    /// Every command, in table order.
    pub const ALL: [Self; 6] = [
        Self::CreateEntity,
        Self::CreateMonster,
        Self::CreateNpc,
        Self::BulkCreate,
        Self::SpawnInstance,
        Self::ListPrefabs,
    ];

    /// Looks up a command by its wire name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|(wire, _)| *wire == name)
            .map(|(_, command)| *command)
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateEntity => "createEntity",
            Self::CreateMonster => "createMonster",
            Self::CreateNpc => "createNpc",
            Self::BulkCreate => "bulkCreate",
            Self::SpawnInstance => "spawnInstance",
            Self::ListPrefabs => "listPrefabs",
        }
    }

    /// Returns the parameter syntax.
    #[must_use]
    pub const fn usage(self) -> &'static str {
        match self {
            Self::CreateEntity => "createEntity <prefab:string>",
            Self::CreateMonster => "createMonster <prefab:string>",
            Self::CreateNpc => "createNpc <prefab:string>",
            Self::BulkCreate => "bulkCreate <prefab:string> <count:int>",
            Self::SpawnInstance => "spawnInstance <prefab:string>",
            Self::ListPrefabs => "listPrefabs",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| ForgeError::UnknownCommand(s.to_string()))
    }
}
