//! Command handlers.

use std::sync::Arc;

use forge_common::{ForgeError, ForgeResult};
use forge_gameplay::{EntityFactory, EntityKind};

use crate::command::Command;
use crate::dispatcher::Dispatcher;
use crate::request::{expect_int, expect_str, Param, Response};

/// Logic bound to a command.
pub trait Handler: Send + Sync {
    /// Runs the command with the request's positional parameters.
    fn execute(&self, params: &[Param]) -> ForgeResult<Response>;
}

impl<F> Handler for F
where
    F: Fn(&[Param]) -> ForgeResult<Response> + Send + Sync,
{
    fn execute(&self, params: &[Param]) -> ForgeResult<Response> {
        self(params)
    }
}

/// `createEntity <prefab>`
#[derive(Debug, Clone)]
pub struct CreateEntityHandler {
    factory: Arc<EntityFactory>,
}

impl CreateEntityHandler {
    /// Creates a handler backed by `factory`.
    #[must_use]
    pub fn new(factory: Arc<EntityFactory>) -> Self {
        Self { factory }
    }
}

impl Handler for CreateEntityHandler {
    fn execute(&self, params: &[Param]) -> ForgeResult<Response> {
        let tag = expect_str(params, 0, Command::CreateEntity)?;
        self.factory.try_create(tag).map(Response::Entity)
    }
}

/// `createMonster <prefab>` and `createNpc <prefab>`.
///
/// The prefab must build an entity of the expected kind.
#[derive(Debug, Clone)]
pub struct CreateKindHandler {
    factory: Arc<EntityFactory>,
    kind: EntityKind,
    command: Command,
}

impl CreateKindHandler {
    /// Handler for `createMonster`.
    #[must_use]
    pub fn monster(factory: Arc<EntityFactory>) -> Self {
        Self {
            factory,
            kind: EntityKind::Monster,
            command: Command::CreateMonster,
        }
    }

    /// Handler for `createNpc`.
    #[must_use]
    pub fn npc(factory: Arc<EntityFactory>) -> Self {
        Self {
            factory,
            kind: EntityKind::Npc,
            command: Command::CreateNpc,
        }
    }

    /// The kind this handler accepts.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }
}

impl Handler for CreateKindHandler {
    fn execute(&self, params: &[Param]) -> ForgeResult<Response> {
        let tag = expect_str(params, 0, self.command)?;
        let entity = self.factory.try_create(tag)?;
        if entity.kind() != self.kind {
            return Err(ForgeError::invalid(format!(
                "{tag} is a {}, {} expects a {}",
                entity.kind(),
                self.command,
                self.kind
            )));
        }
        Ok(Response::Entity(entity))
    }
}

/// `bulkCreate <prefab> <count>`
///
/// Slots the factory could not fill were already reported by the factory and
/// are left out of the response.
#[derive(Debug, Clone)]
pub struct BulkCreateHandler {
    factory: Arc<EntityFactory>,
}

impl BulkCreateHandler {
    /// Creates a handler backed by `factory`.
    #[must_use]
    pub fn new(factory: Arc<EntityFactory>) -> Self {
        Self { factory }
    }
}

impl Handler for BulkCreateHandler {
    fn execute(&self, params: &[Param]) -> ForgeResult<Response> {
        let tag = expect_str(params, 0, Command::BulkCreate)?;
        let count = expect_int(params, 1, Command::BulkCreate)?;
        let entities = self.factory.bulk_create(tag, count)?;
        Ok(Response::Entities(entities.into_iter().flatten().collect()))
    }
}

/// `spawnInstance <prefab>`
#[derive(Debug, Clone)]
pub struct SpawnInstanceHandler {
    factory: Arc<EntityFactory>,
}

impl SpawnInstanceHandler {
    /// Creates a handler backed by `factory`.
    #[must_use]
    pub fn new(factory: Arc<EntityFactory>) -> Self {
        Self { factory }
    }
}

impl Handler for SpawnInstanceHandler {
    fn execute(&self, params: &[Param]) -> ForgeResult<Response> {
        let tag = expect_str(params, 0, Command::SpawnInstance)?;
        self.factory.try_spawn(tag).map(Response::Instance)
    }
}

/// `listPrefabs`
#[derive(Debug, Clone)]
pub struct ListPrefabsHandler {
    factory: Arc<EntityFactory>,
}

impl ListPrefabsHandler {
    /// Creates a handler backed by `factory`.
    #[must_use]
    pub fn new(factory: Arc<EntityFactory>) -> Self {
        Self { factory }
    }
}

impl Handler for ListPrefabsHandler {
    fn execute(&self, _params: &[Param]) -> ForgeResult<Response> {
        Ok(Response::Prefabs(self.factory.registered_tags()))
    }
}

/// Binds every built-in command to its handler.
pub fn register_builtin_handlers(dispatcher: &Dispatcher, factory: &Arc<EntityFactory>) {
    dispatcher.register_handler(
        Command::CreateEntity,
        CreateEntityHandler::new(Arc::clone(factory)),
    );
    dispatcher.register_handler(
        Command::CreateMonster,
        CreateKindHandler::monster(Arc::clone(factory)),
    );
    dispatcher.register_handler(Command::CreateNpc, CreateKindHandler::npc(Arc::clone(factory)));
    dispatcher.register_handler(
        Command::BulkCreate,
        BulkCreateHandler::new(Arc::clone(factory)),
    );
    dispatcher.register_handler(
        Command::SpawnInstance,
        SpawnInstanceHandler::new(Arc::clone(factory)),
    );
    dispatcher.register_handler(
        Command::ListPrefabs,
        ListPrefabsHandler::new(Arc::clone(factory)),
    );
}
