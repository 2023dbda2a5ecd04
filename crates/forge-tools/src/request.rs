//! Request and response shapes.

use std::fmt;

use forge_common::{ForgeError, ForgeResult, PrefabTag};
use forge_gameplay::{Entity, EntityInstance};
use serde::{Deserialize, Serialize};

use crate::command::Command;

/// A positional request parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Str(String),
}

impl Param {
    /// Returns the string value, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the integer value.
    ///
    /// Floats with no fractional part count as integers.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Float(value)
                if value.is_finite()
                    && value.trunc() == *value
                    && (i64::MIN as f64..i64::MAX as f64).contains(value) =>
            {
                Some(*value as i64)
            },
            _ => None,
        }
    }

    /// Name of the value's type, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A command name plus positional parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Command wire name
    pub command: String,
    /// Positional parameters
    #[serde(default)]
    pub params: Vec<Param>,
}

impl Request {
    /// Creates a request with no parameters.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Renders the request as compact JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!("{{\"command\":{:?}}}", self.command))
    }
}

impl From<Command> for Request {
    fn from(command: Command) -> Self {
        Self::new(command.name())
    }
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Response {
    /// One entity
    Entity(Entity),
    /// Entities in creation order
    Entities(Vec<Entity>),
    /// One live instance
    Instance(EntityInstance),
    /// Registered prefab tags
    Prefabs(Vec<PrefabTag>),
}

impl Response {
    /// Returns the entity of an `Entity` response.
    #[must_use]
    pub const fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// Consumes the response, returning its entity.
    #[must_use]
    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Self::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// Returns the entities of an `Entities` response.
    #[must_use]
    pub fn as_entities(&self) -> Option<&[Entity]> {
        match self {
            Self::Entities(entities) => Some(entities.as_slice()),
            _ => None,
        }
    }

    /// Returns the instance of an `Instance` response.
    #[must_use]
    pub const fn as_instance(&self) -> Option<&EntityInstance> {
        match self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(entity) => write!(f, "{entity}"),
            Self::Entities(entities) => {
                write!(f, "{} entities", entities.len())?;
                for entity in entities {
                    write!(f, "\n{entity}")?;
                }
                Ok(())
            },
            Self::Instance(instance) => write!(f, "{instance}"),
            Self::Prefabs(tags) => {
                let tags: Vec<&str> = tags.iter().map(PrefabTag::as_str).collect();
                write!(f, "prefabs: {}", tags.join(", "))
            },
        }
    }
}

/// Reads a string parameter.
pub fn expect_str(params: &[Param], index: usize, command: Command) -> ForgeResult<&str> {
    match params.get(index) {
        Some(param) => param.as_str().ok_or_else(|| {
            ForgeError::invalid(format!(
                "parameter {} must be a string, got {}; usage: {}",
                index + 1,
                param.type_name(),
                command.usage()
            ))
        }),
        None => Err(missing(index, command)),
    }
}

/// Reads an integer parameter.
pub fn expect_int(params: &[Param], index: usize, command: Command) -> ForgeResult<i64> {
    match params.get(index) {
        Some(param) => param.as_int().ok_or_else(|| {
            ForgeError::invalid(format!(
                "parameter {} must be an integer, got {param}; usage: {}",
                index + 1,
                command.usage()
            ))
        }),
        None => Err(missing(index, command)),
    }
}

fn missing(index: usize, command: Command) -> ForgeError {
    ForgeError::invalid(format!(
        "missing parameter {}; usage: {}",
        index + 1,
        command.usage()
    ))
}
