//! Error types for Project Forge.
//!
//! Every variant is recoverable. The factory and the dispatcher report these
//! as diagnostics and hand back an empty result; nothing here is fatal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::PrefabTag;

/// Conditions raised while creating entities or dispatching commands.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ForgeError {
    /// A prefab tag was requested that has no constructor registered
    #[error("No entity registered for: {0}")]
    NotRegistered(PrefabTag),

    /// A request named a command with no bound handler
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Parameters were missing, mistyped or out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A request interceptor refused the request before dispatch
    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl ForgeError {
    /// Shorthand for building an [`ForgeError::InvalidArgument`].
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    /// Short stable name of the condition, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotRegistered(_) => "not_registered",
            Self::UnknownCommand(_) => "unknown_command",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Result type alias for Forge operations.
pub type ForgeResult<T> = Result<T, ForgeError>;
