//! # Forge Common
//!
//! Common types and shared abstractions for Project Forge.
//!
//! This crate provides the foundational pieces used by every Forge crate:
//! - ID types (`InstanceId`, `PrefabTag`)
//! - The error taxonomy shared by the factory and the dispatcher
//! - Events and the handler seam that replaces direct console tracing
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod events;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::ids::*;
}

pub use prelude::*;
