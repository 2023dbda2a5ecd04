//! # Forge Tools
//!
//! Request handling for Project Forge.
//!
//! This crate provides:
//! - The closed set of commands and their wire names
//! - Request parameters and responses
//! - Command handlers and the dispatcher
//! - The front controller that fronts every request

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod command;
pub mod controller;
pub mod dispatcher;
pub mod handler;
pub mod request;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::command::*;
    pub use crate::controller::*;
    pub use crate::dispatcher::*;
    pub use crate::handler::*;
    pub use crate::request::*;
}

pub use prelude::*;
