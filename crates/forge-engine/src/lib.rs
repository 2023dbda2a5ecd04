//! # Forge Engine
//!
//! Demo driver support for Project Forge: the config file and the request
//! script the `forge` binary runs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod demo;

pub use config::{ConfigError, DemoConfig, CONFIG_FILE, DEFAULT_LOG_FILTER};
pub use demo::{default_script, run_script};
