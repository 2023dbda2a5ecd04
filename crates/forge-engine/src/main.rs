//! # Forge Engine
//!
//! Demo driver for Project Forge.
//!
//! Builds a front controller, runs a fixed request script against it and
//! prints each result. The first argument, if any, is the config file path.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use forge_common::EventHub;
use forge_engine::{demo, DemoConfig, CONFIG_FILE};
use forge_tools::FrontController;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

fn log_filter(config: &DemoConfig) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(config.log_directive())
}

/// Main entry point.
fn main() -> Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);

    // Logging comes up on the default filter so config problems are visible,
    // then switches to the configured directive.
    let (filter, filter_handle) = reload::Layer::new(log_filter(&DemoConfig::default()));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    info!("Project Forge starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = DemoConfig::load_from(&config_path);
    if let Err(e) = filter_handle.reload(log_filter(&config)) {
        warn!("Failed to apply log filter: {e}");
    }

    let controller = FrontController::new(config.registration_policy, EventHub::with_tracing());
    let script = if config.requests.is_empty() {
        demo::default_script()
    } else {
        config.requests.clone()
    };

    let results = demo::run_script(
        &controller,
        &script,
        config.show_details,
        &mut io::stdout(),
    )?;
    let served = results.iter().filter(|result| result.is_some()).count();

    info!("Served {served}/{} requests", results.len());
    Ok(())
}
