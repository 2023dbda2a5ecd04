//! Demo configuration.
//!
//! Loaded from a TOML file. Every field has a default, so a partial file or no
//! file at all is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use forge_gameplay::RegistrationPolicy;
use forge_tools::Request;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::filter::{Directive, LevelFilter};

/// Configuration file name.
pub const CONFIG_FILE: &str = "forge.toml";

/// Default log directive.
pub const DEFAULT_LOG_FILTER: &str = "forge=info";

/// Errors while reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("config I/O error at {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML for this config
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The config could not be rendered as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Demo driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// What the factory does with unregistered tags
    pub registration_policy: RegistrationPolicy,
    /// Single `tracing` filter directive, added on top of `RUST_LOG`
    pub log_filter: String,
    /// Print the details block of each result
    pub show_details: bool,
    /// Requests to run; empty runs the built-in script
    pub requests: Vec<Request>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            registration_policy: RegistrationPolicy::Strict,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            show_details: true,
            requests: Vec::new(),
        }
    }
}

impl DemoConfig {
    /// Reads the config at `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&contents)?;
        config.validate();
        Ok(Some(config))
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load_from(path) {
            Ok(Some(config)) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Ok(None) => {
                info!("Config file not found, using defaults");
                Self::default()
            },
            Err(e) => {
                warn!("{e}; using defaults");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(io_error)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Replace values that would leave the driver unusable.
    pub fn validate(&mut self) {
        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        } else if let Err(e) = self.log_filter.trim().parse::<Directive>() {
            warn!(
                "Invalid log_filter {:?} ({e}), using {DEFAULT_LOG_FILTER}",
                self.log_filter
            );
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }
    }

    /// Returns `log_filter` as a directive, falling back to the default.
    #[must_use]
    pub fn log_directive(&self) -> Directive {
        self.log_filter
            .trim()
            .parse()
            .or_else(|_| DEFAULT_LOG_FILTER.parse())
            .unwrap_or_else(|_| LevelFilter::INFO.into())
    }
}
