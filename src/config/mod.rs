//! Configuration management for shellwrap
//!
//! Timings for the alert dispatcher and child process supervision, the
//! command interpreter used for external commands, and logging defaults.
//! Every section has defaults, so an empty or partial file is valid.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::platform::Platform;

/// Main configuration structure for shellwrap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Orchestrator configuration
    pub shell: ShellConfig,

    /// Child process configuration
    pub process: ProcessConfig,

    /// Notification debounce configuration
    pub alerts: AlertConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Orchestrator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Initial working directory; the launching directory when unset
    pub working_directory: Option<PathBuf>,

    /// Appended to the working directory to form the prompt
    pub prompt_suffix: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            working_directory: None,
            prompt_suffix: ">".to_string(),
        }
    }
}

/// Child process settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Command interpreter for external commands; platform default when unset
    pub interpreter: Option<PathBuf>,

    /// Flag that makes the interpreter run one command line (`-c`, `/C`)
    pub command_flag: Option<String>,

    /// Whether children inherit this process's environment
    pub inherit_env: bool,

    /// Extra environment variables for children
    pub environment: HashMap<String, String>,

    /// Read buffer size for stdout/stderr readers in bytes
    pub read_buffer_size: usize,

    /// How often the exit watcher polls the child
    pub exit_poll_interval_ms: u64,

    /// How long to wait for readers to reach EOF after the child exits
    pub drain_timeout_ms: u64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            interpreter: None,
            command_flag: None,
            inherit_env: true,
            environment: HashMap::new(),
            read_buffer_size: 4096,
            exit_poll_interval_ms: 50,
            drain_timeout_ms: 500,
        }
    }
}

impl ProcessConfig {
    /// Interpreter path, falling back to the platform default
    pub fn interpreter(&self) -> PathBuf {
        self.interpreter
            .clone()
            .unwrap_or_else(|| Platform::shell().default_interpreter())
    }

    /// Command flag, falling back to the platform default
    pub fn command_flag(&self) -> String {
        self.command_flag
            .clone()
            .unwrap_or_else(|| Platform::shell().command_flag().to_string())
    }

    pub fn exit_poll_interval(&self) -> Duration {
        Duration::from_millis(self.exit_poll_interval_ms)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

/// Alert dispatcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Coalescing interval between listener notifications
    pub interval_ms: u64,

    /// Bounded wait for the dispatch loop to exit on teardown
    pub shutdown_timeout_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            // Output may arrive one character at a time
            interval_ms: 40,
            shutdown_timeout_ms: 100,
        }
    }
}

impl AlertConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration utilities
pub mod utils {
    use super::*;

    /// Get configuration file format from path
    pub fn get_config_format(path: &Path) -> Option<loader::ConfigFormat> {
        match path.extension()?.to_str()? {
            "toml" => Some(loader::ConfigFormat::Toml),
            "json" => Some(loader::ConfigFormat::Json),
            _ => None,
        }
    }

    /// Render the default configuration in the given format
    pub fn create_default_config_content(format: loader::ConfigFormat) -> crate::Result<String> {
        let config = Config::default();

        match format {
            loader::ConfigFormat::Toml => toml::to_string_pretty(&config).map_err(|e| {
                crate::Error::ConfigSerializationFailed {
                    format: "TOML".to_string(),
                    reason: e.to_string(),
                }
            }),
            loader::ConfigFormat::Json => serde_json::to_string_pretty(&config).map_err(|e| {
                crate::Error::ConfigSerializationFailed {
                    format: "JSON".to_string(),
                    reason: e.to_string(),
                }
            }),
        }
    }
}
