//! shellwrap - an observable command shell
//!
//! This library wraps an interactive command shell so its output can be
//! observed asynchronously by any number of consumers while commands are
//! still being typed.
//!
//! ## Module Organization
//!
//! - [`shell`] - The orchestrator ([`WrapperShell`]): built-ins, the working
//!   directory, and delegation to child processes
//! - [`process`] - One spawned child ([`ProcessWrapper`]) and its stdio threads
//! - [`wrapper`] - The observable/observer traits, line buffering and the
//!   debounced alert dispatcher
//! - [`events`] - Channel bridge for async consumers
//! - [`models`] - Classified lines and process metadata
//! - [`config`] - Configuration loading and defaults
//! - [`platform`] - Command interpreter and signal differences per OS
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use shellwrap::{ChannelListener, LineKind, Wrapper, WrapperEvent, WrapperListener};
//! use std::sync::{Arc, Weak};
//!
//! # async fn run() -> shellwrap::Result<()> {
//! let shell = shellwrap::init()?;
//! let (listener, mut events) = ChannelListener::new();
//! let weak: Weak<dyn WrapperListener> = Arc::downgrade(&listener) as Weak<dyn WrapperListener>;
//! shell.add_listener(weak);
//!
//! shell.send_line("echo hello", LineKind::Normal);
//! while let Some(event) = events.recv().await {
//!     if let WrapperEvent::TextReady(_) = event {
//!         for line in shell.drain_text() {
//!             println!("{}", line);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Threading
//!
//! Callers use the shell from one thread; nothing it exposes blocks.
//! Each child has reader threads for stdout and stderr, a writer thread for
//! stdin and an exit watcher. Each observable runs at most one alert loop,
//! started on demand and stopped once output goes quiet.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod platform;
pub mod process;
pub mod shell;
pub mod wrapper;

pub use config::loader::ConfigLoader;
pub use config::Config;
pub use error::{Error, Result};
pub use events::{ChannelListener, WrapperEvent};
pub use models::{ConsoleLine, LineKind, ProcessInfo, ProcessState};
pub use process::{ProcessSpec, ProcessWrapper};
pub use shell::WrapperShell;
pub use wrapper::{Wrapper, WrapperId, WrapperListener};

use std::path::Path;
use std::sync::Arc;

/// The current version of shellwrap from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The package name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Start a shell using configuration from the default locations.
///
/// A missing or unreadable configuration falls back to defaults.
pub fn init() -> Result<Arc<WrapperShell>> {
    info!("Initializing {} v{}", NAME, VERSION);

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load configuration: {}. Using defaults", e);
            Config::default()
        }
    };

    WrapperShell::new(config)
}

/// Start a shell using configuration from `config_path`
pub fn init_with_config(config_path: &Path) -> Result<Arc<WrapperShell>> {
    info!(
        "Initializing {} v{} with config: {}",
        NAME,
        VERSION,
        config_path.display()
    );

    if !config_path.exists() {
        return Err(Error::ConfigLoadFailed {
            path: config_path.to_path_buf(),
            reason: "Configuration file does not exist".to_string(),
        });
    }

    let config = ConfigLoader::new().load_from_path(config_path)?;
    WrapperShell::new(config)
}
