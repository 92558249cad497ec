//! Observable output sources
//!
//! Both the shell orchestrator and the per-process adapter expose the same
//! observable contract ([`Wrapper`]) and the orchestrator additionally
//! observes its children ([`WrapperListener`]). Shared buffering and
//! debounced notification live in [`WrapperCore`], which either type embeds.
//!
//! Listeners are held as `Weak` back-references: registering a listener
//! never keeps it alive.

pub mod alert;
pub mod buffer;
pub mod shared;

pub use self::alert::AlertDispatcher;
pub use self::buffer::{split_lines, LineBuffer};
pub use self::shared::WrapperCore;

use crate::models::{ConsoleLine, LineKind};
use std::fmt;
use std::sync::{Mutex, MutexGuard, Weak};
use uuid::Uuid;

/// Stable identity of a wrapper instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WrapperId(Uuid);

impl WrapperId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WrapperId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WrapperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable side of a shell or child process
pub trait Wrapper: Send + Sync {
    /// Identity used by observers to tell sources apart
    fn id(&self) -> WrapperId;

    /// Register an observer; held weakly
    fn add_listener(&self, listener: Weak<dyn WrapperListener>);

    /// Atomically copy and clear all completed lines
    fn drain_text(&self) -> Vec<ConsoleLine>;

    /// Atomically copy all completed lines without clearing them
    fn peek_text(&self) -> Vec<ConsoleLine>;

    /// Unterminated output received since the last line break
    fn current_fragment(&self) -> String;

    /// Send a full line of input
    fn send_line(&self, text: &str, kind: LineKind);

    /// Send a single character; `flush` forces an immediate write
    fn send_character(&self, ch: char, flush: bool);

    /// Send raw text; `flush` forces an immediate write
    fn send(&self, text: &str, flush: bool);
}

/// Observer side: callbacks fired by a [`Wrapper`]
pub trait WrapperListener: Send + Sync {
    /// New output is available; pull it with `drain_text`/`peek_text`
    fn on_text_ready(&self, source: &dyn Wrapper);

    /// The source has finished and will produce no further lines
    fn on_finished(&self, source: &dyn Wrapper);
}

/// Lock a mutex, recovering the data if a panicking holder poisoned it
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Recovering poisoned lock");
        poisoned.into_inner()
    })
}
