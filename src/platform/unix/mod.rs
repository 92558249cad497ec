//! Unix-specific platform implementations

mod shell;
mod signals;

pub use shell::UnixShell;
pub use signals::UnixSignals;
