//! Windows-specific platform implementations

mod shell;
mod signals;

pub use shell::WindowsShell;
pub use signals::WindowsSignals;
