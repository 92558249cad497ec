//! Core data models for shellwrap
//!
//! Classified output lines and child process metadata.

pub mod console_line;
pub mod process_info;

// Re-exports for convenience
pub use console_line::{ConsoleLine, LineKind};
pub use process_info::{ProcessInfo, ProcessState};
