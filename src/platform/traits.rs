//! Platform-specific operation traits
//!
//! These traits define the interface for platform-specific operations,
//! allowing for clean abstraction and easier testing.

use crate::error::Result;
use std::path::PathBuf;

/// Platform-specific signal operations for child process groups
pub trait SignalOps: Send + Sync {
    /// Ask a process group to terminate (graceful shutdown)
    fn terminate_group(&self, pgid: u32) -> Result<()>;

    /// Forcefully kill a process group
    fn kill_group(&self, pgid: u32) -> Result<()>;

    /// Check if a process is still running
    fn is_process_running(&self, pid: u32) -> bool;
}

/// Platform-specific command interpreter operations
pub trait ShellOps: Send + Sync {
    /// Interpreter used to run external command lines
    fn default_interpreter(&self) -> PathBuf;

    /// Flag that makes the interpreter execute a single command line
    fn command_flag(&self) -> &'static str;
}
