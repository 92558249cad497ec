//! Process Info Model
//!
//! Lifecycle metadata for a wrapped child process: what was launched,
//! where, when it started and how it ended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Represents the state of a child process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProcessState {
    /// Process has been created but not started
    #[default]
    Created,
    /// Process is currently running
    Running,
    /// Process has terminated
    Terminated,
}

/// Metadata for one spawned child process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInfo {
    /// OS process identifier
    pub pid: Option<u32>,

    /// Current state of the process
    pub state: ProcessState,

    /// Program that was executed
    pub command: String,

    /// Arguments passed to the program
    pub args: Vec<String>,

    /// Working directory the process was started in
    pub working_directory: PathBuf,

    /// When the process was started
    pub start_time: Option<DateTime<Utc>>,

    /// When the process terminated (if applicable)
    pub end_time: Option<DateTime<Utc>>,

    /// Exit code; `None` while running or when killed by a signal
    pub exit_code: Option<i32>,
}

impl ProcessInfo {
    /// Create a new process record in the Created state
    pub fn new(command: String, args: Vec<String>, working_directory: PathBuf) -> Self {
        Self {
            pid: None,
            state: ProcessState::Created,
            command,
            args,
            working_directory,
            start_time: None,
            end_time: None,
            exit_code: None,
        }
    }

    /// Mark the process as started with the given PID
    pub fn mark_started(&mut self, pid: u32) {
        self.pid = Some(pid);
        self.state = ProcessState::Running;
        self.start_time = Some(Utc::now());
    }

    /// Mark the process as terminated
    pub fn mark_terminated(&mut self, exit_code: Option<i32>) {
        self.state = ProcessState::Terminated;
        self.end_time = Some(Utc::now());
        self.exit_code = exit_code;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Running)
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, ProcessState::Terminated)
    }

    /// Wall-clock runtime, if the process has both started and ended
    pub fn runtime(&self) -> Option<chrono::Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}
