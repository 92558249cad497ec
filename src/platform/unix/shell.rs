//! Unix shell operations

use crate::platform::traits::ShellOps;
use std::path::PathBuf;

pub struct UnixShell;

impl UnixShell {
    pub fn new() -> Self {
        Self
    }
}

impl ShellOps for UnixShell {
    fn default_interpreter(&self) -> PathBuf {
        // POSIX sh rather than $SHELL: `-c` semantics must be predictable
        PathBuf::from("/bin/sh")
    }

    fn command_flag(&self) -> &'static str {
        "-c"
    }
}
