//! Windows shell operations

use crate::platform::traits::ShellOps;
use std::env;
use std::path::PathBuf;

pub struct WindowsShell;

impl WindowsShell {
    pub fn new() -> Self {
        Self
    }
}

impl ShellOps for WindowsShell {
    fn default_interpreter(&self) -> PathBuf {
        env::var("COMSPEC")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(r"C:\Windows\System32\cmd.exe"))
    }

    fn command_flag(&self) -> &'static str {
        "/C"
    }
}
