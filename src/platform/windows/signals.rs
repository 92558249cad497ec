//! Windows signal operations
//!
//! There is no graceful group signal; `kill_group` walks the process tree
//! with `taskkill /T`.

use crate::error::{Error, Result};
use crate::platform::traits::SignalOps;
use std::process::Command;

pub struct WindowsSignals;

impl WindowsSignals {
    pub fn new() -> Self {
        Self
    }
}

impl SignalOps for WindowsSignals {
    fn terminate_group(&self, _pgid: u32) -> Result<()> {
        Err(Error::SignalNotSupported {
            signal: "SIGTERM".to_string(),
            platform: "Windows".to_string(),
        })
    }

    fn kill_group(&self, pgid: u32) -> Result<()> {
        // taskkill /T walks the whole tree
        let status = Command::new("taskkill")
            .args(["/PID", &pgid.to_string(), "/T", "/F"])
            .status()
            .map_err(|e| Error::SignalSendFailed {
                signal: "taskkill".to_string(),
                reason: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::SignalSendFailed {
                signal: "taskkill".to_string(),
                reason: format!("exited with {}", status),
            })
        }
    }

    fn is_process_running(&self, pid: u32) -> bool {
        Command::new("tasklist")
            .args(["/FI", &format!("PID eq {}", pid), "/NH"])
            .output()
            .map(|out| String::from_utf8_lossy(&out.stdout).contains(&pid.to_string()))
            .unwrap_or(false)
    }
}
