//! Unix signal operations

use crate::error::{Error, Result};
use crate::platform::traits::SignalOps;
use nix::sys::signal::{kill, killpg, Signal as NixSignal};
use nix::unistd::Pid;

pub struct UnixSignals;

impl UnixSignals {
    pub fn new() -> Self {
        Self
    }
}

impl SignalOps for UnixSignals {
    fn terminate_group(&self, pgid: u32) -> Result<()> {
        killpg(Pid::from_raw(pgid as i32), NixSignal::SIGTERM).map_err(|e| {
            Error::SignalSendFailed {
                signal: "SIGTERM".to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn kill_group(&self, pgid: u32) -> Result<()> {
        killpg(Pid::from_raw(pgid as i32), NixSignal::SIGKILL).map_err(|e| {
            Error::SignalSendFailed {
                signal: "SIGKILL".to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn is_process_running(&self, pid: u32) -> bool {
        // Signal 0 probes for existence without delivering anything
        kill(Pid::from_raw(pid as i32), None).is_ok()
    }
}
