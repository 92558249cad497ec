//! Test fixtures

use shellwrap::{Config, ConsoleLine, Wrapper, WrapperShell};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Defaults with short intervals so tests settle quickly
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.alerts.interval_ms = 10;
    config.alerts.shutdown_timeout_ms = 500;
    config.process.exit_poll_interval_ms = 5;
    config.process.drain_timeout_ms = 1000;
    config
}

/// A shell rooted in a fresh temporary directory
pub fn temp_shell() -> (TempDir, Arc<WrapperShell>) {
    let dir = TempDir::new().expect("temp dir");
    let shell = WrapperShell::with_directory(dir.path(), fast_config()).expect("shell starts");
    (dir, shell)
}

/// Poll `condition` until it holds or `timeout` passes
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

/// Drain `source` repeatedly until `done` accepts the accumulated lines
pub fn collect_lines(
    source: &dyn Wrapper,
    timeout: Duration,
    mut done: impl FnMut(&[ConsoleLine]) -> bool,
) -> Vec<ConsoleLine> {
    let mut lines = Vec::new();
    wait_until(timeout, || {
        lines.extend(source.drain_text());
        done(&lines)
    });
    lines
}
