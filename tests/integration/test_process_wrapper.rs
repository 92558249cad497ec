//! Integration tests for the child process adapter

#![cfg(unix)]

#[path = "../test_utils/mod.rs"]
mod test_utils;

use shellwrap::platform::Platform;
use shellwrap::{ConsoleLine, LineKind, ProcessSpec, ProcessState, ProcessWrapper, Wrapper};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use test_utils::{collect_lines, fast_config, wait_until, RecordingListener};

const TIMEOUT: Duration = Duration::from_secs(5);

fn sh(command: &str, dir: &TempDir) -> ProcessSpec {
    ProcessSpec::shell_command(command, dir.path(), &fast_config().process)
}

/// Running and not a zombie awaiting its new parent
fn process_alive(pid: u32) -> bool {
    if !Platform::signals().is_process_running(pid) {
        return false;
    }
    match fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => !stat
            .rsplit_once(") ")
            .is_some_and(|(_, rest)| rest.starts_with('Z')),
        Err(_) => true,
    }
}

/// Start `command`, which must print a background pid first
fn start_with_grandchild(command: &str, dir: &TempDir) -> (std::sync::Arc<ProcessWrapper>, u32) {
    let child = ProcessWrapper::start(sh(command, dir), Vec::new(), &fast_config()).unwrap();
    let lines = collect_lines(child.as_ref(), TIMEOUT, |lines| !lines.is_empty());
    let pid = lines[0].text().trim().parse().unwrap();
    (child, pid)
}

#[test]
fn test_finished_fires_exactly_once() {
    let dir = TempDir::new().unwrap();
    let listener = RecordingListener::new();
    let child =
        ProcessWrapper::start(sh("echo done", &dir), vec![listener.handle()], &fast_config())
            .unwrap();

    assert!(wait_until(TIMEOUT, || listener.finished_count() == 1));
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(listener.finished_count(), 1);
    assert_eq!(listener.finished_sources(), vec![child.id()]);
    assert_eq!(child.drain_text(), vec![ConsoleLine::normal("done")]);
}

#[test]
fn test_output_is_complete_before_finished() {
    let dir = TempDir::new().unwrap();
    let listener = RecordingListener::new();
    let child = ProcessWrapper::start(
        sh("for i in 1 2 3 4 5; do echo line$i; done", &dir),
        vec![listener.handle()],
        &fast_config(),
    )
    .unwrap();

    assert!(wait_until(TIMEOUT, || listener.finished_count() == 1));
    let texts: Vec<String> = child
        .drain_text()
        .iter()
        .map(|l| l.text().to_string())
        .collect();
    assert_eq!(texts, vec!["line1", "line2", "line3", "line4", "line5"]);
}

#[test]
fn test_multibyte_output_survives_small_reads() {
    let dir = TempDir::new().unwrap();
    let mut config = fast_config();
    config.process.read_buffer_size = 1;
    let spec = ProcessSpec::shell_command("printf 'héllo wörld\\n'", dir.path(), &config.process);
    let child = ProcessWrapper::start(spec, Vec::new(), &config).unwrap();

    let lines = collect_lines(child.as_ref(), TIMEOUT, |lines| !lines.is_empty());
    assert_eq!(lines, vec![ConsoleLine::normal("héllo wörld")]);
}

#[test]
fn test_info_tracks_lifecycle() {
    let dir = TempDir::new().unwrap();
    let child = ProcessWrapper::start(sh("exit 7", &dir), Vec::new(), &fast_config()).unwrap();

    let started = child.info();
    assert_eq!(started.pid, Some(child.pid()));
    assert_eq!(started.command, "exit 7");

    assert!(wait_until(TIMEOUT, || child.is_finished()));
    let info = child.info();
    assert_eq!(info.state, ProcessState::Terminated);
    assert_eq!(info.exit_code, Some(7));
    assert!(info.runtime().is_some());
}

#[test]
fn test_send_character_by_character() {
    let dir = TempDir::new().unwrap();
    let child =
        ProcessWrapper::start(sh("read word; echo [$word]", &dir), Vec::new(), &fast_config())
            .unwrap();

    for ch in "abc".chars() {
        child.send_character(ch, false);
    }
    child.send("\n", true);

    let lines = collect_lines(child.as_ref(), TIMEOUT, |lines| !lines.is_empty());
    assert_eq!(lines, vec![ConsoleLine::normal("[abc]")]);
}

#[test]
fn test_environment_is_passed() {
    let dir = TempDir::new().unwrap();
    let spec = sh("echo $SHELLWRAP_TEST_VALUE", &dir).env("SHELLWRAP_TEST_VALUE", "42");
    let child = ProcessWrapper::start(spec, Vec::new(), &fast_config()).unwrap();

    let lines = collect_lines(child.as_ref(), TIMEOUT, |lines| !lines.is_empty());
    assert_eq!(lines, vec![ConsoleLine::normal("42")]);
}

#[test]
fn test_terminate_reaches_grandchildren() {
    let dir = TempDir::new().unwrap();
    // The grandchild ignores SIGTERM, so only the group SIGKILL stops it
    let (child, grandchild) =
        start_with_grandchild("(trap '' TERM; exec sleep 30) & echo $!; wait", &dir);
    assert!(process_alive(grandchild));

    child.terminate();
    assert!(wait_until(TIMEOUT, || child.is_finished()));
    assert!(wait_until(TIMEOUT, || !process_alive(grandchild)));
}

#[test]
fn test_terminate_after_reap_skips_group_signals() {
    let dir = TempDir::new().unwrap();
    // The leader exits at once; the grandchild keeps stdout open
    let (child, grandchild) = start_with_grandchild("sleep 2 & echo $!", &dir);

    assert!(wait_until(TIMEOUT, || child.has_exited()));
    assert!(!child.is_finished());

    child.terminate();
    assert!(process_alive(grandchild));
    assert!(wait_until(TIMEOUT, || child.is_finished()));
}

#[test]
fn test_input_after_finish_is_ignored() {
    let dir = TempDir::new().unwrap();
    let child = ProcessWrapper::start(sh("true", &dir), Vec::new(), &fast_config()).unwrap();
    assert!(wait_until(TIMEOUT, || child.is_finished()));

    child.send_line("ignored", LineKind::Normal);
    assert!(child.drain_text().is_empty());
}
