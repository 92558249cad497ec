//! Contract tests for debounced notification

#[path = "../test_utils/mod.rs"]
mod test_utils;

use shellwrap::config::AlertConfig;
use shellwrap::{LineKind, Wrapper};
use std::thread;
use std::time::Duration;
use test_utils::{wait_until, MockWrapper, RecordingListener};

const TIMEOUT: Duration = Duration::from_secs(5);

fn alerts() -> AlertConfig {
    AlertConfig::default()
}

#[test]
fn test_single_characters_are_coalesced() {
    let text = "hello world\nsecond line\nthird\npartial tail of the stream!!".repeat(2);
    let chars: Vec<char> = text.chars().take(100).collect();
    assert_eq!(chars.len(), 100);

    let burst = MockWrapper::new(&alerts());
    let listener = RecordingListener::new();
    burst.add_listener(listener.handle());

    for ch in &chars {
        burst.emit(&ch.to_string(), LineKind::Normal);
    }

    assert!(wait_until(TIMEOUT, || listener.ready_count() >= 1));
    // Let any in-flight loop settle
    thread::sleep(Duration::from_millis(200));
    let notifications = listener.ready_count();
    assert!(notifications >= 1);
    assert!(notifications < 100, "{} notifications", notifications);

    let whole = MockWrapper::new(&alerts());
    whole.emit(&chars.iter().collect::<String>(), LineKind::Normal);

    assert_eq!(burst.drain_text(), whole.drain_text());
    assert_eq!(burst.current_fragment(), whole.current_fragment());
}

#[test]
fn test_every_burst_is_delivered() {
    let source = MockWrapper::new(&AlertConfig {
        interval_ms: 10,
        shutdown_timeout_ms: 200,
    });
    let listener = RecordingListener::new();
    source.add_listener(listener.handle());

    source.emit("first\n", LineKind::Normal);
    assert!(wait_until(TIMEOUT, || listener.ready_count() >= 1));
    thread::sleep(Duration::from_millis(50));
    let after_first = listener.ready_count();

    source.emit("second\n", LineKind::Normal);
    assert!(wait_until(TIMEOUT, || listener.ready_count() > after_first));
}

#[test]
fn test_dropped_listener_is_not_called() {
    let source = MockWrapper::new(&AlertConfig {
        interval_ms: 10,
        shutdown_timeout_ms: 200,
    });
    let listener = RecordingListener::new();
    source.add_listener(listener.handle());
    drop(listener);

    source.emit("nobody home\n", LineKind::Normal);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(source.drain_text().len(), 1);
}

#[test]
fn test_finished_is_delivered_to_all_listeners() {
    let source = MockWrapper::new(&alerts());
    let first = RecordingListener::new();
    let second = RecordingListener::new();
    source.add_listener(first.handle());
    source.add_listener(second.handle());

    source.emit("tail", LineKind::Normal);
    source.finish();

    assert_eq!(first.finished_count(), 1);
    assert_eq!(second.finished_count(), 1);
    assert_eq!(source.drain_text().len(), 1);
}

#[test]
fn test_drop_during_active_loop_returns_promptly() {
    let source = MockWrapper::new(&AlertConfig {
        interval_ms: 1000,
        shutdown_timeout_ms: 100,
    });
    source.emit("x", LineKind::Normal);

    let started = std::time::Instant::now();
    drop(source);
    assert!(started.elapsed() < Duration::from_millis(500));
}
