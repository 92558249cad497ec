//! Contract tests shared by every observable

#[path = "../test_utils/mod.rs"]
mod test_utils;

use shellwrap::{LineKind, Wrapper};
use std::fs;
use test_utils::{fast_config, temp_shell, MockWrapper};

fn check_drain_and_peek(source: &dyn Wrapper) {
    let peeked = source.peek_text();
    assert_eq!(source.peek_text(), peeked);

    let drained = source.drain_text();
    assert_eq!(drained, peeked);
    assert!(source.drain_text().is_empty());
    assert!(source.peek_text().is_empty());
}

#[test]
fn test_mock_wrapper_contract() {
    let source = MockWrapper::new(&fast_config().alerts);
    source.emit("a\nb\nc", LineKind::Normal);
    check_drain_and_peek(source.as_ref());
    assert_eq!(source.current_fragment(), "c");
}

#[test]
fn test_shell_contract() {
    let (dir, shell) = temp_shell();
    fs::create_dir(dir.path().join("d")).unwrap();
    shell.send_line("cd d", LineKind::Normal);
    shell.send_line("cd missing", LineKind::Normal);
    check_drain_and_peek(shell.as_ref());
}

#[test]
fn test_identity_is_stable_and_distinct() {
    let a = MockWrapper::new(&fast_config().alerts);
    let b = MockWrapper::new(&fast_config().alerts);
    assert_eq!(a.id(), a.id());
    assert_ne!(a.id(), b.id());
}
