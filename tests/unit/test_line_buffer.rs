//! Unit tests for line accumulation

use shellwrap::wrapper::{split_lines, LineBuffer};
use shellwrap::{ConsoleLine, LineKind};

fn texts(lines: &[ConsoleLine]) -> Vec<String> {
    lines.iter().map(|l| l.text().to_string()).collect()
}

#[test]
fn test_trailing_fragment_is_pending() {
    let mut buffer = LineBuffer::new();
    buffer.append("a\nb\nc", LineKind::Normal);

    assert_eq!(texts(&buffer.peek()), vec!["a", "b"]);
    assert_eq!(buffer.fragment(), "c");

    buffer.append("\n", LineKind::Normal);
    assert_eq!(texts(&buffer.drain()), vec!["a", "b", "c"]);
    assert_eq!(buffer.fragment(), "");
}

#[test]
fn test_drain_then_drain_is_empty() {
    let mut buffer = LineBuffer::new();
    buffer.append("x\ny\n", LineKind::Normal);
    assert_eq!(buffer.drain().len(), 2);
    assert!(buffer.drain().is_empty());
}

#[test]
fn test_peek_does_not_change_drain() {
    let mut buffer = LineBuffer::new();
    buffer.append("one\ntwo\n", LineKind::Error);
    let peeked = buffer.peek();
    let _ = buffer.peek();
    assert_eq!(buffer.drain(), peeked);
}

#[test]
fn test_single_characters_build_lines() {
    let mut buffer = LineBuffer::new();
    for ch in "ab\ncd\n".chars() {
        buffer.append(&ch.to_string(), LineKind::Normal);
    }
    assert_eq!(texts(&buffer.drain()), vec!["ab", "cd"]);
}

#[test]
fn test_empty_lines_are_kept() {
    let mut buffer = LineBuffer::new();
    buffer.append("\n\nx\n", LineKind::Normal);
    assert_eq!(texts(&buffer.drain()), vec!["", "", "x"]);
}

#[test]
fn test_override_applies_only_to_first_line() {
    let mut buffer = LineBuffer::new();
    buffer.set_next_kind(LineKind::Error);
    buffer.append("first\nsecond\nthird\n", LineKind::Normal);

    let kinds: Vec<LineKind> = buffer.drain().iter().map(|l| l.kind()).collect();
    assert_eq!(kinds, vec![LineKind::Error, LineKind::Normal, LineKind::Normal]);
}

#[test]
fn test_error_input_ignores_override() {
    let mut buffer = LineBuffer::new();
    buffer.set_next_kind(LineKind::Image);
    buffer.append("oops\n", LineKind::Error);
    assert_eq!(buffer.drain(), vec![ConsoleLine::error("oops")]);
}

#[test]
fn test_image_is_one_complete_line() {
    let mut buffer = LineBuffer::new();
    buffer.append("pending", LineKind::Normal);
    assert_eq!(buffer.append("/tmp/pic.png", LineKind::Image), 1);

    assert_eq!(buffer.drain(), vec![ConsoleLine::image("/tmp/pic.png")]);
    assert_eq!(buffer.fragment(), "pending");
}

#[test]
fn test_mixed_line_endings() {
    assert_eq!(split_lines("a\r\nb\nc"), vec!["a", "b", "c"]);
    assert_eq!(split_lines("only"), vec!["only"]);
}
