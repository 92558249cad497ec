//! Line accumulation
//!
//! Turns arbitrarily small output fragments into completed, classified
//! lines. `LineBuffer` holds no lock itself; owners keep the lines and the
//! pending fragment behind one mutex so a drain never sees a torn buffer.

use crate::models::{ConsoleLine, LineKind};
use std::mem;

/// Completed lines plus the unterminated tail
#[derive(Debug, Default)]
pub struct LineBuffer {
    /// Completed lines, oldest first
    lines: Vec<ConsoleLine>,
    /// Output received since the last line break
    fragment: String,
    /// One-shot kind for the next completed line of Normal input
    next_kind: Option<LineKind>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append output text, promoting every line-terminated segment to a line.
    ///
    /// Image input is never split; it becomes one complete line directly.
    /// When a one-shot kind is pending and `kind` is Normal, the first
    /// completed line takes the pending kind. Returns the number of lines
    /// completed.
    pub fn append(&mut self, text: &str, kind: LineKind) -> usize {
        if kind == LineKind::Image {
            self.lines.push(ConsoleLine::image(text));
            return 1;
        }

        let mut combined = mem::take(&mut self.fragment);
        combined.push_str(text);

        let mut segments = split_lines(&combined);
        let tail = segments.pop().unwrap_or_default();
        let completed = segments.len();

        for segment in segments {
            let line_kind = match self.next_kind {
                Some(pending) if kind == LineKind::Normal => pending,
                _ => kind,
            };
            self.lines.push(ConsoleLine::new(segment, line_kind));
            self.next_kind = None;
        }

        self.fragment = tail.to_string();
        completed
    }

    /// Append already-completed lines unchanged
    pub fn extend<I: IntoIterator<Item = ConsoleLine>>(&mut self, lines: I) {
        self.lines.extend(lines);
    }

    /// Set the one-shot kind override for the next completed line
    pub fn set_next_kind(&mut self, kind: LineKind) {
        self.next_kind = Some(kind);
    }

    /// Replace the pending fragment wholesale
    pub fn set_fragment(&mut self, fragment: impl Into<String>) {
        self.fragment = fragment.into();
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Promote a non-empty fragment to a completed line of `kind`
    pub fn flush_fragment(&mut self, kind: LineKind) -> bool {
        if self.fragment.is_empty() {
            return false;
        }
        let text = mem::take(&mut self.fragment);
        self.lines.push(ConsoleLine::new(text, kind));
        true
    }

    /// Copy and clear the completed lines
    pub fn drain(&mut self) -> Vec<ConsoleLine> {
        mem::take(&mut self.lines)
    }

    /// Copy the completed lines without clearing them
    pub fn peek(&self) -> Vec<ConsoleLine> {
        self.lines.clone()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split on `"\r\n"` or `"\n"`.
///
/// Always returns at least one segment; the last one is the unterminated
/// tail and keeps any trailing `'\r'` so a break split across two appends
/// still joins up.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = text.split('\n').collect();
    let last = segments.len() - 1;
    for segment in segments.iter_mut().take(last) {
        let text: &str = *segment;
        *segment = text.strip_suffix('\r').unwrap_or(text);
    }
    segments
}
