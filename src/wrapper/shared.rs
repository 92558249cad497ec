//! Shared observable state
//!
//! `WrapperCore` bundles a wrapper's identity, its line buffer and its alert
//! dispatcher. Every mutation takes the buffer lock, releases it, then arms
//! the dispatcher, so the buffer lock and the dispatcher's locks are never
//! held together.

use super::{lock, AlertDispatcher, LineBuffer, Wrapper, WrapperId, WrapperListener};
use crate::config::AlertConfig;
use crate::models::{ConsoleLine, LineKind};
use std::sync::{Mutex, Weak};

pub struct WrapperCore {
    id: WrapperId,
    buffer: Mutex<LineBuffer>,
    dispatcher: AlertDispatcher,
}

impl WrapperCore {
    /// `source` is the observable that owns this core, passed to listeners
    pub fn new(source: Weak<dyn Wrapper>, config: &AlertConfig) -> Self {
        Self {
            id: WrapperId::new(),
            buffer: Mutex::new(LineBuffer::new()),
            dispatcher: AlertDispatcher::new(source, config),
        }
    }

    pub fn id(&self) -> WrapperId {
        self.id
    }

    /// Run `f` against the buffer under its lock, then arm the dispatcher
    fn update<R>(&self, f: impl FnOnce(&mut LineBuffer) -> R) -> R {
        let result = {
            let mut buffer = lock(&self.buffer);
            f(&mut buffer)
        };
        self.dispatcher.arm();
        result
    }

    /// Run the buffer-append algorithm over `text`
    pub fn append(&self, text: &str, kind: LineKind) -> usize {
        self.update(|buffer| buffer.append(text, kind))
    }

    /// Add already-completed lines
    pub fn extend_lines(&self, lines: Vec<ConsoleLine>) {
        if lines.is_empty() {
            return;
        }
        self.update(|buffer| buffer.extend(lines));
    }

    /// Add completed lines and replace the fragment in one step
    pub fn absorb(&self, lines: Vec<ConsoleLine>, fragment: impl Into<String>) {
        let fragment = fragment.into();
        self.update(|buffer| {
            buffer.extend(lines);
            buffer.set_fragment(fragment);
        });
    }

    pub fn set_fragment(&self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        self.update(|buffer| buffer.set_fragment(fragment));
    }

    /// Set the one-shot kind for the next completed Normal line
    pub fn set_next_kind(&self, kind: LineKind) {
        lock(&self.buffer).set_next_kind(kind);
    }

    /// Promote a non-empty fragment to a line; returns whether one was added
    pub fn flush_fragment(&self, kind: LineKind) -> bool {
        let flushed = lock(&self.buffer).flush_fragment(kind);
        if flushed {
            self.dispatcher.arm();
        }
        flushed
    }

    pub fn drain(&self) -> Vec<ConsoleLine> {
        lock(&self.buffer).drain()
    }

    pub fn peek(&self) -> Vec<ConsoleLine> {
        lock(&self.buffer).peek()
    }

    pub fn fragment(&self) -> String {
        lock(&self.buffer).fragment().to_string()
    }

    pub fn add_listener(&self, listener: Weak<dyn WrapperListener>) {
        self.dispatcher.add_listener(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.dispatcher.listener_count()
    }

    /// Signal text-ready to listeners after the next interval
    pub fn arm(&self) {
        self.dispatcher.arm();
    }

    pub fn notify_finished(&self, source: &dyn Wrapper) {
        self.dispatcher.notify_finished(source);
    }

    /// Stop the dispatch loop; later mutations no longer notify
    pub fn shutdown(&self) {
        self.dispatcher.shutdown();
    }
}
