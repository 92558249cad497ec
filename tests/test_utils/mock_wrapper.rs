//! In-memory wrapper for testing observers and the alert protocol

use shellwrap::config::AlertConfig;
use shellwrap::wrapper::WrapperCore;
use shellwrap::{ConsoleLine, LineKind, Wrapper, WrapperId, WrapperListener};
use std::sync::{Arc, Weak};

/// Wrapper whose output is injected by the test
pub struct MockWrapper {
    core: WrapperCore,
}

impl MockWrapper {
    pub fn new(alerts: &AlertConfig) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<MockWrapper>| {
            let source: Weak<dyn Wrapper> = weak.clone();
            Self {
                core: WrapperCore::new(source, alerts),
            }
        })
    }

    /// Simulate output arriving from the wrapped source
    pub fn emit(&self, text: &str, kind: LineKind) {
        self.core.append(text, kind);
    }

    /// Simulate the source finishing
    pub fn finish(&self) {
        self.core.flush_fragment(LineKind::Normal);
        self.core.notify_finished(self);
    }
}

impl Wrapper for MockWrapper {
    fn id(&self) -> WrapperId {
        self.core.id()
    }

    fn add_listener(&self, listener: Weak<dyn WrapperListener>) {
        self.core.add_listener(listener);
    }

    fn drain_text(&self) -> Vec<ConsoleLine> {
        self.core.drain()
    }

    fn peek_text(&self) -> Vec<ConsoleLine> {
        self.core.peek()
    }

    fn current_fragment(&self) -> String {
        self.core.fragment()
    }

    // Input has nowhere to go
    fn send_line(&self, _text: &str, _kind: LineKind) {}

    fn send_character(&self, _ch: char, _flush: bool) {}

    fn send(&self, _text: &str, _flush: bool) {}
}
