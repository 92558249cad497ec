//! Listener that records every callback

use shellwrap::{Wrapper, WrapperId, WrapperListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

#[derive(Default)]
pub struct RecordingListener {
    ready: AtomicUsize,
    finished: AtomicUsize,
    finished_sources: Mutex<Vec<WrapperId>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Weak handle suitable for `add_listener`
    pub fn handle(self: &Arc<Self>) -> Weak<dyn WrapperListener> {
        let listener: Arc<dyn WrapperListener> = self.clone();
        Arc::downgrade(&listener)
    }

    pub fn ready_count(&self) -> usize {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn finished_count(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn finished_sources(&self) -> Vec<WrapperId> {
        self.finished_sources.lock().unwrap().clone()
    }
}

impl WrapperListener for RecordingListener {
    fn on_text_ready(&self, _source: &dyn Wrapper) {
        self.ready.fetch_add(1, Ordering::SeqCst);
    }

    fn on_finished(&self, source: &dyn Wrapper) {
        self.finished.fetch_add(1, Ordering::SeqCst);
        self.finished_sources.lock().unwrap().push(source.id());
    }
}
