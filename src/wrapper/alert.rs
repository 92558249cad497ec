//! Debounced listener notification
//!
//! An `AlertDispatcher` coalesces bursts of `arm` calls into periodic
//! `on_text_ready` callbacks. The dispatch loop runs on a background
//! thread that is started lazily by the first `arm` and exits on its own
//! once an interval passes without new output:
//!
//! 1. `arm` sets the pending flag and starts the loop if none is running
//! 2. the loop clears the flag, sleeps one interval, notifies every listener
//! 3. it continues only if the flag was set again during the sleep
//!
//! The flag and the running marker share one mutex, so an `arm` racing the
//! loop's exit either re-arms a live loop or starts a new one, never neither.
//! The sleep doubles as a cancellation wait: shutdown drops the loop's
//! channel and the loop exits at its next iteration boundary.

use super::{lock, Wrapper, WrapperListener};
use crate::config::AlertConfig;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, ThreadId};
use std::time::Duration;

/// Coalesces output events into periodic listener notifications
pub struct AlertDispatcher {
    shared: Arc<Shared>,
    interval: Duration,
    shutdown_timeout: Duration,
}

/// State shared between the owner and the dispatch loop
struct Shared {
    /// The observable reported to listeners; weak so the loop never keeps
    /// its owner alive
    source: Weak<dyn Wrapper>,
    listeners: Mutex<Vec<Weak<dyn WrapperListener>>>,
    state: Mutex<DispatchState>,
}

#[derive(Default)]
struct DispatchState {
    pending: bool,
    running: bool,
    closed: bool,
    worker: Option<WorkerHandle>,
}

/// Cancellation and completion channels of the current loop
struct WorkerHandle {
    cancel: Sender<()>,
    done: Receiver<()>,
    thread_id: ThreadId,
}

impl AlertDispatcher {
    /// Create a dispatcher reporting `source` to its listeners
    pub fn new(source: Weak<dyn Wrapper>, config: &AlertConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                listeners: Mutex::new(Vec::new()),
                state: Mutex::new(DispatchState::default()),
            }),
            interval: config.interval(),
            shutdown_timeout: config.shutdown_timeout(),
        }
    }

    /// Register a listener; dead entries are pruned on the next notification
    pub fn add_listener(&self, listener: Weak<dyn WrapperListener>) {
        lock(&self.shared.listeners).push(listener);
    }

    /// Number of registered listeners that are still alive
    pub fn listener_count(&self) -> usize {
        lock(&self.shared.listeners)
            .iter()
            .filter(|listener| listener.strong_count() > 0)
            .count()
    }

    /// Record that new output is available, starting the loop if idle
    pub fn arm(&self) {
        let mut state = lock(&self.shared.state);
        if state.closed {
            return;
        }

        state.pending = true;
        if state.running {
            return;
        }

        let (cancel_tx, cancel_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        let shared = Arc::clone(&self.shared);
        let interval = self.interval;

        let spawned = thread::Builder::new()
            .name("shellwrap-alert".to_string())
            .spawn(move || dispatch_loop(shared, interval, cancel_rx, done_tx));

        match spawned {
            Ok(handle) => {
                state.running = true;
                state.worker = Some(WorkerHandle {
                    cancel: cancel_tx,
                    done: done_rx,
                    thread_id: handle.thread().id(),
                });
                trace!("Alert loop started");
            }
            Err(e) => {
                // Leave the flag set so the next arm retries
                warn!("Failed to start alert loop: {}", e);
            }
        }
    }

    /// Whether a dispatch loop is currently active
    pub fn is_running(&self) -> bool {
        lock(&self.shared.state).running
    }

    /// Tell every listener that `source` has finished
    pub fn notify_finished(&self, source: &dyn Wrapper) {
        for listener in self.shared.live_listeners() {
            listener.on_finished(source);
        }
    }

    /// Stop the loop cooperatively and wait a bounded time for it to exit.
    ///
    /// Further `arm` calls are ignored. A loop that does not exit within the
    /// shutdown timeout is abandoned.
    pub fn shutdown(&self) {
        let worker = {
            let mut state = lock(&self.shared.state);
            if state.closed {
                return;
            }
            state.closed = true;
            state.pending = false;
            state.running = false;
            state.worker.take()
        };

        let Some(WorkerHandle {
            cancel,
            done,
            thread_id,
        }) = worker
        else {
            return;
        };

        drop(cancel);

        // A listener callback may tear down the owner from the loop itself
        if thread::current().id() == thread_id {
            debug!("Alert dispatcher shut down from its own loop");
            return;
        }

        match done.recv_timeout(self.shutdown_timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                debug!("Alert loop stopped");
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "Alert loop did not stop within {:?}; abandoning it",
                    self.shutdown_timeout
                );
            }
        }
    }
}

impl Drop for AlertDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Shared {
    /// Snapshot live listeners, pruning dropped ones
    fn live_listeners(&self) -> Vec<Arc<dyn WrapperListener>> {
        let mut listeners = lock(&self.listeners);
        listeners.retain(|listener| listener.strong_count() > 0);
        listeners.iter().filter_map(Weak::upgrade).collect()
    }

    fn notify_text_ready(&self) -> bool {
        // Owner already torn down: benign, stop quietly
        let Some(source) = self.source.upgrade() else {
            return false;
        };

        for listener in self.live_listeners() {
            listener.on_text_ready(source.as_ref());
        }
        true
    }
}

fn dispatch_loop(
    shared: Arc<Shared>,
    interval: Duration,
    cancel: Receiver<()>,
    done: Sender<()>,
) {
    loop {
        lock(&shared.state).pending = false;

        match cancel.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        trace!("Alert loop notifying listeners");
        let alive = shared.notify_text_ready();

        let mut state = lock(&shared.state);
        if !alive || !state.pending || state.closed {
            state.running = false;
            break;
        }
    }

    let _ = done.send(());
}
