//! Bridge from listener callbacks to async consumers
//!
//! Listener callbacks run on background threads. A [`ChannelListener`]
//! turns them into [`WrapperEvent`]s on an unbounded tokio channel so an
//! async renderer can `await` output instead of implementing the listener
//! trait itself.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::wrapper::{Wrapper, WrapperId, WrapperListener};

/// Event forwarded from a wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperEvent {
    /// New output is ready to drain from the wrapper with this id
    TextReady(WrapperId),
    /// The wrapper with this id has finished
    Finished(WrapperId),
}

impl WrapperEvent {
    pub fn source(&self) -> WrapperId {
        match self {
            WrapperEvent::TextReady(id) | WrapperEvent::Finished(id) => *id,
        }
    }
}

/// Listener that forwards callbacks as channel events
pub struct ChannelListener {
    sender: mpsc::UnboundedSender<WrapperEvent>,
}

impl ChannelListener {
    /// Create a listener and the receiving end of its channel.
    ///
    /// Keep the returned `Arc` alive for as long as events are wanted;
    /// wrappers only hold it weakly.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<WrapperEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { sender }), receiver)
    }

    fn forward(&self, event: WrapperEvent) {
        if self.sender.send(event).is_err() {
            trace!("Event receiver dropped; discarding {:?}", event);
        }
    }
}

impl WrapperListener for ChannelListener {
    fn on_text_ready(&self, source: &dyn Wrapper) {
        self.forward(WrapperEvent::TextReady(source.id()));
    }

    fn on_finished(&self, source: &dyn Wrapper) {
        self.forward(WrapperEvent::Finished(source.id()));
    }
}
