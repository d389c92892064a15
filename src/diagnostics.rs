//! Diagnostic channel for recoverable codec, load, and save issues.
//!
//! Structural mismatches never abort a traversal. They are formatted into a
//! message, logged through `tracing`, and handed to the optional callback.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

type Handler = Arc<dyn Fn(&str) + Send + Sync>;

/// Optional sink for human-readable diagnostic messages
#[derive(Clone, Default)]
pub struct Diagnostics {
    handler: Option<Handler>,
}

impl Diagnostics {
    /// A channel with no callback; messages are only logged.
    pub fn silent() -> Self {
        Self::default()
    }

    /// A channel forwarding every message to `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            handler: Some(Arc::new(handler)),
        }
    }

    /// A channel that records messages, plus the shared buffer it fills.
    pub fn collect() -> (Self, Arc<Mutex<Vec<String>>>) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&messages);
        let diag = Self::new(move |msg| sink.lock().push(msg.to_string()));
        (diag, messages)
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Report a recoverable issue.
    pub fn report(&self, message: impl fmt::Display) {
        let message = message.to_string();
        warn!(target: "treestore", "{}", message);
        if let Some(handler) = &self.handler {
            handler(&message);
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
