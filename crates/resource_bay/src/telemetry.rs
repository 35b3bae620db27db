//! # Collaborator Interfaces
//!
//! The engine reports to two optional collaborators:
//!
//! - an [`EventSink`] that receives every [`BayEvent`]
//! - a [`BayLogger`] that receives human-readable messages
//!
//! Both are called only after the engine lock has been released. Their
//! failures are discarded: a broken subscriber never aborts an allocation.

use bay_shared::BayEvent;
use parking_lot::Mutex;

use crate::error::SinkError;

/// Publish-only destination for engine events.
///
/// There is no acknowledgment; an `Err` only tells the engine the event was
/// lost, which it records at debug level and otherwise ignores.
pub trait EventSink: Send + Sync {
    /// Publishes one event.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the event could not be delivered.
    fn publish(&self, event: &BayEvent) -> Result<(), SinkError>;
}

/// Best-effort logger for operational messages.
pub trait BayLogger: Send + Sync {
    /// Routine information (definitions, grants, releases).
    fn info(&self, message: &str);
    /// Unusual but handled situations (rejections, blocked removals).
    fn warning(&self, message: &str);
    /// Configuration mistakes surfaced to the caller.
    fn error(&self, message: &str);
}

/// Severity of a buffered log message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// See [`BayLogger::info`].
    Info,
    /// See [`BayLogger::warning`].
    Warning,
    /// See [`BayLogger::error`].
    Error,
}

/// [`BayLogger`] that forwards to `tracing` under the `resource_bay` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl BayLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "resource_bay", "{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!(target: "resource_bay", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "resource_bay", "{message}");
    }
}

/// In-memory [`EventSink`] that buffers events until drained.
///
/// Useful for polling consumers (UI, tooling) and for tests.
#[derive(Debug, Default)]
pub struct BufferedSink {
    events: Mutex<Vec<BayEvent>>,
}

impl BufferedSink {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<BayEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Peeks at pending event count.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.events.lock().len()
    }
}

impl EventSink for BufferedSink {
    fn publish(&self, event: &BayEvent) -> Result<(), SinkError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
