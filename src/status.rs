//! One-directional progress notifications.
//!
//! The worker narrates every state transition as a human-readable line:
//! `"no tickets yet, refresh #4"`, `"tickets found"`, `"terms accepted"`,
//! error strings. Delivery is best-effort and never blocks the worker: the
//! channel is unbounded and a dropped receiver silently discards further
//! lines (they still land in the tracing log).

// ============================================================================
// Imports
// ============================================================================

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

// ============================================================================
// StatusReporter
// ============================================================================

/// Sending half of the status channel, held by the worker.
///
/// Cloning is cheap; all clones feed the same receiver in emission order.
#[derive(Clone)]
pub struct StatusReporter {
    tx: UnboundedSender<String>,
}

impl StatusReporter {
    /// Creates a reporter and the receiver the observer reads from.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emits one progress line.
    ///
    /// Never blocks; a line emitted after the observer went away is dropped.
    pub fn emit(&self, message: impl Into<String>) {
        let message = message.into();
        info!(status = %message);
        let _ = self.tx.send(message);
    }
}

impl std::fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReporter")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_messages_arrive_in_order() {
        let (reporter, mut rx) = StatusReporter::channel();
        reporter.emit("first");
        reporter.emit("second");
        assert_eq!(rx.recv().await.unwrap(), "first");
        assert_eq!(rx.recv().await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_dropped_receiver_does_not_block_or_panic() {
        let (reporter, rx) = StatusReporter::channel();
        drop(rx);
        reporter.emit("into the void");
    }

    #[tokio::test]
    async fn test_clones_feed_same_receiver() {
        let (reporter, mut rx) = StatusReporter::channel();
        let other = reporter.clone();
        other.emit("from clone");
        assert_eq!(rx.recv().await.unwrap(), "from clone");
    }
}
