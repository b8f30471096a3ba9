//! Cooperative cancellation

use std::sync::Arc;

use tokio::sync::watch;

/// Handle used to cancel a run
///
/// Clones share state: cancelling any clone cancels them all. Work waiting
/// on [`cancelled`](Self::cancelled) wakes immediately.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            state: Arc::new(tx),
        }
    }

    /// Cancel every clone of this token
    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    /// Whether the token has been cancelled
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Wait until the token is cancelled
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as self, so the channel cannot close
        // while we wait.
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
