//! One-shot completion signal shared by a session's activities.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

/// A one-shot, idempotently closable shutdown flag.
///
/// Failure can be detected concurrently from more than one vantage point:
/// the forwarding path and the heartbeat path can both observe a broken
/// connection in the same instant. [`close`](Self::close) picks exactly one
/// winner via compare-and-set; every other caller observes the signal
/// already closed and must not repeat the terminal actions.
#[derive(Clone)]
pub struct CompletionSignal {
    inner: Arc<Inner>,
}

struct Inner {
    closed: AtomicBool,
    token: CancellationToken,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                closed: AtomicBool::new(false),
                token: CancellationToken::new(),
            }),
        }
    }

    /// Close the signal. Returns `true` for exactly one caller — the one
    /// that performed the open→closed transition.
    pub fn close(&self) -> bool {
        let won = self
            .inner
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            self.inner.token.cancel();
        }
        won
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Resolves once the signal has been closed, from any task.
    pub async fn cancelled(&self) {
        self.inner.token.cancelled().await;
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn close_has_exactly_one_winner() {
        let signal = CompletionSignal::new();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let signal = signal.clone();
            handles.push(tokio::spawn(async move { signal.close() }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert!(signal.is_closed());
    }

    #[tokio::test]
    async fn cancelled_wakes_after_close() {
        let signal = CompletionSignal::new();
        let observer = signal.clone();

        let waiter = tokio::spawn(async move { observer.cancelled().await });

        assert!(!signal.is_closed());
        assert!(signal.close());
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_closed() {
        let signal = CompletionSignal::new();
        signal.close();
        signal.cancelled().await;
    }
}
