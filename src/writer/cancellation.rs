//! Cooperative cancellation for long traversals
//!
//! A decompilation task owns a token clone; whoever manages the batch can
//! flip it from any thread. Render, visit and fold calls check it at every
//! node boundary and bail out with `Cancelled`, which is deliberately not a
//! variant of the crate error type so it cannot be mistaken for a failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Returned by any traversal that stopped because cancellation was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("decompilation was cancelled")]
pub struct Cancelled;

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone of this token observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once cancellation has been requested
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(clone.check().is_ok());

        token.cancel();
        assert!(clone.is_cancelled());
        assert_eq!(clone.check(), Err(Cancelled));
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let token = CancellationToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.cancel())
            .join()
            .unwrap();
        assert!(token.is_cancelled());
    }
}
