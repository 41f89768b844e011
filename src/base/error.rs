//! Cancellation as an error value.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Cooperative cancellation was observed.
///
/// Not a failure: callers treat it as "unknown" and unwind, never as a
/// negative answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

/// Polling helper for [`CancellationToken`].
pub trait CancellationExt {
    /// Returns `Err(Cancelled)` once the token has been signalled.
    fn check_cancelled(&self) -> Result<(), Cancelled>;
}

impl CancellationExt for CancellationToken {
    #[inline]
    fn check_cancelled(&self) -> Result<(), Cancelled> {
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
    fn test_check_cancelled_follows_token() {
        let token = CancellationToken::new();
        assert_eq!(token.check_cancelled(), Ok(()));
        token.cancel();
        assert_eq!(token.check_cancelled(), Err(Cancelled));
    }

    #[test]
    fn test_child_token_observes_parent() {
        let parent = CancellationToken::new();
        let child = parent.child_token();
        parent.cancel();
        assert!(child.check_cancelled().is_err());
    }
}
