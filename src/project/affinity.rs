//! UI-affinity rendezvous.
//!
//! The host only allows its workspace to be mutated from one logical
//! execution context. Every mutation entry point takes an [`AffinityToken`]
//! as a capability argument, and tokens are only handed out by a
//! [`UiAffinity`] implementation once the caller has switched onto that
//! context.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Permission to mutate a shared solution snapshot.
///
/// Held for the duration of one mutation step and then dropped; the next
/// step must rendezvous again.
#[derive(Debug)]
pub struct AffinityToken {
    _guard: Option<OwnedMutexGuard<()>>,
}

impl AffinityToken {
    /// Token backed by a lock the host already holds for its UI context.
    ///
    /// The lock is released when the token is dropped.
    pub fn from_guard(guard: OwnedMutexGuard<()>) -> Self {
        Self {
            _guard: Some(guard),
        }
    }

    /// Token for a caller that is already on the UI context and has no
    /// lock to hand over, such as single-threaded tools and tests.
    #[doc(hidden)]
    pub fn assume_affinity() -> Self {
        Self { _guard: None }
    }
}

/// Host-provided switch onto the UI execution context.
#[async_trait]
pub trait UiAffinity: Send + Sync {
    /// Suspend until the caller may mutate the workspace.
    async fn switch_to_main_thread(&self) -> AffinityToken;
}

/// Serializes all mutation through one async mutex.
///
/// Stands in for a host UI thread: at most one token is alive at a time.
#[derive(Debug, Clone, Default)]
pub struct SerialAffinity {
    lock: Arc<Mutex<()>>,
}

impl SerialAffinity {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UiAffinity for SerialAffinity {
    async fn switch_to_main_thread(&self) -> AffinityToken {
        let guard = Arc::clone(&self.lock).lock_owned().await;
        tracing::trace!("acquired ui affinity");
        AffinityToken::from_guard(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serial_affinity_hands_out_one_token_at_a_time() {
        let affinity = SerialAffinity::new();
        let first = affinity.switch_to_main_thread().await;
        assert!(affinity.lock.try_lock().is_err());
        drop(first);
        assert!(affinity.lock.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_the_rendezvous() {
        let affinity = SerialAffinity::new();
        let other = affinity.clone();
        let _token = affinity.switch_to_main_thread().await;
        assert!(other.lock.try_lock().is_err());
    }

    #[tokio::test]
    async fn test_token_from_guard_holds_the_lock() {
        let lock = Arc::new(Mutex::new(()));
        let token = AffinityToken::from_guard(Arc::clone(&lock).lock_owned().await);
        assert!(lock.try_lock().is_err());
        drop(token);
        assert!(lock.try_lock().is_ok());
    }
}
