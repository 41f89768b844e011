//! Instrumented [`UiAffinity`] implementations.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use devassist::project::{AffinityToken, SerialAffinity, UiAffinity};
use tokio_util::sync::CancellationToken;

/// Counts rendezvous and optionally cancels a token on the n-th one.
#[derive(Default)]
pub struct RecordingAffinity {
    inner: SerialAffinity,
    switches: AtomicUsize,
    cancel_on: Option<(usize, CancellationToken)>,
}

impl RecordingAffinity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel `token` during the `n`-th switch (1-based).
    pub fn cancelling(n: usize, token: CancellationToken) -> Self {
        Self {
            cancel_on: Some((n, token)),
            ..Self::default()
        }
    }

    pub fn switches(&self) -> usize {
        self.switches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UiAffinity for RecordingAffinity {
    async fn switch_to_main_thread(&self) -> AffinityToken {
        let n = self.switches.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((at, token)) = &self.cancel_on {
            if *at == n {
                token.cancel();
            }
        }
        self.inner.switch_to_main_thread().await
    }
}
