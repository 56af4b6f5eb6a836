//! Cooperative, one-shot cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cozy_types::error::{CozyError, Result};

/// Shared flag observed by an in-flight fetch.
///
/// Cancelling is one-shot: the first [`CancelToken::cancel`] flips the
/// flag, later calls do nothing. Cancelling after the fetch completed is
/// harmless.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Returns `true` only for the call that
    /// actually cancelled.
    pub fn cancel(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancellation was requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(CozyError::Cancelled)
        } else {
            Ok(())
        }
    }
}
