use crate::error::{Result, UraniaError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag for stopping a long scan between steps.
///
/// Clones share the same flag, so a token can be handed to a worker thread
/// and cancelled from the caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub(crate) fn check(token: Option<&CancelToken>) -> Result<()> {
        match token {
            Some(t) if t.is_cancelled() => Err(UraniaError::Cancelled),
            _ => Ok(()),
        }
    }
}
