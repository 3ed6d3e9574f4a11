// src/crawl/cancel.rs
// =============================================================================
// A cloneable stop flag.
//
// main.rs hands one clone to a Ctrl+C listener task and another to the
// crawler. The crawler only looks at it between pages, so a request that is
// already in flight always finishes first.
// =============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every holder of this token to stop at its next checkpoint
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
