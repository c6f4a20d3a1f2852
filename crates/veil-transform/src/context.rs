use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation handle checked before each row.
///
/// Clones share the same flag, so a supervisor can keep one and hand the
/// others to workers.
#[derive(Debug, Clone, Default)]
pub struct TransformContext {
    cancelled: Arc<AtomicBool>,
}

impl TransformContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
