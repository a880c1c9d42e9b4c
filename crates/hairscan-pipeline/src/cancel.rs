//! Cooperative cancellation between pipeline stages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag checked by the analyzer before each stage.
///
/// Clones share state, so a caller can hand one clone to the analyzer and
/// raise the flag from elsewhere. In-flight requests are not interrupted;
/// the per-request timeout bounds those.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Lower the flag so the session can be restarted.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!flag.is_cancelled());

        other.cancel();
        assert!(flag.is_cancelled());

        flag.reset();
        assert!(!other.is_cancelled());
    }
}
