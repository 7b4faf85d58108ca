use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Execution context handed to a querier: a cancellation flag shared by all
/// clones, plus an optional deadline.
///
/// The scanning engine never inspects it. Transports check it while
/// executing and while advancing their cursors, and report a failed check as
/// an ordinary cursor error.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl QueryContext {
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        QueryContext {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn check(&self) -> Result<(), ContextError> {
        if self.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_by_clones() {
        let ctx = QueryContext::background();
        let clone = ctx.clone();
        assert_eq!(clone.check(), Ok(()));

        ctx.cancel();
        assert!(clone.is_cancelled());
        assert_eq!(clone.check(), Err(ContextError::Cancelled));
    }

    #[test]
    fn test_deadline() {
        let expired = QueryContext::with_deadline(Instant::now() - Duration::from_millis(1));
        assert_eq!(expired.check(), Err(ContextError::DeadlineExceeded));

        let ctx = QueryContext::with_timeout(Duration::from_secs(60));
        assert!(ctx.deadline().is_some());
        assert_eq!(ctx.check(), Ok(()));
    }
}
