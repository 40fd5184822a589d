//! Cooperative cancellation for long-running searches.
//!
//! Every puzzle algorithm polls its controller once per expansion. A search
//! that observes an abort returns an empty path with `cancelled` set.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Polled by a search between expansions. Returning `true` makes the
/// search stop and report itself cancelled.
pub trait AbortController {
    fn should_abort(&self) -> bool;
}

/// Never aborts. Used by [`crate::search::solve`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAbortController;

impl AbortController for NoAbortController {
    fn should_abort(&self) -> bool {
        false
    }
}

/// Aborts once a wall-clock deadline has passed.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutAbortController {
    deadline: Instant,
}

impl TimeoutAbortController {
    /// Deadline `duration` from now.
    pub fn duration(duration: Duration) -> Self {
        Self::until(Instant::now() + duration)
    }

    pub fn until(deadline: Instant) -> Self {
        Self { deadline }
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

impl AbortController for TimeoutAbortController {
    fn should_abort(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Aborts when a shared flag is raised, typically from another thread.
#[derive(Debug, Clone, Default)]
pub struct FlagAbortController {
    flag: Arc<AtomicBool>,
}

impl FlagAbortController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn abort(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl AbortController for FlagAbortController {
    fn should_abort(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_is_shared_between_clones() {
        let controller = FlagAbortController::new();
        let handle = controller.clone();
        assert!(!controller.should_abort());
        handle.abort();
        assert!(controller.should_abort());
    }

    #[test]
    fn test_distant_deadline_keeps_running() {
        let controller = TimeoutAbortController::duration(Duration::from_secs(3600));
        assert!(!controller.should_abort());
        assert!(controller.remaining() > Duration::from_secs(3500));
        assert!(!NoAbortController.should_abort());
    }

    #[test]
    fn test_zero_timeout_aborts_immediately() {
        let controller = TimeoutAbortController::duration(Duration::ZERO);
        assert!(controller.should_abort());
    }
}
