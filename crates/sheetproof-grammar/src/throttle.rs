//! Process-wide request throttle
//!
//! The public LanguageTool server allows 20 requests per minute per IP, so
//! by default requests start at least 3 s apart and at most two are in
//! flight. A single [`Throttle`] is shared by every checker in the process;
//! clones share the same limits.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Throttle limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Maximum requests outstanding at once. Default: 2.
    pub max_in_flight: usize,
    /// Minimum spacing between request starts. Default: 3 s.
    pub min_interval: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 2,
            min_interval: Duration::from_secs(3),
        }
    }
}

impl ThrottleConfig {
    /// No spacing, effectively unlimited concurrency
    pub fn unlimited() -> Self {
        Self {
            max_in_flight: Semaphore::MAX_PERMITS,
            min_interval: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
struct Inner {
    slots: Arc<Semaphore>,
    next_start: Mutex<Option<Instant>>,
    min_interval: Duration,
}

/// Shared limiter for grammar service requests
#[derive(Debug, Clone)]
pub struct Throttle {
    inner: Arc<Inner>,
}

/// Permission to have one request in flight; released on drop
#[derive(Debug)]
pub struct ThrottlePermit {
    _slot: OwnedSemaphorePermit,
}

impl Throttle {
    /// Create a throttle with the given limits
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                slots: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
                next_start: Mutex::new(None),
                min_interval: config.min_interval,
            }),
        }
    }

    /// Wait for a free slot and for the start spacing to elapse
    ///
    /// Returns `None` once the throttle has been closed.
    pub async fn acquire(&self) -> Option<ThrottlePermit> {
        let slot = self.inner.slots.clone().acquire_owned().await.ok()?;

        let start = {
            let mut next_start = self.inner.next_start.lock().await;
            let now = Instant::now();
            let start = match *next_start {
                Some(next) if next > now => next,
                _ => now,
            };
            *next_start = Some(start + self.inner.min_interval);
            start
        };
        tokio::time::sleep_until(start).await;

        Some(ThrottlePermit { _slot: slot })
    }

    /// Refuse all further requests and wake every waiter
    pub fn close(&self) {
        self.inner.slots.close();
    }

    /// Number of free request slots
    pub fn available(&self) -> usize {
        self.inner.slots.available_permits()
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}
