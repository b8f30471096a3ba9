//! Retry with exponential backoff

use std::future::Future;
use std::time::Duration;

use crate::cancel::CancellationToken;
use crate::error::{CheckFailure, ServiceError};

/// How transient service failures are retried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Default: 4.
    pub max_attempts: u32,
    /// Wait before the first retry; doubles on each further retry. Default: 500 ms.
    pub initial_backoff: Duration,
    /// Upper bound on any single wait, including `Retry-After` hints. Default: 30 s.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff before retry number `retry` (1 for the first retry)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// How long to wait after `error` before retry number `retry`
    pub fn delay_for(&self, retry: u32, error: &ServiceError) -> Duration {
        match error {
            ServiceError::RateLimited {
                retry_after: Some(hint),
            } => (*hint).min(self.max_backoff),
            _ => self.backoff(retry),
        }
    }

    /// Run `op` until it succeeds, fails permanently, runs out of attempts,
    /// or `cancel` fires
    pub(crate) async fn run<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<T, CheckFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(CheckFailure::Cancelled);
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CheckFailure::Cancelled),
                result = op() => result,
            };

            let error = match result {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !error.is_transient() {
                return Err(CheckFailure::Rejected(error));
            }
            if attempt >= max_attempts {
                return Err(CheckFailure::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            }

            let delay = self.delay_for(attempt, &error);
            tracing::debug!(
                "Grammar request failed ({error}), retry {attempt}/{} in {delay:?}",
                max_attempts - 1
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CheckFailure::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}
