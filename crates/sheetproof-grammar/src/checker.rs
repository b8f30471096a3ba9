//! Grammar checking of single texts and whole documents

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sheetproof_core::{Issue, Language, TextUnit};
use tokio::task::JoinSet;

use crate::batch::{self, Batch, BatchLimits};
use crate::cancel::CancellationToken;
use crate::error::{CheckFailure, ServiceError};
use crate::retry::RetryPolicy;
use crate::service::{CheckRequest, GrammarService, ServiceMatch};
use crate::throttle::Throttle;

/// Grammar checker options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarConfig {
    /// Maximum characters per request, separators included. Default: 1500.
    pub max_batch_chars: usize,
    /// Maximum cells per request. Default: 20.
    pub max_batch_units: usize,
    /// Cells with fewer words are not sent to the service. Default: 3.
    pub min_words: usize,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            max_batch_chars: 1500,
            max_batch_units: 20,
            min_words: 3,
        }
    }
}

impl GrammarConfig {
    fn limits(&self) -> BatchLimits {
        BatchLimits {
            max_chars: self.max_batch_chars,
            max_units: self.max_batch_units.max(1),
        }
    }
}

/// Why a cell's grammar check did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The service was down or unreachable through every retry
    Unavailable,
    /// The service kept rate limiting through every retry
    RateLimited,
    /// The service refused the request (bad request or credentials)
    Rejected,
    /// The run was cancelled
    Cancelled,
    /// Grammar checking was turned off for the run
    Disabled,
}

impl SkipReason {
    /// Machine-readable name, as used in serialized output
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::Unavailable => "unavailable",
            SkipReason::RateLimited => "rate_limited",
            SkipReason::Rejected => "rejected",
            SkipReason::Cancelled => "cancelled",
            SkipReason::Disabled => "disabled",
        }
    }

    fn from_failure(failure: &CheckFailure) -> Self {
        match failure {
            CheckFailure::Exhausted {
                last: ServiceError::RateLimited { .. },
                ..
            } => SkipReason::RateLimited,
            CheckFailure::Exhausted { .. } => SkipReason::Unavailable,
            CheckFailure::Rejected(_) => SkipReason::Rejected,
            CheckFailure::Cancelled => SkipReason::Cancelled,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Unavailable => "grammar service unavailable",
            SkipReason::RateLimited => "grammar service rate limit",
            SkipReason::Rejected => "rejected by grammar service",
            SkipReason::Cancelled => "cancelled",
            SkipReason::Disabled => "grammar checking disabled",
        })
    }
}

/// Whether a cell's grammar was actually checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarStatus {
    /// Checked; any grammar issues were reported
    #[default]
    Checked,
    /// Not checked; absence of grammar issues means nothing
    Skipped(SkipReason),
}

impl GrammarStatus {
    pub fn is_checked(&self) -> bool {
        matches!(self, GrammarStatus::Checked)
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            GrammarStatus::Checked => None,
            GrammarStatus::Skipped(reason) => Some(*reason),
        }
    }
}

/// Grammar result for one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarOutcome {
    pub issues: Vec<Issue>,
    pub status: GrammarStatus,
}

impl GrammarOutcome {
    fn checked() -> Self {
        Self {
            issues: Vec::new(),
            status: GrammarStatus::Checked,
        }
    }

    fn skipped(reason: SkipReason) -> Self {
        Self {
            issues: Vec::new(),
            status: GrammarStatus::Skipped(reason),
        }
    }
}

/// Checks text through a [`GrammarService`]
///
/// Every request goes through the shared [`Throttle`] and is retried per
/// the [`RetryPolicy`]. Clones share the service, the throttle and the
/// once-per-run warning state.
pub struct GrammarChecker<S> {
    service: Arc<S>,
    throttle: Throttle,
    retry: RetryPolicy,
    config: GrammarConfig,
    warned_rejected: Arc<AtomicBool>,
}

impl<S> Clone for GrammarChecker<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            throttle: self.throttle.clone(),
            retry: self.retry.clone(),
            config: self.config.clone(),
            warned_rejected: self.warned_rejected.clone(),
        }
    }
}

impl<S> fmt::Debug for GrammarChecker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarChecker")
            .field("throttle", &self.throttle)
            .field("retry", &self.retry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: GrammarService> GrammarChecker<S> {
    /// Create a checker with default limits and its own throttle
    pub fn new(service: S) -> Self {
        Self {
            service: Arc::new(service),
            throttle: Throttle::default(),
            retry: RetryPolicy::default(),
            config: GrammarConfig::default(),
            warned_rejected: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use a shared throttle
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_config(mut self, config: GrammarConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Re-arm the once-per-run warnings
    pub fn begin_run(&self) {
        self.warned_rejected.store(false, Ordering::Relaxed);
    }

    /// Check a single text
    ///
    /// The text is sent as is, whatever its length or word count.
    pub async fn check(&self, text: &str, language: Language) -> Result<Vec<Issue>, CheckFailure> {
        let matches = self
            .request(text.to_string(), language, &CancellationToken::new())
            .await?;
        let unit = TextUnit::new("", 0, 0, text);
        Ok(Batch::single(0, &unit)
            .remap(matches)
            .into_iter()
            .map(|(_, issue)| issue)
            .collect())
    }

    /// Check every unit of a document
    ///
    /// Returns one outcome per unit, in input order. Units with too few words
    /// are reported checked without a request. Batches run concurrently,
    /// bounded by the throttle.
    pub async fn check_units(
        &self,
        units: &[TextUnit],
        language: Language,
        cancel: &CancellationToken,
    ) -> Vec<GrammarOutcome> {
        let mut outcomes = vec![GrammarOutcome::checked(); units.len()];

        let min_words = self.config.min_words;
        let eligible = units
            .iter()
            .enumerate()
            .filter(|(_, unit)| unit.word_count() >= min_words);
        let batches = batch::plan(eligible, self.config.limits());
        if batches.is_empty() {
            return outcomes;
        }

        tracing::debug!(
            "Checking grammar of {} cells in {} requests ({language})",
            batches.iter().map(|b| b.members.len()).sum::<usize>(),
            batches.len()
        );

        let mut results: Vec<Option<Result<Vec<ServiceMatch>, CheckFailure>>> =
            vec![None; batches.len()];
        let mut tasks = JoinSet::new();
        for (id, batch) in batches.iter().enumerate() {
            if cancel.is_cancelled() {
                results[id] = Some(Err(CheckFailure::Cancelled));
                continue;
            }
            let checker = self.clone();
            let text = batch.text.clone();
            let cancel = cancel.clone();
            tasks.spawn(async move { (id, checker.request(text, language, &cancel).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, result)) => results[id] = Some(result),
                Err(e) => tracing::error!("Grammar request task failed: {e}"),
            }
        }

        for (batch, result) in batches.iter().zip(results) {
            match result {
                Some(Ok(matches)) => {
                    for (index, issue) in batch.remap(matches) {
                        outcomes[index].issues.push(issue);
                    }
                }
                Some(Err(failure)) => {
                    self.report_failure(&failure, batch);
                    let reason = SkipReason::from_failure(&failure);
                    for member in &batch.members {
                        outcomes[member.index] = GrammarOutcome::skipped(reason);
                    }
                }
                None => {
                    for member in &batch.members {
                        outcomes[member.index] = GrammarOutcome::skipped(SkipReason::Unavailable);
                    }
                }
            }
        }

        outcomes
    }

    /// One throttled, retried request
    async fn request(
        &self,
        text: String,
        language: Language,
        cancel: &CancellationToken,
    ) -> Result<Vec<ServiceMatch>, CheckFailure> {
        let request = CheckRequest::new(text, language);
        self.retry
            .run(cancel, || {
                let this = self;
                let request = &request;
                async move {
                    let Some(_permit) = this.throttle.acquire().await else {
                        return Err(ServiceError::Unavailable(
                            "request throttle closed".to_string(),
                        ));
                    };
                    this.service.check(request).await
                }
            })
            .await
    }

    fn report_failure(&self, failure: &CheckFailure, batch: &Batch) {
        let cells = batch.members.len();
        match failure {
            CheckFailure::Rejected(error) => {
                if !self.warned_rejected.swap(true, Ordering::Relaxed) {
                    tracing::warn!(
                        "Grammar service rejected a request ({error}); affected cells are reported as not checked"
                    );
                } else {
                    tracing::debug!("Grammar request rejected again: {error}");
                }
            }
            CheckFailure::Exhausted { .. } => {
                tracing::warn!(
                    "Skipping grammar for {cells} cells on sheet '{}': {failure}",
                    batch.sheet()
                );
            }
            CheckFailure::Cancelled => {
                tracing::debug!("Grammar request for {cells} cells cancelled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_from_failure() {
        let exhausted = |last| CheckFailure::Exhausted { attempts: 4, last };
        assert_eq!(
            SkipReason::from_failure(&exhausted(ServiceError::RateLimited { retry_after: None })),
            SkipReason::RateLimited
        );
        assert_eq!(
            SkipReason::from_failure(&exhausted(ServiceError::Unavailable("503".into()))),
            SkipReason::Unavailable
        );
        assert_eq!(
            SkipReason::from_failure(&CheckFailure::Rejected(ServiceError::Unauthorized(
                "401".into()
            ))),
            SkipReason::Rejected
        );
        assert_eq!(
            SkipReason::from_failure(&CheckFailure::Cancelled),
            SkipReason::Cancelled
        );
    }

    #[test]
    fn test_status_accessors() {
        assert!(GrammarStatus::Checked.is_checked());
        assert_eq!(GrammarStatus::Checked.skip_reason(), None);
        let skipped = GrammarStatus::Skipped(SkipReason::Cancelled);
        assert!(!skipped.is_checked());
        assert_eq!(skipped.skip_reason(), Some(SkipReason::Cancelled));
    }

    #[test]
    fn test_config_limits() {
        let config = GrammarConfig {
            max_batch_units: 0,
            ..GrammarConfig::default()
        };
        assert_eq!(config.limits().max_units, 1);
        assert_eq!(config.limits().max_chars, 1500);
    }
}
