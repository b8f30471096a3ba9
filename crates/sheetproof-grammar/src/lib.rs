//! # sheetproof-grammar
//!
//! Grammar checking for sheetproof, delegated to an external service.
//!
//! The service is a capability injected through the [`GrammarService`]
//! trait; [`LanguageToolClient`] talks to a LanguageTool-compatible HTTP
//! server. [`GrammarChecker`] wraps a service with everything needed to use
//! it politely on whole documents:
//!
//! - batching of short cells into fewer requests ([`batch`])
//! - exponential backoff on transient failures ([`RetryPolicy`])
//! - a process-wide limit on request concurrency and rate ([`Throttle`])
//! - cooperative cancellation ([`CancellationToken`])
//!
//! A unit whose check could not complete is never reported as clean: it
//! comes back as [`GrammarStatus::Skipped`] with the reason.

pub mod batch;
mod cancel;
mod checker;
mod error;
mod languagetool;
mod retry;
mod service;
mod throttle;

pub use cancel::CancellationToken;
pub use checker::{GrammarChecker, GrammarConfig, GrammarOutcome, GrammarStatus, SkipReason};
pub use error::{CheckFailure, ServiceError};
pub use languagetool::{LanguageToolClient, LanguageToolConfig, PUBLIC_API_URL};
pub use retry::RetryPolicy;
pub use service::{CheckRequest, GrammarService, ServiceMatch};
pub use throttle::{Throttle, ThrottleConfig, ThrottlePermit};
