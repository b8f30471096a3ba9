//! Error types for grammar checking.

use std::time::Duration;

use thiserror::Error;

/// A failed call to the grammar service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Server error, timeout, connection failure or unreadable response
    #[error("Grammar service unavailable: {0}")]
    Unavailable(String),

    /// The service asked us to slow down
    #[error("Grammar service rate limit exceeded")]
    RateLimited {
        /// How long the service asked us to wait, if it said
        retry_after: Option<Duration>,
    },

    /// The service refused the request as malformed
    #[error("Grammar service rejected the request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials
    #[error("Grammar service refused credentials: {0}")]
    Unauthorized(String),

    /// The client could not be set up
    #[error("Invalid grammar service configuration: {0}")]
    InvalidConfig(String),
}

impl ServiceError {
    /// Whether retrying the same request later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ServiceError::Unavailable(_) | ServiceError::RateLimited { .. }
        )
    }
}

/// Why a grammar check gave up
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckFailure {
    /// Transient failures persisted through every attempt
    #[error("Grammar check gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: ServiceError,
    },

    /// The service refused the request; retrying would not help
    #[error("Grammar check rejected: {0}")]
    Rejected(#[source] ServiceError),

    /// The run was cancelled before the check finished
    #[error("Grammar check cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ServiceError::Unavailable("502".into()).is_transient());
        assert!(ServiceError::RateLimited { retry_after: None }.is_transient());
        assert!(!ServiceError::BadRequest("bad".into()).is_transient());
        assert!(!ServiceError::Unauthorized("401".into()).is_transient());
        assert!(!ServiceError::InvalidConfig("url".into()).is_transient());
    }

    #[test]
    fn test_display() {
        let failure = CheckFailure::Exhausted {
            attempts: 4,
            last: ServiceError::RateLimited { retry_after: None },
        };
        assert_eq!(
            failure.to_string(),
            "Grammar check gave up after 4 attempts: Grammar service rate limit exceeded"
        );
    }
}
