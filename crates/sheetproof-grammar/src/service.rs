//! The grammar service capability

use std::future::Future;
use std::sync::Arc;

use sheetproof_core::Language;

use crate::error::ServiceError;

/// One request to the grammar service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    /// Text to check
    pub text: String,
    /// Language to check it against
    pub language: Language,
}

impl CheckRequest {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }
}

/// One rule match reported by the service
///
/// `offset` and `length` are in characters of the request text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMatch {
    pub offset: usize,
    pub length: usize,
    pub rule_id: String,
    pub category: String,
    pub message: String,
    pub replacements: Vec<String>,
}

impl ServiceMatch {
    /// Create a match with no rule information or replacements
    pub fn new(offset: usize, length: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            rule_id: String::new(),
            category: String::new(),
            message: message.into(),
            replacements: Vec::new(),
        }
    }

    /// Set the rule that produced the match
    pub fn with_rule(mut self, id: impl Into<String>, category: impl Into<String>) -> Self {
        self.rule_id = id.into();
        self.category = category.into();
        self
    }

    /// Set the suggested replacements
    pub fn with_replacements<I, S>(mut self, replacements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replacements = replacements.into_iter().map(Into::into).collect();
        self
    }

    /// One past the last character covered
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// A grammar checking backend
///
/// Implementations must be shareable across tasks: the checker calls the
/// service from several concurrent batches.
pub trait GrammarService: Send + Sync + 'static {
    /// Check one piece of text, returning matches in text order
    fn check(
        &self,
        request: &CheckRequest,
    ) -> impl Future<Output = Result<Vec<ServiceMatch>, ServiceError>> + Send;
}

impl<S: GrammarService> GrammarService for Arc<S> {
    fn check(
        &self,
        request: &CheckRequest,
    ) -> impl Future<Output = Result<Vec<ServiceMatch>, ServiceError>> + Send {
        (**self).check(request)
    }
}
