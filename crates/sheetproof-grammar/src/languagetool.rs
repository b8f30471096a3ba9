//! LanguageTool HTTP client
//!
//! Talks to the `/v2/check` endpoint of a LanguageTool server, either the
//! public API or a self-hosted instance
//! (`java -cp languagetool-server.jar org.languagetool.server.HTTPServer --port 8081`).

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::ServiceError;
use crate::service::{CheckRequest, GrammarService, ServiceMatch};

/// The public LanguageTool API
pub const PUBLIC_API_URL: &str = "https://api.languagetool.org";

const USER_AGENT: &str = concat!("sheetproof/", env!("CARGO_PKG_VERSION"));

/// Connection settings for a LanguageTool server
#[derive(Debug, Clone)]
pub struct LanguageToolConfig {
    /// Server root, without the `/v2` path. Default: the public API.
    pub base_url: String,
    /// API key for LanguageTool Premium
    pub api_key: Option<String>,
    /// Account name paired with `api_key`
    pub username: Option<String>,
    /// Per-request timeout. Default: 30 seconds.
    pub timeout: Duration,
}

impl Default for LanguageToolConfig {
    fn default() -> Self {
        Self {
            base_url: PUBLIC_API_URL.to_string(),
            api_key: None,
            username: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl LanguageToolConfig {
    /// Settings for a server at `base_url`
    pub fn with_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// [`GrammarService`] backed by a LanguageTool server
#[derive(Debug, Clone)]
pub struct LanguageToolClient {
    http: reqwest::Client,
    check_url: String,
    config: LanguageToolConfig,
}

impl LanguageToolClient {
    /// Create a client; no request is made until the first check
    pub fn new(config: LanguageToolConfig) -> Result<Self, ServiceError> {
        let base = config.base_url.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ServiceError::InvalidConfig(format!(
                "server URL must start with http:// or https://, got {:?}",
                config.base_url
            )));
        }
        if config.api_key.is_some() != config.username.is_some() {
            return Err(ServiceError::InvalidConfig(
                "api key and username must be given together".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ServiceError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            http,
            check_url: format!("{base}/v2/check"),
            config,
        })
    }

    /// The configured server root
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn send(&self, request: &CheckRequest) -> Result<Vec<ServiceMatch>, ServiceError> {
        let mut form: Vec<(&str, &str)> = vec![
            ("text", request.text.as_str()),
            ("language", request.language.code()),
        ];
        if let (Some(key), Some(user)) = (&self.config.api_key, &self.config.username) {
            form.push(("apiKey", key.as_str()));
            form.push(("username", user.as_str()));
        }

        tracing::debug!(
            "POST {} ({} chars, {})",
            self.check_url,
            request.text.chars().count(),
            request.language
        );

        let response = self
            .http
            .post(&self.check_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ServiceError::Unavailable(describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, retry_after, &body));
        }

        let body: CheckResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Unavailable(format!("unreadable response: {e}")))?;

        Ok(body.into_matches(&request.text))
    }
}

impl GrammarService for LanguageToolClient {
    async fn check(&self, request: &CheckRequest) -> Result<Vec<ServiceMatch>, ServiceError> {
        self.send(request).await
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}

/// Map a non-success HTTP status to a service error
fn classify_status(status: StatusCode, retry_after: Option<Duration>, body: &str) -> ServiceError {
    let detail = {
        let body = body.trim();
        if body.is_empty() {
            status.to_string()
        } else {
            let cut = body.char_indices().nth(200).map_or(body.len(), |(i, _)| i);
            format!("{status}: {}", &body[..cut])
        }
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => ServiceError::RateLimited { retry_after },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized(detail),
        s if s.is_server_error() => ServiceError::Unavailable(detail),
        _ => ServiceError::BadRequest(detail),
    }
}

/// `Retry-After` in delay-seconds form; HTTP dates are ignored
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

// === Response format ===

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    message: String,
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<RawReplacement>,
    rule: Option<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    id: String,
    category: Option<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    id: String,
}

impl CheckResponse {
    /// Convert to character offsets, dropping matches that don't fit the text
    fn into_matches(self, text: &str) -> Vec<ServiceMatch> {
        let offsets = Utf16Offsets::new(text);
        self.matches
            .into_iter()
            .filter_map(|m| {
                let Some((start, end)) = offsets.to_chars(m.offset, m.offset + m.length) else {
                    tracing::debug!(
                        "Dropping match at UTF-16 {}+{} outside the text",
                        m.offset,
                        m.length
                    );
                    return None;
                };
                let (rule_id, category) = match m.rule {
                    Some(rule) => (rule.id, rule.category.map(|c| c.id).unwrap_or_default()),
                    None => (String::new(), String::new()),
                };
                Some(ServiceMatch {
                    offset: start,
                    length: end - start,
                    rule_id,
                    category,
                    message: m.message,
                    replacements: m.replacements.into_iter().map(|r| r.value).collect(),
                })
            })
            .collect()
    }
}

/// Converts LanguageTool's UTF-16 code unit offsets to character offsets
struct Utf16Offsets {
    /// UTF-16 offset at which each character starts, plus the total length
    starts: Vec<usize>,
}

impl Utf16Offsets {
    fn new(text: &str) -> Self {
        let mut starts = Vec::with_capacity(text.len() + 1);
        let mut pos = 0;
        for c in text.chars() {
            starts.push(pos);
            pos += c.len_utf16();
        }
        starts.push(pos);
        Self { starts }
    }

    /// Character index for a UTF-16 offset on a character boundary
    fn to_char(&self, utf16: usize) -> Option<usize> {
        self.starts.binary_search(&utf16).ok()
    }

    fn to_chars(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        Some((self.to_char(start)?, self.to_char(end)?))
    }
}
