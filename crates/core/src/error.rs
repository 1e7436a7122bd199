//! Error types for corrector operations.
//!
//! Each stage of the pipeline has its own error type so the request handler can
//! pick a user-facing reply by matching on the variant instead of inspecting
//! error strings:
//!
//! - [`ConfigError`] and [`InitError`] are fatal at startup.
//! - [`FetchError`] and [`AnalysisError::EmptyContent`] end a single request with
//!   a specific reply.
//! - [`CheckError`] and everything else end a single request with a generic reply.
//! - [`TransportError`] and [`DispatchError`] are only logged.
//!
//! # Example
//!
//! ```rust
//! use corrector_core::{FetchError, FetchErrorKind};
//!
//! let err = FetchError::Status(404);
//! assert_eq!(err.kind(), FetchErrorKind::RetrievalFailed);
//! assert!(err.to_string().contains("404"));
//! ```

use std::time::Duration;

use thiserror::Error;

/// Startup configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No bot token was supplied.
    #[error("Bot token is missing (pass --token or set TELOXIDE_TOKEN)")]
    MissingToken,

    /// The token was left at a placeholder value.
    #[error("Bot token is still a placeholder value")]
    PlaceholderToken,

    /// The token does not look like `<bot id>:<secret>`.
    #[error("Bot token is malformed (expected <digits>:<secret>)")]
    MalformedToken,

    /// A configured endpoint is not a valid absolute URL.
    #[error("Invalid URL in configuration: {0}")]
    InvalidUrl(String),
}

/// Errors raised while bringing up the grammar checker.
///
/// Any of these stops the process before it starts serving requests.
#[derive(Error, Debug)]
pub enum InitError {
    /// The checker endpoint could not be parsed.
    #[error("Invalid LanguageTool URL: {0}")]
    InvalidUrl(String),

    /// The checker server could not be reached.
    #[error("LanguageTool request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The checker server answered with a non-success status.
    #[error("LanguageTool returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The language list could not be decoded.
    #[error("Failed to decode LanguageTool response: {0}")]
    Decode(String),

    /// The configured language is not served by the checker.
    #[error("Language {0} is not supported by the LanguageTool server")]
    UnsupportedLanguage(String),
}

/// Coarse classification of fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The page could not be downloaded.
    RetrievalFailed,
    /// The page was downloaded but no article could be extracted from it.
    ParseFailed,
}

/// Errors from downloading and extracting an article.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network, DNS, TLS or connection failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The server answered with a non-success status code.
    #[error("Server responded with HTTP {0}")]
    Status(u16),

    /// Readability extraction failed on the downloaded page.
    #[error("Failed to extract article: {0}")]
    Parse(String),
}

impl FetchError {
    /// Returns whether the failure happened while retrieving or while parsing.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Parse(_) => FetchErrorKind::ParseFailed,
            FetchError::InvalidUrl(_) | FetchError::Http(_) | FetchError::Timeout { .. } | FetchError::Status(_) => {
                FetchErrorKind::RetrievalFailed
            }
        }
    }
}

/// Errors from a single grammar check.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The checker server could not be reached.
    #[error("LanguageTool request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The checker server answered with a non-success status.
    #[error("LanguageTool returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The check response could not be decoded.
    #[error("Failed to decode LanguageTool response: {0}")]
    Decode(String),

    /// The checker was used after [`shutdown`](crate::GrammarChecker::shutdown).
    #[error("Grammar checker has been shut down")]
    ShutDown,
}

/// Everything that can end one analysis request early.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The article could not be retrieved or parsed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The article was retrieved but contains no text.
    #[error("No text could be extracted from the article")]
    EmptyContent,

    /// The grammar check failed.
    #[error(transparent)]
    Check(#[from] CheckError),

    /// Fetch and check together took longer than allowed.
    #[error("Analysis timed out after {timeout} seconds")]
    Timeout { timeout: u64 },
}

/// Failure reported by a chat transport for one send.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    /// Human readable detail for logs.
    pub message: String,
    /// True only when the platform guarantees the message was not delivered.
    pub retryable: bool,
    /// Minimum wait the platform asked for before the next attempt.
    pub retry_after: Option<Duration>,
}

impl TransportError {
    /// A failure that must not be retried.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self { message: message.into(), retryable: false, retry_after: None }
    }

    /// A failure after which the message is known to be undelivered.
    pub fn retryable(message: impl Into<String>) -> Self {
        Self { message: message.into(), retryable: true, retry_after: None }
    }

    /// A rate-limit rejection; the next attempt must wait at least `retry_after`.
    pub fn rate_limited(message: impl Into<String>, retry_after: Duration) -> Self {
        Self { message: message.into(), retryable: true, retry_after: Some(retry_after) }
    }
}

/// A message in an ordered batch could not be delivered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to send message {index}: {source}")]
pub struct DispatchError {
    /// Position of the failed message in the batch.
    pub index: usize,
    /// The last transport error seen for it.
    pub source: TransportError,
}

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_fetch_error_kinds() {
        assert_eq!(FetchError::Status(500).kind(), FetchErrorKind::RetrievalFailed);
        assert_eq!(FetchError::Timeout { timeout: 30 }.kind(), FetchErrorKind::RetrievalFailed);
        assert_eq!(FetchError::InvalidUrl("x".into()).kind(), FetchErrorKind::RetrievalFailed);
        assert_eq!(FetchError::Parse("no body".into()).kind(), FetchErrorKind::ParseFailed);
    }

    #[test]
    fn test_timeout_error() {
        let err = AnalysisError::Timeout { timeout: 120 };
        assert!(err.to_string().contains("120"));
    }

    #[test]
    fn test_analysis_error_is_transparent_over_fetch() {
        let err = AnalysisError::from(FetchError::Status(403));
        assert_eq!(err.to_string(), "Server responded with HTTP 403");
    }

    #[test]
    fn test_transport_error_constructors() {
        assert!(TransportError::retryable("429").retryable);
        assert!(!TransportError::fatal("chat not found").retryable);

        let limited = TransportError::rate_limited("Retry after 3s", Duration::from_secs(3));
        assert!(limited.retryable);
        assert_eq!(limited.retry_after, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_dispatch_error_display() {
        let err = DispatchError { index: 2, source: TransportError::fatal("blocked by user") };
        assert_eq!(err.to_string(), "Failed to send message 2: blocked by user");
    }
}
