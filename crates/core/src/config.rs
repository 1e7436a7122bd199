//! Startup configuration.
//!
//! [`BotConfig`] collects everything the process needs before it can serve:
//! the bot token, checker connection settings, fetch settings and pipeline
//! limits. [`BotConfig::validate`] must pass before any network I/O happens.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use url::Url;

use crate::{AnalyzerConfig, ConfigError, FetchConfig, FormatConfig, LanguageToolConfig, RetryConfig};

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+:[A-Za-z0-9_-]+$").expect("token pattern is valid"));

/// Values people leave in place of a real token.
const PLACEHOLDER_TOKENS: [&str; 8] = [
    "you tg-bot token",
    "your tg-bot token",
    "your_telegram_token_here",
    "your-bot-token",
    "your_bot_token",
    "<token>",
    "token",
    "changeme",
];

/// Complete process configuration.
#[derive(Debug, Clone, Default)]
pub struct BotConfig {
    /// Telegram Bot API token.
    pub token: Option<String>,
    pub languagetool: LanguageToolConfig,
    pub fetch: FetchConfig,
    pub analyzer: AnalyzerConfig,
}

impl BotConfig {
    /// Creates a new builder for BotConfig.
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Checks the token and URLs, returning the token on success.
    pub fn validate(&self) -> Result<&str, ConfigError> {
        let token = validate_token(self.token.as_deref())?;

        Url::parse(&self.languagetool.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.languagetool.base_url, e)))?;

        Ok(token)
    }
}

/// Rejects missing, placeholder and malformed bot tokens.
pub fn validate_token(token: Option<&str>) -> Result<&str, ConfigError> {
    let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or(ConfigError::MissingToken)?;

    if is_placeholder(token) {
        return Err(ConfigError::PlaceholderToken);
    }

    if !TOKEN_REGEX.is_match(token) {
        return Err(ConfigError::MalformedToken);
    }

    Ok(token)
}

fn is_placeholder(token: &str) -> bool {
    let lowered = token.to_lowercase();
    PLACEHOLDER_TOKENS.contains(&lowered.as_str())
        || ((lowered.contains("token") || lowered.contains("токен")) && !lowered.contains(':'))
}

/// Builder for BotConfig.
///
/// Provides a fluent API for assembling configuration from CLI flags.
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    config: BotConfig,
}

impl BotConfigBuilder {
    pub fn token(mut self, token: Option<String>) -> Self {
        self.config.token = token;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.languagetool.language = language.into();
        self
    }

    pub fn languagetool_url(mut self, url: impl Into<String>) -> Self {
        self.config.languagetool.base_url = url.into();
        self
    }

    pub fn fetch_timeout(mut self, secs: u64) -> Self {
        self.config.fetch.timeout = secs;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.fetch.user_agent = user_agent.into();
        self
    }

    pub fn request_timeout(mut self, secs: u64) -> Self {
        self.config.analyzer.request_timeout = Duration::from_secs(secs);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.analyzer.retry = RetryConfig { max_retries, ..self.config.analyzer.retry };
        self
    }

    pub fn format(mut self, format: FormatConfig) -> Self {
        self.config.analyzer.format = format;
        self
    }

    pub fn build(self) -> BotConfig {
        self.config
    }
}
