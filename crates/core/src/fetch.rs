//! Article fetching from URLs.
//!
//! Downloads a page over HTTP(S) and runs Readability extraction on it
//! (via `dom_smoothie`) to get the article title and plain text.

use std::time::Duration;

use async_trait::async_trait;
use dom_smoothie::{Config, Readability};
use reqwest::Client;
use reqwest::redirect::Policy;
use url::Url;

use crate::{ArticleContent, FetchError, Result};

/// Source of article text for the analysis pipeline.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Retrieves the article at `url` and extracts its title and text.
    ///
    /// An article with empty text is returned as `Ok`; the caller decides
    /// what to do with it.
    async fn fetch(&self, url: &str) -> Result<ArticleContent>;
}

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
    /// Redirects followed before giving up.
    pub max_redirects: usize,
    /// Upper bound on elements Readability will look at (0 = unlimited).
    pub max_elements_to_parse: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (compatible; Corrector/0.1; article proofreading bot)".to_string(),
            max_redirects: 10,
            max_elements_to_parse: 9000,
        }
    }
}

/// Fetches pages with `reqwest` and extracts them with `dom_smoothie`.
#[derive(Debug, Clone)]
pub struct HttpArticleFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpArticleFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .redirect(Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Http)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Downloads the raw HTML of a page.
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        let parsed_url = parse_http_url(url)?;

        let response = self
            .client
            .get(parsed_url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "uk-UA,uk;q=0.9,en-US;q=0.8,en;q=0.7")
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| self.map_request_error(e))
    }

    fn map_request_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() { FetchError::Timeout { timeout: self.config.timeout } } else { FetchError::Http(e) }
    }
}

#[async_trait]
impl ArticleFetcher for HttpArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<ArticleContent> {
        let html = self.fetch_html(url).await?;
        tracing::debug!(url, bytes = html.len(), "downloaded page");

        let url = url.to_string();
        let max_elements = self.config.max_elements_to_parse;
        tokio::task::spawn_blocking(move || extract_article(&html, Some(&url), max_elements))
            .await
            .map_err(|e| FetchError::Parse(format!("extraction task failed: {}", e)))?
    }
}

/// Validates that `url` is an absolute `http` or `https` URL.
pub fn parse_http_url(url: &str) -> Result<Url> {
    let parsed_url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    match parsed_url.scheme() {
        "http" | "https" => Ok(parsed_url),
        other => Err(FetchError::InvalidUrl(format!("unsupported scheme: {}", other))),
    }
}

/// Runs Readability on `html` and returns the article title and plain text.
///
/// `url` is optional but lets relative links resolve.
pub fn extract_article(html: &str, url: Option<&str>, max_elements_to_parse: usize) -> Result<ArticleContent> {
    let cfg = Config { max_elements_to_parse, ..Default::default() };

    let mut readability = Readability::new(html, url, Some(cfg)).map_err(|e| FetchError::Parse(e.to_string()))?;
    let article = readability.parse().map_err(|e| FetchError::Parse(e.to_string()))?;

    Ok(ArticleContent::new(
        article.title.to_string(),
        article.text_content.to_string(),
        url.map(str::to_string),
    ))
}
