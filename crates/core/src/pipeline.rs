//! Request handling: route, fetch, check, format, reply.
//!
//! [`Analyzer`] owns the shared fetcher and checker and runs one inbound
//! message to completion. Every failure is caught here, logged, and turned
//! into a plain-text reply.

use std::sync::Arc;
use std::time::Duration;

use crate::formatters::replies;
use crate::{
    AnalysisError, AnalysisRequest, ArticleContent, ArticleFetcher, DispatchError, Dispatcher, FormatConfig,
    GrammarChecker, GrammarMatch, Inbound, OutboundMessage, ReplySink, ReportFormatter, RetryConfig, Route, route,
};

/// Configuration for the analysis pipeline.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Upper bound on fetch + check for one request.
    pub request_timeout: Duration,
    pub format: FormatConfig,
    pub retry: RetryConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            format: FormatConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// A successfully analyzed article.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub article: ArticleContent,
    pub matches: Vec<GrammarMatch>,
}

/// Handles inbound messages end to end.
pub struct Analyzer {
    fetcher: Arc<dyn ArticleFetcher>,
    checker: Arc<dyn GrammarChecker>,
    formatter: ReportFormatter,
    dispatcher: Dispatcher,
    request_timeout: Duration,
}

impl Analyzer {
    pub fn new(fetcher: Arc<dyn ArticleFetcher>, checker: Arc<dyn GrammarChecker>, config: AnalyzerConfig) -> Self {
        Self {
            fetcher,
            checker,
            formatter: ReportFormatter::new(config.format),
            dispatcher: Dispatcher::new(config.retry),
            request_timeout: config.request_timeout,
        }
    }

    /// Routes `inbound` and sends every reply through `sink`, in order.
    pub async fn handle(&self, inbound: &Inbound, sink: &dyn ReplySink) -> Result<(), DispatchError> {
        let request = match route(inbound) {
            Route::Analyze(request) => request,
            Route::Greeting { name } => return self.dispatcher.send_all(sink, &[replies::greeting(name.as_deref())]).await,
            Route::NotAUrl => return self.dispatcher.send_all(sink, &[replies::not_a_url()]).await,
            Route::Ignore => {
                tracing::debug!(text = %inbound.text, "ignoring unsupported command");
                return Ok(());
            }
        };

        self.dispatcher.send_all(sink, &[replies::analysis_started()]).await?;

        let outcome = self.analyze(&request).await;
        let messages = self.render(&request, &outcome);

        let result = self.dispatcher.send_all(sink, &messages).await;
        if let Err(e) = &result {
            tracing::error!(url = %request.url, error = %e, "failed to deliver analysis results");
        }
        result
    }

    /// Fetches and checks the article, bounded by the request timeout.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<Report, AnalysisError> {
        tracing::info!(url = %request.url, "processing URL");

        match tokio::time::timeout(self.request_timeout, self.fetch_and_check(request)).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout { timeout: self.request_timeout.as_secs() }),
        }
    }

    async fn fetch_and_check(&self, request: &AnalysisRequest) -> Result<Report, AnalysisError> {
        let article = self.fetcher.fetch(&request.url).await?;

        if article.is_empty() {
            return Err(AnalysisError::EmptyContent);
        }

        tracing::info!(
            title = %article.title,
            chars = article.length,
            words = article.word_count,
            "article downloaded"
        );

        let matches = self.checker.check(&article.text).await?;
        tracing::info!(title = %article.title, issues = matches.len(), "article checked");

        Ok(Report { article, matches })
    }

    /// Turns an analysis outcome into the messages the user sees.
    pub fn render(&self, request: &AnalysisRequest, outcome: &Result<Report, AnalysisError>) -> Vec<OutboundMessage> {
        match outcome {
            Ok(report) => self.formatter.format(&report.article.title, &report.matches),
            Err(AnalysisError::EmptyContent) => {
                tracing::info!(url = %request.url, "no text extracted");
                vec![replies::empty_content()]
            }
            Err(AnalysisError::Fetch(e)) => {
                tracing::warn!(url = %request.url, error = %e, kind = ?e.kind(), "could not fetch article");
                vec![replies::fetch_failed(e.kind())]
            }
            Err(AnalysisError::Timeout { timeout }) => {
                tracing::warn!(url = %request.url, timeout, "analysis timed out");
                vec![replies::timed_out()]
            }
            Err(e) => {
                tracing::error!(url = %request.url, error = %e, "analysis failed");
                vec![replies::unexpected_error()]
            }
        }
    }

    /// Releases the shared checker.
    pub async fn shutdown(&self) {
        self.checker.shutdown().await;
    }
}
