pub mod article;
pub mod checker;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod languagetool;
pub mod message;
pub mod pipeline;
pub mod router;

pub use article::{AnalysisRequest, ArticleContent};
pub use checker::{GrammarChecker, GrammarMatch};
pub use config::{BotConfig, BotConfigBuilder, validate_token};
pub use dispatch::{Dispatcher, ReplySink, RetryConfig};
pub use error::{
    AnalysisError, CheckError, ConfigError, DispatchError, FetchError, FetchErrorKind, InitError, Result,
    TransportError,
};
pub use fetch::{ArticleFetcher, FetchConfig, HttpArticleFetcher, extract_article, parse_http_url};
pub use formatters::replies;
pub use formatters::{
    FormatConfig, MAX_RENDERED_MATCHES, ReportFormatter, SEGMENT_SEPARATOR, escape_html, escape_markdown, format_report,
};
pub use languagetool::{LanguageInfo, LanguageToolChecker, LanguageToolConfig};
pub use message::{MAX_MESSAGE_SIZE, OutboundMessage, RenderMode, message_len};
pub use pipeline::{Analyzer, AnalyzerConfig, Report};
pub use router::{Inbound, Route, is_url, route};
