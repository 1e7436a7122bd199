//! Extracted article text and the request that produced it.
//!
//! [`ArticleContent`] is what the fetcher hands to the grammar checker. It keeps
//! the title and readable text together with a few derived metrics that end up
//! in logs.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[\w'-]+\b").expect("word pattern is valid"));

/// A validated request to analyze one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Absolute `http://` or `https://` URL as sent by the user.
    pub url: String,
}

impl AnalysisRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Title and readable text of a fetched article.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArticleContent {
    /// Article title, empty when none could be found.
    pub title: String,

    /// Plain text body.
    pub text: String,

    /// Source URL if known.
    pub source_url: Option<String>,

    /// Length of the text in characters.
    pub length: usize,

    /// Word count of the text.
    pub word_count: usize,
}

impl ArticleContent {
    /// Creates an article and computes its length and word count.
    pub fn new(title: impl Into<String>, text: impl Into<String>, source_url: Option<String>) -> Self {
        let title = title.into().trim().to_string();
        let text = text.into();
        let length = text.chars().count();
        let word_count = count_words(&text);

        Self { title, text, source_url, length, word_count }
    }

    /// True when there is nothing worth checking.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Count words in text using a simple regex pattern
fn count_words(text: &str) -> usize {
    WORD_REGEX.find_iter(text).count()
}
