//! Grammar checker boundary.
//!
//! The analysis pipeline only sees the [`GrammarChecker`] trait. The production
//! implementation talks to a LanguageTool server (see [`crate::languagetool`]);
//! tests substitute their own.

use async_trait::async_trait;
use serde::Serialize;

use crate::CheckError;

/// A single issue reported by the grammar checker.
///
/// Offsets are counted in `char`s of [`sentence`](Self::sentence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarMatch {
    /// The sentence containing the issue.
    pub sentence: String,
    /// Start of the flagged span within `sentence`.
    pub offset_in_sentence: usize,
    /// Length of the flagged span.
    pub error_length: usize,
    /// Explanation of the issue.
    pub message: String,
    /// Suggested replacements, best first. May be empty.
    pub replacements: Vec<String>,
    /// Identifier of the rule that fired, when the checker reports one.
    pub rule_id: Option<String>,
}

impl GrammarMatch {
    pub fn new(
        sentence: impl Into<String>,
        offset_in_sentence: usize,
        error_length: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sentence: sentence.into(),
            offset_in_sentence,
            error_length,
            message: message.into(),
            replacements: Vec::new(),
            rule_id: None,
        }
    }

    pub fn with_replacements<I, S>(mut self, replacements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replacements = replacements.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    /// The flagged text, clamped to the sentence bounds.
    pub fn error_text(&self) -> String {
        self.sentence
            .chars()
            .skip(self.offset_in_sentence)
            .take(self.error_length)
            .collect()
    }

    /// First replacement suggestion, if any.
    pub fn suggestion(&self) -> Option<&str> {
        self.replacements.first().map(String::as_str)
    }
}

/// A grammar/style checker shared by every request.
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait GrammarChecker: Send + Sync {
    /// Checks `text` and returns matches in document order.
    ///
    /// An empty vector means the text is clean.
    async fn check(&self, text: &str) -> Result<Vec<GrammarMatch>, CheckError>;

    /// Releases the checker. Later calls to [`check`](Self::check) may fail.
    async fn shutdown(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_text() {
        let m = GrammarMatch::new("Це є тестове речення.", 3, 1, "Зайве слово");
        assert_eq!(m.error_text(), "є");
    }

    #[test]
    fn test_error_text_is_clamped() {
        let m = GrammarMatch::new("Short.", 4, 50, "msg");
        assert_eq!(m.error_text(), "t.");

        let past_end = GrammarMatch::new("Short.", 40, 5, "msg");
        assert_eq!(past_end.error_text(), "");
    }

    #[test]
    fn test_suggestion_is_first_replacement() {
        let m = GrammarMatch::new("Teh cat.", 0, 3, "Possible typo").with_replacements(["The", "Tea"]);
        assert_eq!(m.suggestion(), Some("The"));
        assert_eq!(GrammarMatch::new("x", 0, 1, "y").suggestion(), None);
    }

    #[test]
    fn test_with_rule_id() {
        let m = GrammarMatch::new("x", 0, 1, "y").with_rule_id("MORFOLOGIK_RULE_UK_UA");
        assert_eq!(m.rule_id.as_deref(), Some("MORFOLOGIK_RULE_UK_UA"));
    }
}
